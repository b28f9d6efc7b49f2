//! Instrument and register suggestion catalogs

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// One instrument suggestion
#[derive(Debug)]
pub struct InstrumentSuggestion {
    pub id: &'static str,
    pub label: &'static str,
    pub styles: &'static [&'static str],
    pub tags: &'static [&'static str],
    /// Preset string as `gm:<bank>:<program>`
    pub preset: &'static str,
}

/// One register range suggestion
#[derive(Debug)]
pub struct RegisterSuggestion {
    pub id: &'static str,
    pub label: &'static str,
    pub styles: &'static [&'static str],
    pub tags: &'static [&'static str],
    pub min: i32,
    pub max: i32,
}

pub static INSTRUMENT_SUGGESTIONS: &[InstrumentSuggestion] = &[
    InstrumentSuggestion { id: "cine_strings", label: "Cinematic Strings", styles: &["classical_film"], tags: &["dreamy", "wide_register", "bright"], preset: "gm:0:48" },
    InstrumentSuggestion { id: "cine_piano", label: "Concert Piano", styles: &["classical_film"], tags: &["stable", "bright"], preset: "gm:0:0" },
    InstrumentSuggestion { id: "cine_brass", label: "Heroic Brass", styles: &["classical_film"], tags: &["heroic", "high_energy"], preset: "gm:0:61" },
    InstrumentSuggestion { id: "jazz_piano", label: "Jazz Piano", styles: &["jazz_blues_funk"], tags: &["swing", "bright"], preset: "gm:0:2" },
    InstrumentSuggestion { id: "jazz_guitar", label: "Hollowbody Guitar", styles: &["jazz_blues_funk"], tags: &["warm", "dreamy"], preset: "gm:0:26" },
    InstrumentSuggestion { id: "funk_ep", label: "Funk EP", styles: &["jazz_blues_funk"], tags: &["high_energy", "syncopated"], preset: "gm:0:4" },
    InstrumentSuggestion { id: "rock_stack", label: "Stacked Guitar", styles: &["pop_rock"], tags: &["high_energy", "heroic"], preset: "gm:0:29" },
    InstrumentSuggestion { id: "rock_clean", label: "Clean Guitar", styles: &["pop_rock"], tags: &["bright", "stable"], preset: "gm:0:27" },
    InstrumentSuggestion { id: "rock_synth", label: "Pad Synth", styles: &["pop_rock"], tags: &["dreamy", "wide_register"], preset: "gm:0:88" },
    InstrumentSuggestion { id: "edm_pluck", label: "EDM Pluck", styles: &["edm_electronic"], tags: &["bright", "on_grid"], preset: "gm:0:82" },
    InstrumentSuggestion { id: "edm_pad", label: "Wide Pad", styles: &["edm_electronic"], tags: &["dreamy", "wide_register"], preset: "gm:0:89" },
    InstrumentSuggestion { id: "edm_bass", label: "Sub Bass", styles: &["edm_electronic"], tags: &["dark", "tension"], preset: "gm:0:38" },
    InstrumentSuggestion { id: "latin_piano", label: "Rhythm Piano", styles: &["latin_afro_cuban"], tags: &["syncopated", "bright"], preset: "gm:0:0" },
    InstrumentSuggestion { id: "latin_steel", label: "Steel Drums", styles: &["latin_afro_cuban"], tags: &["bright", "percussive"], preset: "gm:0:114" },
    InstrumentSuggestion { id: "latin_brass", label: "Brass Section", styles: &["latin_afro_cuban"], tags: &["high_energy", "wide_register"], preset: "gm:0:61" },
    InstrumentSuggestion { id: "folk_acoustic", label: "Acoustic Guitar", styles: &["folk_country_bluegrass"], tags: &["bright", "stable"], preset: "gm:0:25" },
    InstrumentSuggestion { id: "folk_banjo", label: "Banjo", styles: &["folk_country_bluegrass"], tags: &["tight_register", "swing"], preset: "gm:0:105" },
    InstrumentSuggestion { id: "folk_dulcimer", label: "Dulcimer", styles: &["folk_country_bluegrass"], tags: &["dreamy", "low_energy"], preset: "gm:0:15" },
    InstrumentSuggestion { id: "legacy_piano", label: "Legacy Piano", styles: &["legacy"], tags: &["neutral"], preset: "gm:0:0" },
];

pub static REGISTER_SUGGESTIONS: &[RegisterSuggestion] = &[
    RegisterSuggestion { id: "wide_score", label: "Wide Score", styles: &["classical_film", "edm_electronic"], tags: &["wide_register", "heroic"], min: 40, max: 92 },
    RegisterSuggestion { id: "mid_ensemble", label: "Mid Ensemble", styles: &["classical_film", "jazz_blues_funk"], tags: &["stable", "bright"], min: 50, max: 86 },
    RegisterSuggestion { id: "tight_combo", label: "Tight Combo", styles: &["jazz_blues_funk", "latin_afro_cuban"], tags: &["tight_register", "swing"], min: 52, max: 80 },
    RegisterSuggestion { id: "rock_stack_register", label: "Rock Stack", styles: &["pop_rock"], tags: &["heroic", "high_energy"], min: 48, max: 84 },
    RegisterSuggestion { id: "rock_low", label: "Rock Low Crunch", styles: &["pop_rock"], tags: &["dark", "tight_register"], min: 43, max: 76 },
    RegisterSuggestion { id: "edm_mid", label: "EDM Mid", styles: &["edm_electronic"], tags: &["on_grid", "bright"], min: 52, max: 88 },
    RegisterSuggestion { id: "edm_bass_range", label: "EDM Bass Focus", styles: &["edm_electronic"], tags: &["dark", "tension"], min: 36, max: 70 },
    RegisterSuggestion { id: "latin_mid", label: "Clave Mid", styles: &["latin_afro_cuban"], tags: &["syncopated", "bright"], min: 55, max: 86 },
    RegisterSuggestion { id: "latin_wide", label: "Latin Wide", styles: &["latin_afro_cuban"], tags: &["wide_register", "ceremonial"], min: 48, max: 90 },
    RegisterSuggestion { id: "folk_mid", label: "Folk Mid", styles: &["folk_country_bluegrass"], tags: &["bright", "stable"], min: 50, max: 84 },
    RegisterSuggestion { id: "folk_low", label: "Folk Low", styles: &["folk_country_bluegrass"], tags: &["dark", "low_energy"], min: 45, max: 76 },
    RegisterSuggestion { id: "legacy_default_register", label: "Legacy Default", styles: &["legacy"], tags: &["neutral"], min: 48, max: 84 },
];

static INSTRUMENT_BY_ID: Lazy<HashMap<&'static str, &'static InstrumentSuggestion>> =
    Lazy::new(|| INSTRUMENT_SUGGESTIONS.iter().map(|i| (i.id, i)).collect());

static REGISTER_BY_ID: Lazy<HashMap<&'static str, &'static RegisterSuggestion>> =
    Lazy::new(|| REGISTER_SUGGESTIONS.iter().map(|r| (r.id, r)).collect());

pub fn instrument_by_id(id: &str) -> Option<&'static InstrumentSuggestion> {
    INSTRUMENT_BY_ID.get(id).copied()
}

pub fn register_by_id(id: &str) -> Option<&'static RegisterSuggestion> {
    REGISTER_BY_ID.get(id).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::STYLE_CATALOG;

    #[test]
    fn every_style_has_instrument_and_register() {
        for style in STYLE_CATALOG {
            assert!(
                INSTRUMENT_SUGGESTIONS.iter().any(|i| i.styles.contains(&style.id)),
                "no instrument for {}",
                style.id
            );
            assert!(
                REGISTER_SUGGESTIONS.iter().any(|r| r.styles.contains(&style.id)),
                "no register for {}",
                style.id
            );
        }
    }

    #[test]
    fn register_ranges_are_ordered() {
        for r in REGISTER_SUGGESTIONS {
            assert!(r.min < r.max, "{}", r.id);
        }
    }
}
