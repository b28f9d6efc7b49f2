//! Note pattern catalog
//!
//! Patterns carry a generator-capability requirement; entries whose
//! capability is disabled are dropped from candidate pools, with a small
//! fixed fallback list re-admitted when it is itself capability-safe.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// One generated-pattern entry
#[derive(Debug)]
pub struct NotePattern {
    pub id: &'static str,
    pub label: &'static str,
    /// Generator family, e.g. `arp-3-up`, `walking`, `sustain`
    pub pattern_type: &'static str,
    pub tags: &'static [&'static str],
    /// Styles this pattern belongs to; empty means every style
    pub styles: &'static [&'static str],
    /// Generator capability the pattern requires, if any
    pub requires: Option<&'static str>,
}

impl NotePattern {
    /// Arpeggio-family patterns are disfavored for bass/harmony roles.
    pub fn is_arp(&self) -> bool {
        self.pattern_type.starts_with("arp")
    }

    pub fn allowed_for_style(&self, style_id: &str) -> bool {
        self.styles.is_empty() || self.styles.contains(&style_id)
    }
}

/// Always re-admitted into capability-gated pools when themselves safe
pub static FALLBACK_PATTERN_IDS: &[&str] = &["arp_up_3", "sustain_whole"];

pub static NOTE_PATTERNS: &[NotePattern] = &[
    NotePattern {
        id: "arp_up_3",
        label: "Arpeggio 3 Up",
        pattern_type: "arp-3-up",
        tags: &["arp", "bright"],
        styles: &[],
        requires: Some("gen_arpeggio_basic"),
    },
    NotePattern {
        id: "arp_down_3",
        label: "Arpeggio 3 Down",
        pattern_type: "arp-3-down",
        tags: &["arp", "dark"],
        styles: &[],
        requires: Some("gen_arpeggio_basic"),
    },
    NotePattern {
        id: "arp_skip_3",
        label: "Arpeggio 3 Skip",
        pattern_type: "arp-3-skip",
        tags: &["arp", "playful"],
        styles: &["classical_film", "pop_rock", "edm_electronic"],
        requires: Some("gen_arpeggio_basic"),
    },
    NotePattern {
        id: "step_arp_octave",
        label: "Octave Step Arp",
        pattern_type: "arp-octave",
        tags: &["arp", "high_energy", "on_grid"],
        styles: &["pop_rock", "edm_electronic"],
        requires: Some("gen_step_arp_octave"),
    },
    NotePattern {
        id: "sustain_whole",
        label: "Sustained Chord",
        pattern_type: "sustain",
        tags: &["stable", "low_energy"],
        styles: &[],
        requires: Some("gen_sustain_basic"),
    },
    NotePattern {
        id: "broken_chord_1_5_3",
        label: "Broken Chord 1-5-3",
        pattern_type: "broken",
        tags: &["dreamy", "stable"],
        styles: &["classical_film", "folk_country_bluegrass"],
        requires: Some("gen_broken_chords"),
    },
    NotePattern {
        id: "alberti_bass",
        label: "Alberti Bass",
        pattern_type: "broken",
        tags: &["stable", "on_grid"],
        styles: &["classical_film"],
        requires: Some("gen_alberti_bass"),
    },
    NotePattern {
        id: "offbeat_plucks",
        label: "Offbeat Plucks",
        pattern_type: "plucks",
        tags: &["offbeat", "syncopated"],
        styles: &["pop_rock", "edm_electronic", "latin_afro_cuban"],
        requires: Some("gen_offbeat_plucks"),
    },
    NotePattern {
        id: "ostinato_pulse",
        label: "Ostinato Pulse",
        pattern_type: "pulse",
        tags: &["on_grid", "tension", "high_energy"],
        styles: &["classical_film", "edm_electronic"],
        requires: Some("gen_ostinato_pulse"),
    },
    NotePattern {
        id: "walking_bass_simple",
        label: "Simple Walking Bass",
        pattern_type: "walking",
        tags: &["low_end", "steady", "swing"],
        styles: &["jazz_blues_funk", "folk_country_bluegrass"],
        requires: Some("gen_walking_bass_simple"),
    },
    NotePattern {
        id: "walking_bass_chromatic",
        label: "Chromatic Walking Bass",
        pattern_type: "walking",
        tags: &["swing", "dark"],
        styles: &["jazz_blues_funk"],
        requires: Some("gen_walking_bass"),
    },
    NotePattern {
        id: "comping_stabs",
        label: "Comping Stabs",
        pattern_type: "stabs",
        tags: &["syncopated", "swing"],
        styles: &["jazz_blues_funk", "latin_afro_cuban"],
        requires: Some("gen_comping_stabs"),
    },
    NotePattern {
        id: "call_response_phrase",
        label: "Call and Response",
        pattern_type: "phrase",
        tags: &["melodic", "swing"],
        styles: &["jazz_blues_funk", "latin_afro_cuban", "folk_country_bluegrass"],
        requires: Some("gen_call_response"),
    },
    NotePattern {
        id: "gate_mask_16",
        label: "Sixteenth Gate Mask",
        pattern_type: "gate",
        tags: &["on_grid", "tension"],
        styles: &["edm_electronic"],
        requires: Some("gen_gate_mask"),
    },
    NotePattern {
        id: "montuno_pattern",
        label: "Montuno",
        pattern_type: "montuno",
        tags: &["syncopated", "percussive"],
        styles: &["latin_afro_cuban"],
        requires: Some("gen_montuno"),
    },
    NotePattern {
        id: "travis_picking",
        label: "Travis Picking",
        pattern_type: "picking",
        tags: &["stable", "bright"],
        styles: &["folk_country_bluegrass"],
        requires: Some("gen_travis_picking"),
    },
];

static PATTERN_BY_ID: Lazy<HashMap<&'static str, &'static NotePattern>> =
    Lazy::new(|| NOTE_PATTERNS.iter().map(|p| (p.id, p)).collect());

pub fn pattern_by_id(id: &str) -> Option<&'static NotePattern> {
    PATTERN_BY_ID.get(id).copied()
}
