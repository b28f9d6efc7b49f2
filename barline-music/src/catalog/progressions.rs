//! Harmonic progression presets

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// One progression preset
#[derive(Debug)]
pub struct ProgressionPreset {
    pub id: &'static str,
    pub label: &'static str,
    pub romans: &'static [&'static str],
    /// Implied length in bars when `progressionLength` resolves to "preset"
    pub default_length: u32,
    pub variants: &'static [&'static str],
}

pub static PROGRESSION_PRESETS: &[ProgressionPreset] = &[
    ProgressionPreset {
        id: "film_i_vi_iv_v",
        label: "I - vi - IV - V (Score)",
        romans: &["I", "vi", "IV", "V"],
        default_length: 4,
        variants: &["triads", "7ths"],
    },
    ProgressionPreset {
        id: "film_i_iv_v_i",
        label: "I - IV - V - I (Cadence)",
        romans: &["I", "IV", "V", "I"],
        default_length: 4,
        variants: &["triads", "7ths"],
    },
    ProgressionPreset {
        id: "lament_i_vii_vi_v",
        label: "Lament Bass",
        romans: &["i", "VII", "VI", "V"],
        default_length: 4,
        variants: &["triads"],
    },
    ProgressionPreset {
        id: "epic_i_v_vi_iii",
        label: "I - V - vi - iii (Epic)",
        romans: &["I", "V", "vi", "iii"],
        default_length: 4,
        variants: &["triads", "7ths"],
    },
    ProgressionPreset {
        id: "jazz_ii_v_i",
        label: "ii - V - I",
        romans: &["ii", "V", "I"],
        default_length: 4,
        variants: &["7ths", "9ths"],
    },
    ProgressionPreset {
        id: "blues_12_bar",
        label: "12-Bar Blues",
        romans: &["I", "I", "I", "I", "IV", "IV", "I", "I", "V", "IV", "I", "V"],
        default_length: 12,
        variants: &["7ths"],
    },
    ProgressionPreset {
        id: "rhythm_changes_a",
        label: "Rhythm Changes (A)",
        romans: &["I", "vi", "ii", "V"],
        default_length: 4,
        variants: &["7ths", "9ths"],
    },
    ProgressionPreset {
        id: "pop_i_v_vi_iv",
        label: "I - V - vi - IV",
        romans: &["I", "V", "vi", "IV"],
        default_length: 4,
        variants: &["triads", "7ths"],
    },
    ProgressionPreset {
        id: "pop_vi_iv_i_v",
        label: "vi - IV - I - V",
        romans: &["vi", "IV", "I", "V"],
        default_length: 4,
        variants: &["triads", "7ths"],
    },
    ProgressionPreset {
        id: "fifties_i_vi_iv_v",
        label: "50s I - vi - IV - V",
        romans: &["I", "vi", "IV", "V"],
        default_length: 4,
        variants: &["triads", "7ths"],
    },
    ProgressionPreset {
        id: "edm_vi_iv_i_v",
        label: "vi - IV - I - V (Lift)",
        romans: &["vi", "IV", "I", "V"],
        default_length: 4,
        variants: &["triads", "7ths"],
    },
    ProgressionPreset {
        id: "minor_loop_i_vii_vi_vii",
        label: "i - VII - VI - VII",
        romans: &["i", "VII", "VI", "VII"],
        default_length: 4,
        variants: &["triads"],
    },
    ProgressionPreset {
        id: "montuno_i_iv_v_iv",
        label: "I - IV - V - IV (Montuno)",
        romans: &["I", "IV", "V", "IV"],
        default_length: 4,
        variants: &["triads", "7ths"],
    },
    ProgressionPreset {
        id: "andalusian_i_vii_vi_v",
        label: "Andalusian Cadence",
        romans: &["i", "VII", "VI", "V"],
        default_length: 4,
        variants: &["triads"],
    },
    ProgressionPreset {
        id: "folk_i_iv_i_v",
        label: "I - IV - I - V",
        romans: &["I", "IV", "I", "V"],
        default_length: 4,
        variants: &["triads"],
    },
];

static PROGRESSION_BY_ID: Lazy<HashMap<&'static str, &'static ProgressionPreset>> =
    Lazy::new(|| PROGRESSION_PRESETS.iter().map(|p| (p.id, p)).collect());

pub fn progression_by_id(id: &str) -> Option<&'static ProgressionPreset> {
    PROGRESSION_BY_ID.get(id).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::STYLE_CATALOG;

    #[test]
    fn every_style_progression_resolves() {
        for style in STYLE_CATALOG {
            for id in style.progressions {
                assert!(progression_by_id(id).is_some(), "{id}");
            }
        }
    }

    #[test]
    fn blues_is_twelve_bars() {
        assert_eq!(progression_by_id("blues_12_bar").unwrap().default_length, 12);
    }
}
