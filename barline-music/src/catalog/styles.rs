//! Style catalog: named genre palettes
//!
//! A style names its harmony/feel candidate pools directly and scopes the
//! pattern/instrument tables through their `styles` membership lists.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Per-style feel candidate pools
#[derive(Debug)]
pub struct FeelCandidates {
    pub rhythm_grid: &'static [&'static str],
    pub syncopation: &'static [&'static str],
    pub timing_warp: &'static [&'static str],
    pub timing_intensity: &'static [f64],
}

/// One style entry
#[derive(Debug)]
pub struct Style {
    pub id: &'static str,
    pub label: &'static str,
    /// Tags contributing to candidate scoring alongside the resolved mood's
    pub tags: &'static [&'static str],
    pub progressions: &'static [&'static str],
    pub variants_by_progression: &'static [(&'static str, &'static [&'static str])],
    pub chords_per_bar: &'static [&'static str],
    pub fill_behavior: &'static [&'static str],
    pub progression_length: &'static [&'static str],
    pub feel: FeelCandidates,
}

impl Style {
    /// Variant candidates for a chosen progression, falling back to triads.
    pub fn variants_for(&self, progression_id: &str) -> &'static [&'static str] {
        self.variants_by_progression
            .iter()
            .find(|(id, _)| *id == progression_id)
            .map(|(_, variants)| *variants)
            .unwrap_or(&["triads"])
    }
}

/// Style used when an unknown id is requested
pub const DEFAULT_STYLE_ID: &str = "classical_film";

pub static STYLE_CATALOG: &[Style] = &[
    Style {
        id: "classical_film",
        label: "Classical / Film Score",
        tags: &["stable", "wide_register"],
        progressions: &[
            "film_i_vi_iv_v",
            "film_i_iv_v_i",
            "lament_i_vii_vi_v",
            "epic_i_v_vi_iii",
        ],
        variants_by_progression: &[
            ("film_i_vi_iv_v", &["triads", "7ths"]),
            ("film_i_iv_v_i", &["triads", "7ths"]),
            ("lament_i_vii_vi_v", &["triads"]),
            ("epic_i_v_vi_iii", &["triads", "7ths"]),
        ],
        chords_per_bar: &["1", "2"],
        fill_behavior: &["repeat", "sustain"],
        progression_length: &["preset", "4", "8"],
        feel: FeelCandidates {
            rhythm_grid: &["1/8", "1/12", "1/16"],
            syncopation: &["none", "anticipation"],
            timing_warp: &["none", "rubato"],
            timing_intensity: &[0.0, 0.1, 0.2],
        },
    },
    Style {
        id: "jazz_blues_funk",
        label: "Jazz / Blues / Funk",
        tags: &["swing", "syncopated"],
        progressions: &["jazz_ii_v_i", "blues_12_bar", "rhythm_changes_a"],
        variants_by_progression: &[
            ("jazz_ii_v_i", &["7ths", "9ths"]),
            ("blues_12_bar", &["7ths"]),
            ("rhythm_changes_a", &["7ths", "9ths"]),
        ],
        chords_per_bar: &["1", "2"],
        fill_behavior: &["repeat", "walk"],
        progression_length: &["preset", "4"],
        feel: FeelCandidates {
            rhythm_grid: &["1/12", "1/8"],
            syncopation: &["offbeat", "anticipation"],
            timing_warp: &["swing"],
            timing_intensity: &[0.1, 0.25],
        },
    },
    Style {
        id: "pop_rock",
        label: "Pop / Rock",
        tags: &["bright", "on_grid"],
        progressions: &["pop_i_v_vi_iv", "pop_vi_iv_i_v", "fifties_i_vi_iv_v"],
        variants_by_progression: &[
            ("pop_i_v_vi_iv", &["triads", "7ths"]),
            ("pop_vi_iv_i_v", &["triads", "7ths"]),
            ("fifties_i_vi_iv_v", &["triads", "7ths"]),
        ],
        chords_per_bar: &["1", "2"],
        fill_behavior: &["repeat"],
        progression_length: &["preset", "4"],
        feel: FeelCandidates {
            rhythm_grid: &["1/8", "1/16"],
            syncopation: &["none", "offbeat"],
            timing_warp: &["none", "swing"],
            timing_intensity: &[0.0, 0.1, 0.2],
        },
    },
    Style {
        id: "edm_electronic",
        label: "EDM / Electronic",
        tags: &["on_grid", "high_energy"],
        progressions: &["edm_vi_iv_i_v", "minor_loop_i_vii_vi_vii"],
        variants_by_progression: &[
            ("edm_vi_iv_i_v", &["triads", "7ths"]),
            ("minor_loop_i_vii_vi_vii", &["triads"]),
        ],
        chords_per_bar: &["1"],
        fill_behavior: &["repeat", "sustain"],
        progression_length: &["preset", "8"],
        feel: FeelCandidates {
            rhythm_grid: &["1/16", "1/8"],
            syncopation: &["none", "offbeat"],
            timing_warp: &["none"],
            timing_intensity: &[0.0, 0.05],
        },
    },
    Style {
        id: "latin_afro_cuban",
        label: "Latin / Afro-Cuban",
        tags: &["syncopated", "percussive"],
        progressions: &["montuno_i_iv_v_iv", "andalusian_i_vii_vi_v"],
        variants_by_progression: &[
            ("montuno_i_iv_v_iv", &["triads", "7ths"]),
            ("andalusian_i_vii_vi_v", &["triads"]),
        ],
        chords_per_bar: &["1", "2"],
        fill_behavior: &["repeat"],
        progression_length: &["preset", "4"],
        feel: FeelCandidates {
            rhythm_grid: &["1/8", "1/16"],
            syncopation: &["clave", "offbeat"],
            timing_warp: &["none", "swing"],
            timing_intensity: &[0.1, 0.2],
        },
    },
    Style {
        id: "folk_country_bluegrass",
        label: "Folk / Country / Bluegrass",
        tags: &["bright", "stable"],
        progressions: &["folk_i_iv_i_v", "fifties_i_vi_iv_v"],
        variants_by_progression: &[
            ("folk_i_iv_i_v", &["triads"]),
            ("fifties_i_vi_iv_v", &["triads", "7ths"]),
        ],
        chords_per_bar: &["1"],
        fill_behavior: &["repeat"],
        progression_length: &["preset", "4"],
        feel: FeelCandidates {
            rhythm_grid: &["1/8", "1/12"],
            syncopation: &["none"],
            timing_warp: &["none", "swing"],
            timing_intensity: &[0.0, 0.1],
        },
    },
    Style {
        id: "legacy",
        label: "Legacy",
        tags: &["neutral"],
        progressions: &["pop_i_v_vi_iv"],
        variants_by_progression: &[("pop_i_v_vi_iv", &["triads", "7ths"])],
        chords_per_bar: &["1"],
        fill_behavior: &["repeat"],
        progression_length: &["preset"],
        feel: FeelCandidates {
            rhythm_grid: &["1/12"],
            syncopation: &["none"],
            timing_warp: &["none"],
            timing_intensity: &[0.0],
        },
    },
];

static STYLE_BY_ID: Lazy<HashMap<&'static str, &'static Style>> =
    Lazy::new(|| STYLE_CATALOG.iter().map(|s| (s.id, s)).collect());

pub fn style_by_id(id: &str) -> Option<&'static Style> {
    STYLE_BY_ID.get(id).copied()
}

/// Look up a style, degrading to the default for unknown ids.
pub fn style_or_default(id: &str) -> &'static Style {
    style_by_id(id).unwrap_or_else(|| {
        tracing::debug!(style_id = id, "unknown style id, using default");
        style_by_id(DEFAULT_STYLE_ID).expect("default style present")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_ids_are_unique() {
        let mut ids: Vec<_> = STYLE_CATALOG.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), STYLE_CATALOG.len());
    }

    #[test]
    fn unknown_style_falls_back() {
        assert_eq!(style_or_default("does_not_exist").id, DEFAULT_STYLE_ID);
    }

    #[test]
    fn every_progression_has_variants() {
        for style in STYLE_CATALOG {
            for progression in style.progressions {
                assert!(!style.variants_for(progression).is_empty());
            }
        }
    }
}
