//! Mood catalog: emotional-tag overlays biasing deterministic selection

/// One mood entry
#[derive(Debug)]
pub struct Mood {
    pub id: &'static str,
    pub label: &'static str,
    pub tags: &'static [&'static str],
}

/// Neutral mood used when a style has no matching mood
pub static DEFAULT_MOOD: Mood = Mood {
    id: "none",
    label: "No Mood",
    tags: &["neutral"],
};

static MOODS_BY_STYLE: &[(&str, &[Mood])] = &[
    (
        "classical_film",
        &[
            Mood { id: "calm", label: "Calm", tags: &["bright", "stable", "low_energy", "wide_register"] },
            Mood { id: "romantic", label: "Romantic", tags: &["dreamy", "warm", "lush", "wide_register"] },
            Mood { id: "ominous", label: "Ominous", tags: &["dark", "tension", "low_energy", "tight_register"] },
            Mood { id: "triumphant", label: "Triumphant", tags: &["heroic", "bright", "high_energy", "wide_register"] },
            Mood { id: "tender", label: "Tender", tags: &["bright", "dreamy", "stable", "low_energy", "wide_register"] },
            Mood { id: "mysterious", label: "Mysterious", tags: &["dark", "tension", "dreamy", "low_energy", "tight_register"] },
            Mood { id: "heroic", label: "Heroic", tags: &["heroic", "bright", "high_energy", "wide_register"] },
            Mood { id: "dread", label: "Dread", tags: &["dark", "tension", "high_energy", "tight_register"] },
        ],
    ),
    (
        "jazz_blues_funk",
        &[
            Mood { id: "cool", label: "Cool", tags: &["swing", "low_energy", "dreamy", "offbeat", "wide_register"] },
            Mood { id: "smoky", label: "Smoky", tags: &["dark", "low_energy", "swing", "tight_register"] },
            Mood { id: "energetic", label: "Energetic", tags: &["high_energy", "syncopated", "swing", "bright"] },
            Mood { id: "noir", label: "Noir", tags: &["dark", "tension", "swing", "tight_register"] },
            Mood { id: "hot", label: "Hot", tags: &["high_energy", "syncopated", "swing", "bright"] },
            Mood { id: "blue", label: "Blue", tags: &["dark", "low_energy", "swing", "tight_register"] },
            Mood { id: "late_night", label: "Late Night", tags: &["dreamy", "low_energy", "swing", "tight_register"] },
        ],
    ),
    (
        "pop_rock",
        &[
            Mood { id: "bright", label: "Bright", tags: &["bright", "high_energy", "wide_register"] },
            Mood { id: "anthemic", label: "Anthemic", tags: &["heroic", "bright", "high_energy", "wide_register"] },
            Mood { id: "bittersweet", label: "Bittersweet", tags: &["dreamy", "low_energy", "wide_register"] },
            Mood { id: "driving", label: "Driving", tags: &["high_energy", "on_grid", "tight_register"] },
            Mood { id: "melancholic", label: "Melancholic", tags: &["dreamy", "low_energy", "dark"] },
            Mood { id: "gritty", label: "Gritty", tags: &["syncopated", "on_grid", "high_energy", "dark"] },
            Mood { id: "aggressive", label: "Aggressive", tags: &["high_energy", "dark", "tight_register"] },
        ],
    ),
    (
        "edm_electronic",
        &[
            Mood { id: "uplifting", label: "Uplifting", tags: &["bright", "high_energy", "on_grid", "wide_register"] },
            Mood { id: "euphoric", label: "Euphoric", tags: &["bright", "high_energy", "on_grid", "wide_register"] },
            Mood { id: "dark", label: "Dark", tags: &["dark", "tension", "high_energy", "on_grid"] },
            Mood { id: "chill", label: "Chill", tags: &["dreamy", "low_energy", "on_grid"] },
            Mood { id: "hypnotic", label: "Hypnotic", tags: &["on_grid", "syncopated", "tension", "wide_register"] },
            Mood { id: "playful", label: "Playful", tags: &["bright", "syncopated", "on_grid", "high_energy"] },
        ],
    ),
    (
        "latin_afro_cuban",
        &[
            Mood { id: "sunny", label: "Sunny", tags: &["bright", "syncopated", "high_energy", "swing"] },
            Mood { id: "fiery", label: "Fiery", tags: &["high_energy", "syncopated", "percussive"] },
            Mood { id: "suave", label: "Suave", tags: &["low_energy", "syncopated", "wide_register"] },
            Mood { id: "sultry_minor", label: "Sultry (Minor)", tags: &["dark", "syncopated", "low_energy", "wide_register"] },
            Mood { id: "driving", label: "Driving", tags: &["high_energy", "on_grid", "percussive", "syncopated"] },
            Mood { id: "ceremonial", label: "Ceremonial", tags: &["tension", "wide_register", "syncopated", "high_energy"] },
        ],
    ),
    (
        "folk_country_bluegrass",
        &[
            Mood { id: "warm", label: "Warm", tags: &["bright", "stable", "low_energy", "tight_register"] },
            Mood { id: "lonesome", label: "Lonesome", tags: &["dark", "low_energy", "wide_register"] },
            Mood { id: "lively", label: "Lively", tags: &["high_energy", "syncopated", "tight_register"] },
            Mood { id: "nostalgic", label: "Nostalgic", tags: &["dreamy", "low_energy", "wide_register"] },
            Mood { id: "campfire", label: "Campfire", tags: &["bright", "stable", "low_energy", "tight_register"] },
            Mood { id: "dusty", label: "Dusty", tags: &["dark", "low_energy", "swing", "on_grid"] },
            Mood { id: "bluegrass_drive", label: "Bluegrass Drive", tags: &["high_energy", "syncopated", "swing", "tight_register"] },
            Mood { id: "heartbreak", label: "Heartbreak", tags: &["dreamy", "low_energy", "wide_register"] },
        ],
    ),
    (
        "legacy",
        &[Mood { id: "none", label: "Legacy / No Mood", tags: &["neutral"] }],
    ),
];

/// Moods valid for a style, in catalog order.
pub fn moods_for_style(style_id: &str) -> &'static [Mood] {
    MOODS_BY_STYLE
        .iter()
        .find(|(id, _)| *id == style_id)
        .map(|(_, moods)| *moods)
        .unwrap_or(std::slice::from_ref(&DEFAULT_MOOD))
}

/// Look up a mood within a style; unknown ids degrade to the neutral mood.
pub fn mood_by_id(style_id: &str, mood_id: &str) -> &'static Mood {
    moods_for_style(style_id)
        .iter()
        .find(|m| m.id == mood_id)
        .unwrap_or(&DEFAULT_MOOD)
}

/// A style's default mood: the first catalog entry.
pub fn default_mood(style_id: &str) -> &'static Mood {
    moods_for_style(style_id).first().unwrap_or(&DEFAULT_MOOD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::STYLE_CATALOG;

    #[test]
    fn every_style_has_moods() {
        for style in STYLE_CATALOG {
            assert!(!moods_for_style(style.id).is_empty(), "{}", style.id);
        }
    }

    #[test]
    fn unknown_mood_degrades_to_neutral() {
        assert_eq!(mood_by_id("classical_film", "nonexistent").id, "none");
    }

    #[test]
    fn tender_is_valid_for_classical_film() {
        let mood = mood_by_id("classical_film", "tender");
        assert_eq!(mood.id, "tender");
        assert!(mood.tags.contains(&"dreamy"));
    }
}
