//! Style resolver
//!
//! Expands a node's declared style/mood/intent into concrete performance
//! parameters. `resolve` is a pure function: identical inputs always yield
//! bit-identical output, independent of call order relative to other nodes.
//!
//! Each field group (mood, harmony, pattern, feel, instrument) draws from
//! its own generator seeded by an independent sub-seed, so changing one
//! group's candidate pool never shifts another group's chosen index.
//! Candidate pools are made totally ordered before any pick: score
//! descending by tag overlap with the resolved mood's and style's tags,
//! ties broken by lexical id order. Pinned values (overrides over locks)
//! are reproduced verbatim in the output and short-circuit the pick
//! without consuming the group's generator, so unpinning a field restores
//! exactly the choice it had before pinning. Unknown style and mood ids
//! fail soft to catalog defaults.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::catalog::{
    default_mood, instrument_by_id, motion_by_id, moods_for_style, pattern_by_id,
    progression_by_id, register_by_id, role_by_id, style_or_default, Capabilities, Mood,
    NotePattern, Style, FALLBACK_PATTERN_IDS, INSTRUMENT_SUGGESTIONS, NOTE_PATTERNS,
    REGISTER_SUGGESTIONS,
};
use crate::rng::{sub_seed, Mixer32};
use crate::thought::{MoodMode, Thought};
use crate::RESOLVER_VERSION;

/// Role/motion filtering never narrows a pattern pool below this count;
/// when it would, the unfiltered style pool is used instead.
const MIN_PATTERN_POOL: usize = 2;

/// Inputs to one resolution call
#[derive(Debug, Clone)]
pub struct ResolveInput<'a> {
    pub style_id: &'a str,
    pub seed: u32,
    /// The owning node's id; part of every sub-seed so sibling nodes with
    /// the same style and seed still resolve independently.
    pub node_id: &'a str,
    pub locks: &'a BTreeMap<String, Value>,
    pub overrides: &'a BTreeMap<String, Value>,
    pub mood_mode: MoodMode,
    pub mood_id: &'a str,
    pub role: &'a str,
    pub motion_id: &'a str,
    pub capabilities: &'a Capabilities,
}

impl<'a> ResolveInput<'a> {
    /// Assemble the resolver inputs for one normalized thought node.
    ///
    /// The intent block carries the effective seed and locks; normalization
    /// back-fills them from the style block when the intent is silent.
    pub fn for_node(node_id: &'a str, thought: &'a Thought, capabilities: &'a Capabilities) -> Self {
        Self {
            style_id: &thought.style.id,
            seed: thought.intent.seed,
            node_id,
            locks: &thought.intent.locks,
            overrides: &thought.style.resolution.overrides,
            mood_mode: thought.style.mood.mode,
            mood_id: &thought.style.mood.id,
            role: &thought.intent.role,
            motion_id: &thought.intent.motion_id,
            capabilities,
        }
    }
}

/// Fully-resolved performance parameters for one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedStyle {
    pub style_id: String,
    pub mood_id: String,
    pub progression_preset_id: String,
    pub progression_variant_id: String,
    pub chords_per_bar: String,
    pub fill_behavior: String,
    pub progression_length: String,
    pub note_pattern_id: String,
    pub rhythm_grid: String,
    pub syncopation: String,
    pub timing_warp: String,
    pub timing_intensity: f64,
    pub instrument_id: String,
    pub instrument_preset: String,
    pub register_min: i32,
    pub register_max: i32,
    pub resolver_version: String,
}

/// Pinned-value lookup shared by every field pick. Overrides win over
/// locks; a pinned value is reproduced verbatim, whether or not it appears
/// in the candidate pool.
struct Pins<'a> {
    overrides: &'a BTreeMap<String, Value>,
    locks: &'a BTreeMap<String, Value>,
}

impl Pins<'_> {
    fn string(&self, field: &str) -> Option<String> {
        for map in [self.overrides, self.locks] {
            if let Some(value) = map.get(field).and_then(value_as_string) {
                return Some(value);
            }
        }
        None
    }

    fn number(&self, field: &str) -> Option<f64> {
        for map in [self.overrides, self.locks] {
            if let Some(n) = map.get(field).and_then(Value::as_f64) {
                return Some(n);
            }
        }
        None
    }
}

fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Seeded uniform pick from a lexically sorted string pool.
fn pick_plain(rng: &mut Mixer32, pool: &[&str]) -> Option<String> {
    if pool.is_empty() {
        return None;
    }
    let mut sorted: Vec<&str> = pool.to_vec();
    sorted.sort_unstable();
    Some(sorted[rng.pick_index(sorted.len())].to_string())
}

/// Seeded pick from a tagged pool: score descending by overlap with
/// `score_tags`, ties broken by id ascending, then a uniform index draw.
fn pick_scored<'p>(
    rng: &mut Mixer32,
    pool: &[(&'p str, &[&str])],
    score_tags: &[&str],
) -> Option<&'p str> {
    if pool.is_empty() {
        return None;
    }
    let mut scored: Vec<(i64, &str)> = pool
        .iter()
        .map(|(id, tags)| {
            let score = tags.iter().filter(|t| score_tags.contains(t)).count() as i64;
            (-score, *id)
        })
        .collect();
    scored.sort_unstable();
    Some(scored[rng.pick_index(scored.len())].1)
}

/// Seeded pick from a numeric pool, sorted ascending.
fn pick_number(rng: &mut Mixer32, pool: &[f64]) -> Option<f64> {
    if pool.is_empty() {
        return None;
    }
    let mut sorted = pool.to_vec();
    sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Some(sorted[rng.pick_index(sorted.len())])
}

fn resolve_mood(input: &ResolveInput<'_>, style: &'static Style, pins: &Pins<'_>) -> &'static Mood {
    let moods = moods_for_style(style.id);
    match input.mood_mode {
        MoodMode::Override => moods
            .iter()
            .find(|m| m.id == input.mood_id)
            .unwrap_or_else(|| default_mood(style.id)),
        MoodMode::Auto => {
            // The mood must exist to contribute score tags, so a pinned id
            // outside the style's mood set falls through to the seeded pick.
            if let Some(pinned) = pins.string("moodId") {
                if let Some(mood) = moods.iter().find(|m| m.id == pinned) {
                    return mood;
                }
                tracing::debug!(mood = pinned, "pinned mood not in style's mood set, ignoring");
            }
            let mut rng = Mixer32::new(sub_seed(input.seed, style.id, input.node_id, "mood"));
            let ids: Vec<&str> = moods.iter().map(|m| m.id).collect();
            let picked = pick_plain(&mut rng, &ids);
            match picked {
                Some(id) => moods
                    .iter()
                    .find(|m| m.id == id)
                    .unwrap_or_else(|| default_mood(style.id)),
                None => default_mood(style.id),
            }
        }
    }
}

/// Build the pattern candidate pool for one node: style membership, then
/// role/motion arp filtering (widened back if it over-narrows), then
/// capability gating with the fixed fallback list re-admitted.
fn pattern_pool(
    style: &'static Style,
    role: &str,
    motion_id: &str,
    capabilities: &Capabilities,
) -> Vec<&'static NotePattern> {
    let style_pool: Vec<&'static NotePattern> = NOTE_PATTERNS
        .iter()
        .filter(|p| p.allowed_for_style(style.id))
        .collect();

    let arps_allowed = motion_by_id(motion_id).map(|m| m.allow_arps).unwrap_or(false);
    let arp_restricted = role_by_id(role).map(|r| r.arp_restricted).unwrap_or(false);
    let arp_excluded = arp_restricted && !arps_allowed;

    let mut pool = if arp_excluded {
        let filtered: Vec<_> = style_pool.iter().copied().filter(|p| !p.is_arp()).collect();
        if filtered.len() >= MIN_PATTERN_POOL {
            filtered
        } else {
            style_pool
        }
    } else {
        style_pool
    };

    pool.retain(|p| capabilities.enabled(p.requires));

    for id in FALLBACK_PATTERN_IDS {
        if let Some(p) = pattern_by_id(id) {
            let role_ok = !(arp_excluded && p.is_arp());
            if p.allowed_for_style(style.id)
                && capabilities.enabled(p.requires)
                && role_ok
                && !pool.iter().any(|q| q.id == p.id)
            {
                pool.push(p);
            }
        }
    }

    if pool.is_empty() {
        pool = FALLBACK_PATTERN_IDS
            .iter()
            .filter_map(|id| pattern_by_id(id))
            .filter(|p| capabilities.enabled(p.requires))
            .collect();
    }
    pool
}

/// Resolve every performance parameter for one node.
pub fn resolve(input: &ResolveInput<'_>) -> ResolvedStyle {
    let style = style_or_default(input.style_id);
    let pins = Pins {
        overrides: input.overrides,
        locks: input.locks,
    };

    let mood = resolve_mood(input, style, &pins);
    let mut score_tags: Vec<&str> = mood.tags.to_vec();
    score_tags.extend_from_slice(style.tags);

    let group_rng =
        |group: &str| Mixer32::new(sub_seed(input.seed, style.id, input.node_id, group));

    // Harmony: the progression pick plus its derived fields all consume the
    // same stream, in a fixed order.
    let mut harmony_rng = group_rng("harmony");
    let progression_preset_id = pins
        .string("progressionPresetId")
        .or_else(|| pick_plain(&mut harmony_rng, style.progressions))
        .unwrap_or_else(|| style.progressions.first().copied().unwrap_or_default().to_string());
    let variants = style.variants_for(&progression_preset_id);
    let progression_variant_id = pins
        .string("progressionVariantId")
        .or_else(|| pick_plain(&mut harmony_rng, variants))
        .unwrap_or_else(|| "triads".to_string());
    let chords_per_bar = pins
        .string("chordsPerBar")
        .or_else(|| pick_plain(&mut harmony_rng, style.chords_per_bar))
        .unwrap_or_else(|| "1".to_string());
    let fill_behavior = pins
        .string("fillBehavior")
        .or_else(|| pick_plain(&mut harmony_rng, style.fill_behavior))
        .unwrap_or_else(|| "repeat".to_string());
    let progression_length = pins
        .string("progressionLength")
        .or_else(|| pick_plain(&mut harmony_rng, style.progression_length))
        .unwrap_or_else(|| "preset".to_string());

    // Pattern
    let mut pattern_rng = group_rng("pattern");
    let patterns = pattern_pool(style, input.role, input.motion_id, input.capabilities);
    let pattern_candidates: Vec<(&str, &[&str])> =
        patterns.iter().map(|p| (p.id, p.tags)).collect();
    let note_pattern_id = pins
        .string("notePatternId")
        .or_else(|| {
            pick_scored(&mut pattern_rng, &pattern_candidates, &score_tags).map(str::to_string)
        })
        .unwrap_or_else(|| FALLBACK_PATTERN_IDS[0].to_string());

    // Feel
    let mut feel_rng = group_rng("feel");
    let rhythm_grid = pins
        .string("rhythmGrid")
        .or_else(|| pick_plain(&mut feel_rng, style.feel.rhythm_grid))
        .unwrap_or_else(|| "1/12".to_string());
    let syncopation = pins
        .string("syncopation")
        .or_else(|| pick_plain(&mut feel_rng, style.feel.syncopation))
        .unwrap_or_else(|| "none".to_string());
    let timing_warp = pins
        .string("timingWarp")
        .or_else(|| pick_plain(&mut feel_rng, style.feel.timing_warp))
        .unwrap_or_else(|| "none".to_string());
    let timing_intensity = pins
        .number("timingIntensity")
        .or_else(|| pick_number(&mut feel_rng, style.feel.timing_intensity))
        .unwrap_or(0.0);

    // Instrument and register share one stream.
    let mut instrument_rng = group_rng("instrument");
    let instruments: Vec<_> = INSTRUMENT_SUGGESTIONS
        .iter()
        .filter(|i| i.styles.contains(&style.id))
        .collect();
    let instrument_candidates: Vec<(&str, &[&str])> =
        instruments.iter().map(|i| (i.id, i.tags)).collect();
    let instrument_id = pins
        .string("instrumentId")
        .or_else(|| {
            pick_scored(&mut instrument_rng, &instrument_candidates, &score_tags)
                .map(str::to_string)
        })
        .unwrap_or_default();
    // A pinned instrument may come from outside the style's pool, so the
    // preset lookup falls back to the full catalog.
    let instrument_preset = pins
        .string("instrumentPreset")
        .or_else(|| instrument_by_id(&instrument_id).map(|i| i.preset.to_string()))
        .unwrap_or_else(|| "gm:0:0".to_string());

    let registers: Vec<_> = REGISTER_SUGGESTIONS
        .iter()
        .filter(|r| r.styles.contains(&style.id))
        .collect();
    let register_candidates: Vec<(&str, &[&str])> =
        registers.iter().map(|r| (r.id, r.tags)).collect();
    let register_id = pins
        .string("registerId")
        .or_else(|| {
            pick_scored(&mut instrument_rng, &register_candidates, &score_tags)
                .map(str::to_string)
        })
        .unwrap_or_default();
    let register = register_by_id(&register_id);
    let register_min = pins
        .number("registerMin")
        .map(|n| n as i32)
        .or_else(|| register.map(|r| r.min))
        .unwrap_or(48);
    let register_max = pins
        .number("registerMax")
        .map(|n| n as i32)
        .or_else(|| register.map(|r| r.max))
        .unwrap_or(84);

    ResolvedStyle {
        style_id: style.id.to_string(),
        mood_id: mood.id.to_string(),
        progression_preset_id,
        progression_variant_id,
        chords_per_bar,
        fill_behavior,
        progression_length,
        note_pattern_id,
        rhythm_grid,
        syncopation,
        timing_warp,
        timing_intensity,
        instrument_id,
        instrument_preset,
        register_min,
        register_max,
        resolver_version: RESOLVER_VERSION.to_string(),
    }
}

impl ResolvedStyle {
    /// Bars implied by the resolved progression when the length resolves to
    /// the preset's own span.
    pub fn effective_progression_bars(&self) -> u32 {
        if self.progression_length == "preset" {
            progression_by_id(&self.progression_preset_id)
                .map(|p| p.default_length)
                .unwrap_or(4)
        } else {
            self.progression_length.parse().unwrap_or(4)
        }
    }
}
