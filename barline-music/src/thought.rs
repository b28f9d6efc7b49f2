//! Thought parameter normalization
//!
//! A thought is a node's declared musical intent. Editors produce parameter
//! bags in either the canonical nested schema or a legacy flat shape (or a
//! mix of both); [`normalize_thought`] maps any of them onto one canonical
//! [`Thought`], back-filling from nested values first, then equivalent
//! legacy flat keys, then static defaults. Normalization is total and
//! idempotent: it never fails and re-normalizing a canonical value changes
//! nothing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// How the mood is chosen at resolve time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodMode {
    /// Deterministically pick among the style's moods
    Auto,
    /// Use the declared mood id
    Override,
}

/// Which harmony branch is authoritative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HarmonyMode {
    Single,
    Preset,
    Custom,
}

/// Which pattern branch is authoritative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternMode {
    Generated,
    Custom,
}

/// Which feel branch is authoritative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeelMode {
    Preset,
    Manual,
}

/// Canonical thought parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thought {
    pub duration_bars: u32,
    pub key: String,
    pub label: String,
    pub style: StyleParams,
    pub harmony: HarmonyParams,
    pub pattern: PatternParams,
    pub feel: FeelParams,
    pub voice: VoiceParams,
    pub intent: ThoughtIntent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleParams {
    pub id: String,
    pub seed: u32,
    pub mood: MoodParams,
    pub resolution: ResolutionParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodParams {
    pub mode: MoodMode,
    pub id: String,
}

/// Per-field resolution controls: sparse maps from resolved-field name to a
/// pinned value. Overrides win over locks, locks over seeded selection.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionParams {
    pub modes: BTreeMap<String, String>,
    pub locks: BTreeMap<String, Value>,
    pub overrides: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HarmonyParams {
    pub mode: HarmonyMode,
    pub single: SingleChord,
    pub preset: ProgressionChoice,
    pub custom: CustomProgression,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleChord {
    pub root: String,
    pub quality: String,
    pub notes_override: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionChoice {
    pub id: String,
    pub variant_id: String,
    pub chords_per_bar: String,
    pub fill: String,
    pub length: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomProgression {
    pub roman: String,
    pub variant_style: String,
    pub chords_per_bar: String,
    pub fill: String,
    pub length: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternParams {
    pub mode: PatternMode,
    pub generated: GeneratedPattern,
    pub custom: CustomPattern,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPattern {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomPattern {
    pub grid: String,
    pub bars: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeelParams {
    pub mode: FeelMode,
    pub preset_id: String,
    pub manual: ManualFeel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualFeel {
    pub grid: String,
    pub syncopation: String,
    pub warp: String,
    pub intensity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceParams {
    pub soundfont: String,
    pub preset: String,
    pub register: Register,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Register {
    pub min: i32,
    pub max: i32,
}

/// Abstract intent block consumed by the resolver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThoughtIntent {
    pub goal: String,
    pub role: String,
    pub motion_id: String,
    pub density: f64,
    pub harmony_behavior: String,
    pub sound_color: String,
    pub seed: u32,
    pub locks: BTreeMap<String, Value>,
}

// Static defaults applied when neither the nested nor the legacy shape
// carries a value.
const DEFAULT_STYLE_ID: &str = "classical_film";
const DEFAULT_STYLE_SEED: u32 = 1;
const DEFAULT_KEY: &str = "C# minor";
const DEFAULT_SOUNDFONT: &str = "/assets/soundfonts/General-GS.sf2";
const DEFAULT_PRESET: &str = "gm:0:0";
const DEFAULT_GRID: &str = "1/12";
const DEFAULT_CUSTOM_GRID: &str = "1/16";
const DEFAULT_REGISTER_MIN: i32 = 48;
const DEFAULT_REGISTER_MAX: i32 = 84;

fn get<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

fn get_str(value: &Value, path: &[&str]) -> Option<String> {
    get(value, path).and_then(|v| v.as_str()).map(str::to_string)
}

fn get_f64(value: &Value, path: &[&str]) -> Option<f64> {
    get(value, path).and_then(Value::as_f64)
}

fn get_u32(value: &Value, path: &[&str]) -> Option<u32> {
    get_f64(value, path).map(|n| {
        if n.is_finite() && n >= 0.0 {
            n as u32
        } else {
            0
        }
    })
}

fn get_i32(value: &Value, path: &[&str]) -> Option<i32> {
    get_f64(value, path).map(|n| n as i32)
}

fn get_map(value: &Value, path: &[&str]) -> BTreeMap<String, Value> {
    get(value, path)
        .and_then(Value::as_object)
        .map(|obj| obj.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default()
}

fn get_string_map(value: &Value, path: &[&str]) -> BTreeMap<String, String> {
    get(value, path)
        .and_then(Value::as_object)
        .map(|obj| {
            obj.iter()
                .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

fn merge_maps(base: BTreeMap<String, Value>, over: BTreeMap<String, Value>) -> BTreeMap<String, Value> {
    let mut merged = base;
    merged.extend(over);
    merged
}

/// The legacy flat shape spells harmony modes `progression_preset` /
/// `progression_custom`.
fn harmony_mode_from_str(raw: Option<&str>) -> HarmonyMode {
    match raw {
        Some("preset") | Some("progression_preset") => HarmonyMode::Preset,
        Some("custom") | Some("progression_custom") => HarmonyMode::Custom,
        _ => HarmonyMode::Single,
    }
}

fn mood_mode_from_str(raw: Option<&str>) -> MoodMode {
    match raw {
        Some("override") => MoodMode::Override,
        _ => MoodMode::Auto,
    }
}

/// Map an arbitrary parameter bag onto the canonical schema.
pub fn normalize_thought(raw: &Value) -> Thought {
    let style = normalize_style(raw);
    let harmony = normalize_harmony(raw);
    let pattern = normalize_pattern(raw);
    let mut feel = normalize_feel(raw);
    let voice = normalize_voice(raw);
    let intent = normalize_intent(raw, &style);

    // A custom pattern supplies the grid when manual feel left it blank.
    if pattern.mode == PatternMode::Custom && feel.mode == FeelMode::Manual && feel.manual.grid.is_empty() {
        feel.manual.grid = pattern.custom.grid.clone();
    }

    Thought {
        duration_bars: get_u32(raw, &["durationBars"]).unwrap_or(1).max(1),
        key: get_str(raw, &["key"]).unwrap_or_else(|| DEFAULT_KEY.to_string()),
        label: get_str(raw, &["label"]).unwrap_or_else(|| "Thought".to_string()),
        style,
        harmony,
        pattern,
        feel,
        voice,
        intent,
    }
}

fn normalize_style(raw: &Value) -> StyleParams {
    let id = get_str(raw, &["style", "id"])
        .or_else(|| get_str(raw, &["styleId"]))
        .unwrap_or_else(|| DEFAULT_STYLE_ID.to_string());
    let seed = get_u32(raw, &["style", "seed"])
        .or_else(|| get_u32(raw, &["styleSeed"]))
        .unwrap_or(DEFAULT_STYLE_SEED);
    let mood_mode = get_str(raw, &["style", "mood", "mode"])
        .or_else(|| get_str(raw, &["moodMode"]));
    let mood_id = get_str(raw, &["style", "mood", "id"])
        .or_else(|| get_str(raw, &["moodId"]))
        .unwrap_or_else(|| "none".to_string());

    let mut modes = get_string_map(raw, &["styleOptionModes"]);
    modes.extend(get_string_map(raw, &["style", "resolution", "modes"]));
    let locks = merge_maps(
        get_map(raw, &["styleOptionLocks"]),
        get_map(raw, &["style", "resolution", "locks"]),
    );
    let overrides = merge_maps(
        get_map(raw, &["styleOptionOverrides"]),
        get_map(raw, &["style", "resolution", "overrides"]),
    );

    StyleParams {
        id,
        seed,
        mood: MoodParams {
            mode: mood_mode_from_str(mood_mode.as_deref()),
            id: mood_id,
        },
        resolution: ResolutionParams {
            modes,
            locks,
            overrides,
        },
    }
}

fn normalize_harmony(raw: &Value) -> HarmonyParams {
    let mode_str = get_str(raw, &["harmony", "mode"]).or_else(|| get_str(raw, &["harmonyMode"]));
    let chords_per_bar = |branch: &str| {
        get_str(raw, &["harmony", branch, "chordsPerBar"])
            .or_else(|| get_str(raw, &["chordsPerBar"]))
            .unwrap_or_else(|| "1".to_string())
    };
    let fill = |branch: &str| {
        get_str(raw, &["harmony", branch, "fill"])
            .or_else(|| get_str(raw, &["fillBehavior"]))
            .unwrap_or_else(|| "repeat".to_string())
    };
    let length = |branch: &str| {
        get_str(raw, &["harmony", branch, "length"])
            .or_else(|| get_str(raw, &["progressionLength"]))
            .unwrap_or_else(|| "preset".to_string())
    };

    HarmonyParams {
        mode: harmony_mode_from_str(mode_str.as_deref()),
        single: SingleChord {
            root: get_str(raw, &["harmony", "single", "root"])
                .or_else(|| get_str(raw, &["chordRoot"]))
                .unwrap_or_else(|| "C#".to_string()),
            quality: get_str(raw, &["harmony", "single", "quality"])
                .or_else(|| get_str(raw, &["chordQuality"]))
                .unwrap_or_else(|| "minor".to_string()),
            notes_override: get_str(raw, &["harmony", "single", "notesOverride"])
                .or_else(|| get_str(raw, &["chordNotes"]))
                .unwrap_or_default(),
        },
        preset: ProgressionChoice {
            id: get_str(raw, &["harmony", "preset", "id"])
                .or_else(|| get_str(raw, &["progressionPresetId"]))
                .unwrap_or_default(),
            variant_id: get_str(raw, &["harmony", "preset", "variantId"])
                .or_else(|| get_str(raw, &["progressionVariantId"]))
                .unwrap_or_default(),
            chords_per_bar: chords_per_bar("preset"),
            fill: fill("preset"),
            length: length("preset"),
        },
        custom: CustomProgression {
            roman: get_str(raw, &["harmony", "custom", "roman"])
                .or_else(|| get_str(raw, &["progressionCustom"]))
                .unwrap_or_default(),
            variant_style: get_str(raw, &["harmony", "custom", "variantStyle"])
                .or_else(|| get_str(raw, &["progressionCustomVariantStyle"]))
                .unwrap_or_else(|| "triads".to_string()),
            chords_per_bar: chords_per_bar("custom"),
            fill: fill("custom"),
            length: length("custom"),
        },
    }
}

fn normalize_pattern(raw: &Value) -> PatternParams {
    let legacy_mode = match get_str(raw, &["melodyMode"]).as_deref() {
        Some("custom") => PatternMode::Custom,
        _ => PatternMode::Generated,
    };
    let mode = match get_str(raw, &["pattern", "mode"]).as_deref() {
        Some("custom") => PatternMode::Custom,
        Some(_) => PatternMode::Generated,
        None => legacy_mode,
    };
    PatternParams {
        mode,
        generated: GeneratedPattern {
            id: get_str(raw, &["pattern", "generated", "id"])
                .or_else(|| get_str(raw, &["notePatternId"]))
                .or_else(|| get_str(raw, &["patternType"]))
                .unwrap_or_default(),
        },
        custom: CustomPattern {
            grid: get_str(raw, &["pattern", "custom", "grid"])
                .or_else(|| get_str(raw, &["customMelody", "grid"]))
                .unwrap_or_else(|| DEFAULT_CUSTOM_GRID.to_string()),
            bars: get(raw, &["pattern", "custom", "bars"])
                .or_else(|| get(raw, &["customMelody", "bars"]))
                .and_then(|v| v.as_array().cloned())
                .unwrap_or_default(),
        },
    }
}

fn normalize_feel(raw: &Value) -> FeelParams {
    let mode = match get_str(raw, &["feel", "mode"]).as_deref() {
        Some("preset") => FeelMode::Preset,
        _ => FeelMode::Manual,
    };
    FeelParams {
        mode,
        preset_id: get_str(raw, &["feel", "presetId"]).unwrap_or_default(),
        manual: ManualFeel {
            grid: get_str(raw, &["feel", "manual", "grid"])
                .or_else(|| get_str(raw, &["rhythmGrid"]))
                .unwrap_or_else(|| DEFAULT_GRID.to_string()),
            syncopation: get_str(raw, &["feel", "manual", "syncopation"])
                .or_else(|| get_str(raw, &["syncopation"]))
                .unwrap_or_else(|| "none".to_string()),
            warp: get_str(raw, &["feel", "manual", "warp"])
                .or_else(|| get_str(raw, &["timingWarp"]))
                .unwrap_or_else(|| "none".to_string()),
            intensity: get_f64(raw, &["feel", "manual", "intensity"])
                .or_else(|| get_f64(raw, &["timingIntensity"]))
                .unwrap_or(0.0),
        },
    }
}

fn normalize_voice(raw: &Value) -> VoiceParams {
    VoiceParams {
        soundfont: get_str(raw, &["voice", "soundfont"])
            .or_else(|| get_str(raw, &["instrumentSoundfont"]))
            .unwrap_or_else(|| DEFAULT_SOUNDFONT.to_string()),
        preset: get_str(raw, &["voice", "preset"])
            .or_else(|| get_str(raw, &["instrumentPreset"]))
            .unwrap_or_else(|| DEFAULT_PRESET.to_string()),
        register: Register {
            min: get_i32(raw, &["voice", "register", "min"])
                .or_else(|| get_i32(raw, &["registerMin"]))
                .unwrap_or(DEFAULT_REGISTER_MIN),
            max: get_i32(raw, &["voice", "register", "max"])
                .or_else(|| get_i32(raw, &["registerMax"]))
                .unwrap_or(DEFAULT_REGISTER_MAX),
        },
    }
}

fn normalize_intent(raw: &Value, style: &StyleParams) -> ThoughtIntent {
    let locks = {
        let from_intent = get_map(raw, &["intent", "locks"]);
        if from_intent.is_empty() {
            style.resolution.locks.clone()
        } else {
            from_intent
        }
    };
    ThoughtIntent {
        goal: get_str(raw, &["intent", "goal"]).unwrap_or_else(|| "driving_groove".to_string()),
        role: get_str(raw, &["intent", "role"]).unwrap_or_else(|| "harmony".to_string()),
        motion_id: get_str(raw, &["intent", "motionId"]).unwrap_or_else(|| "flowing".to_string()),
        density: get_f64(raw, &["intent", "density"]).unwrap_or(0.5),
        harmony_behavior: get_str(raw, &["intent", "harmonyBehavior"])
            .unwrap_or_else(|| "auto".to_string()),
        sound_color: get_str(raw, &["intent", "soundColor"]).unwrap_or_else(|| "auto".to_string()),
        seed: get_u32(raw, &["intent", "seed"]).unwrap_or(style.seed),
        locks,
    }
}
