//! Static musical catalogs
//!
//! Immutable tables loaded at startup. Candidate pools for the resolver are
//! built by filtering these tables; selection order is always made total and
//! deterministic before any seeded pick (score descending, id ascending), so
//! results never depend on declaration order or platform sort stability.

mod capabilities;
mod instruments;
mod moods;
mod motions;
mod patterns;
mod progressions;
mod roles;
mod styles;

pub use capabilities::Capabilities;
pub use instruments::{
    instrument_by_id, register_by_id, InstrumentSuggestion, RegisterSuggestion,
    INSTRUMENT_SUGGESTIONS, REGISTER_SUGGESTIONS,
};
pub use moods::{default_mood, mood_by_id, moods_for_style, Mood, DEFAULT_MOOD};
pub use motions::{motion_by_id, Motion, MOTION_CATALOG};
pub use patterns::{pattern_by_id, NotePattern, FALLBACK_PATTERN_IDS, NOTE_PATTERNS};
pub use progressions::{progression_by_id, ProgressionPreset, PROGRESSION_PRESETS};
pub use roles::{role_by_id, Role, ROLE_CATALOG};
pub use styles::{style_by_id, style_or_default, Style, DEFAULT_STYLE_ID, STYLE_CATALOG};
