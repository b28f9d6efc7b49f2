//! Event types for the Barline transport
//!
//! Two families live here:
//! - wire-level note events as returned by the external compiler
//!   ([`NoteEvent`]) and their scheduled form with an absolute audio-clock
//!   timestamp attached ([`ScheduledEvent`])
//! - transport lifecycle events broadcast to display surfaces
//!   ([`TransportEvent`])

use serde::{Deserialize, Serialize};

/// A note event as returned by the external compile service.
///
/// `t_beat` is relative to the start of the compiled bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteEvent {
    /// Beat offset within the compiled bar
    pub t_beat: f64,

    /// Lane identifier (compiler-assigned routing key)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lane: Option<String>,

    /// MIDI pitches sounding for this event
    #[serde(default)]
    pub pitches: Vec<i32>,

    /// Duration in beats
    #[serde(default = "default_duration_beats")]
    pub duration_beats: f64,

    /// Velocity in [0.0, 1.0]
    #[serde(default = "default_velocity")]
    pub velocity: f64,

    /// Instrument preset string, e.g. `gm:0:0`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
}

fn default_duration_beats() -> f64 {
    1.0
}

fn default_velocity() -> f64 {
    0.8
}

/// A note event translated into absolute output-clock time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledEvent {
    #[serde(flatten)]
    pub event: NoteEvent,

    /// Absolute audio-clock time in seconds
    pub audio_time: f64,
}

/// Diagnostic severity reported by the compile service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Info,
    Warning,
    Error,
}

/// One diagnostic line from the compile service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: DiagnosticLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == DiagnosticLevel::Error
    }
}

/// Transport event types broadcast to listeners
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TransportEvent {
    /// Playback session started
    PlaybackStarted {
        session: u64,
        bpm: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Playback session stopped
    PlaybackStopped {
        session: u64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Playhead crossed into a new visual bar
    BarAdvanced {
        /// Visual bar index, wrapped to the loop length
        bar: u32,
        /// Beat position within the bar
        beat_in_bar: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Lookahead window advanced this tick
    ScheduleWindow {
        window_start_beat: f64,
        window_end_beat: f64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Events recorded against a visual bar slot
    BarEvents {
        bar: u32,
        events: Vec<ScheduledEvent>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Diagnostics surfaced by a compile call (or a local failure)
    Diagnostics {
        bar: u32,
        diagnostics: Vec<Diagnostic>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Debug trace lines from the most recent compile response
    DebugTrace {
        lines: Vec<String>,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}
