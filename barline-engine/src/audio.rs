//! Audio engine seam
//!
//! The scheduler drives an [`AudioEngine`] through a narrow trait: a clock,
//! a tempo setter, and a fire-and-forget scheduling entry point. The engine
//! is expected to tolerate timestamps already in the past (it drops them);
//! the scheduler never waits on it.

use barline_common::events::ScheduledEvent;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Instant;
use tracing::debug;

/// Output-side engine consumed by the transport scheduler.
pub trait AudioEngine: Send + Sync {
    /// Begin producing output. Idempotent.
    fn start(&self);

    /// Silence output and discard anything still scheduled.
    fn stop(&self);

    fn set_bpm(&self, bpm: f64);

    /// Current audio-clock reading in seconds. Monotonic while running.
    fn current_time(&self) -> f64;

    /// Schedule events at absolute audio-clock timestamps, shifted by
    /// `offset_seconds`. Fire-and-forget; late events are dropped.
    fn schedule(&self, events: &[ScheduledEvent], offset_seconds: f64);
}

/// Newest events kept by [`NullAudioEngine`]; older ones are evicted.
const NULL_ENGINE_CAPACITY: usize = 1024;

/// Engine that keeps a real clock but produces no sound.
///
/// Used when the process runs headless; the transport behaves identically,
/// and the most recent scheduled events are retained for inspection.
pub struct NullAudioEngine {
    origin: Instant,
    running: AtomicBool,
    scheduled: Mutex<VecDeque<ScheduledEvent>>,
}

impl NullAudioEngine {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            running: AtomicBool::new(false),
            scheduled: Mutex::new(VecDeque::new()),
        }
    }

    /// Events recorded since the last start, newest last.
    pub fn scheduled(&self) -> Vec<ScheduledEvent> {
        self.scheduled.lock().unwrap().iter().cloned().collect()
    }
}

impl Default for NullAudioEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioEngine for NullAudioEngine {
    fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
    }

    fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.scheduled.lock().unwrap().clear();
    }

    fn set_bpm(&self, bpm: f64) {
        debug!(bpm, "null engine tempo set");
    }

    fn current_time(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    fn schedule(&self, events: &[ScheduledEvent], offset_seconds: f64) {
        debug!(
            count = events.len(),
            offset_seconds, "null engine recording scheduled events"
        );
        let mut scheduled = self.scheduled.lock().unwrap();
        for event in events {
            if scheduled.len() == NULL_ENGINE_CAPACITY {
                scheduled.pop_front();
            }
            scheduled.push_back(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use barline_common::events::NoteEvent;

    fn event(audio_time: f64) -> ScheduledEvent {
        ScheduledEvent {
            event: NoteEvent {
                t_beat: 0.0,
                lane: None,
                pitches: vec![60],
                duration_beats: 1.0,
                velocity: 0.8,
                preset: None,
            },
            audio_time,
        }
    }

    #[test]
    fn null_engine_clock_advances() {
        let engine = NullAudioEngine::new();
        let a = engine.current_time();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(engine.current_time() > a);
    }

    #[test]
    fn null_engine_records_until_stopped() {
        let engine = NullAudioEngine::new();
        engine.start();
        engine.schedule(&[event(1.0), event(2.0)], 0.0);
        assert_eq!(engine.scheduled().len(), 2);
        engine.stop();
        assert!(engine.scheduled().is_empty());
    }

    #[test]
    fn null_engine_buffer_is_bounded() {
        let engine = NullAudioEngine::new();
        engine.start();
        for i in 0..(NULL_ENGINE_CAPACITY + 8) {
            engine.schedule(&[event(i as f64)], 0.0);
        }
        let kept = engine.scheduled();
        assert_eq!(kept.len(), NULL_ENGINE_CAPACITY);
        assert_eq!(kept[0].audio_time, 8.0);
    }
}
