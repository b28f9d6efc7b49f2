//! Musical time conversions
//!
//! The transport works in three time domains:
//!
//! 1. **Audio-clock seconds**: absolute output-clock time read from the
//!    audio engine; the epoch is captured at `start()`.
//! 2. **Absolute beats**: `f64` beats elapsed since the epoch at the current
//!    tempo. Monotonic for the lifetime of a playback session.
//! 3. **Bars**: an absolute, session-monotonic integer bar index. The visual
//!    loop wraps bars modulo the configured loop length, but scheduling
//!    identity always uses the absolute index.

/// Seconds per beat at the given tempo.
#[inline]
pub fn seconds_per_beat(bpm: f64) -> f64 {
    60.0 / bpm
}

/// Absolute beat position for a given elapsed audio-clock time.
#[inline]
pub fn elapsed_to_beats(elapsed_sec: f64, bpm: f64) -> f64 {
    elapsed_sec / seconds_per_beat(bpm)
}

/// Absolute bar index containing the given absolute beat.
#[inline]
pub fn bar_of_beat(beat: f64, beats_per_bar: u32) -> i64 {
    (beat / beats_per_bar as f64).floor() as i64
}

/// Beat position within its bar, always in `[0, beats_per_bar)`.
#[inline]
pub fn beat_in_bar(beat: f64, beats_per_bar: u32) -> f64 {
    let bpb = beats_per_bar as f64;
    ((beat % bpb) + bpb) % bpb
}

/// Wrap an absolute bar index to the visual loop length.
///
/// Presentation-only: compilation identity stays absolute.
#[inline]
pub fn visual_bar(absolute_bar: i64, loop_bars: u32) -> u32 {
    let lb = loop_bars as i64;
    (((absolute_bar % lb) + lb) % lb) as u32
}

/// Absolute audio-clock timestamp for an event within a compiled bar.
///
/// `cycle_start_beat` is the absolute beat of the loop-cycle origin and
/// `bar_offset` the loop-relative bar the event belongs to.
#[inline]
pub fn event_audio_time(
    epoch_sec: f64,
    cycle_start_beat: f64,
    bar_offset: u32,
    beats_per_bar: u32,
    t_beat: f64,
    seconds_per_beat: f64,
) -> f64 {
    let absolute_beat = cycle_start_beat + bar_offset as f64 * beats_per_bar as f64 + t_beat;
    epoch_sec + absolute_beat * seconds_per_beat
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_per_beat_at_80_bpm() {
        assert!((seconds_per_beat(80.0) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn elapsed_to_beats_matches_tempo() {
        // 4.1 s at 80 bpm = 5.4666... beats
        let beats = elapsed_to_beats(4.1, 80.0);
        assert!((beats - 4.1 / 0.75).abs() < 1e-12);
    }

    #[test]
    fn bar_of_beat_floors() {
        assert_eq!(bar_of_beat(0.0, 4), 0);
        assert_eq!(bar_of_beat(3.999, 4), 0);
        assert_eq!(bar_of_beat(4.0, 4), 1);
        assert_eq!(bar_of_beat(5.8, 4), 1);
    }

    #[test]
    fn beat_in_bar_stays_in_range() {
        assert!((beat_in_bar(5.5, 4) - 1.5).abs() < 1e-12);
        assert!((beat_in_bar(4.0, 4) - 0.0).abs() < 1e-12);
    }

    #[test]
    fn visual_bar_wraps_to_loop() {
        assert_eq!(visual_bar(0, 16), 0);
        assert_eq!(visual_bar(15, 16), 15);
        assert_eq!(visual_bar(16, 16), 0);
        assert_eq!(visual_bar(33, 16), 1);
    }

    #[test]
    fn event_audio_time_formula() {
        // epoch + (cycleStart + barOffset * beatsPerBar + tBeat) * secondsPerBeat
        let t = event_audio_time(10.0, 64.0, 2, 4, 1.5, 0.75);
        assert!((t - (10.0 + (64.0 + 8.0 + 1.5) * 0.75)).abs() < 1e-12);
    }
}
