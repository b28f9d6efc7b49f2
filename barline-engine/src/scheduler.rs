//! Transport scheduler
//!
//! Maintains a lookahead window over the audio clock and turns it into
//! exactly-once per-bar compile requests. Two tasks per playback session:
//!
//! - the **tick loop** polls the audio clock on a fixed interval, advances
//!   the (monotonic) lookahead window, updates display counters, and hands
//!   window segments to the dispatcher over a channel
//! - the **bar dispatcher** is a single sequential consumer: it fully
//!   settles one bar's compile call before starting the next, so bar N's
//!   request is always issued before bar N+1's despite network latency
//!
//! Compilation identity is the absolute bar index. The visual loop wraps
//! bars for presentation only; crossing a loop boundary re-compiles the
//! same visual slot under a new absolute bar.
//!
//! `stop()` bumps the session token. Every piece of async work re-checks
//! the token after each await and silently drops stale results; there is no
//! per-call cancellation.

use crate::audio::AudioEngine;
use crate::compile::{CompileResponse, CompileService};
use crate::error::{Error, Result};
use crate::graph::FlowGraphStore;
use crate::payload::build_compile_payload;
use crate::state::{SharedState, TransportPosition};
use barline_common::config::SchedulerConfig;
use barline_common::events::{Diagnostic, ScheduledEvent, TransportEvent};
use barline_common::time::{
    bar_of_beat, beat_in_bar, elapsed_to_beats, event_audio_time, seconds_per_beat, visual_bar,
};
use barline_music::catalog::Capabilities;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// One loop-cycle slice of the lookahead window, ready for dispatch.
#[derive(Debug, Clone)]
struct Segment {
    /// Session token captured when the window advanced
    session: u64,
    /// Absolute beat where this segment's loop cycle begins
    cycle_start_beat: f64,
    /// Absolute bar index of the cycle's first bar
    cycle_base_bar: i64,
    /// Loop-relative bar offsets touched, inclusive
    first_offset: u32,
    last_offset: u32,
    /// Tempo in effect when the window advanced
    bpm: f64,
}

/// Split an absolute-beat window at visual-loop boundaries.
fn split_window(
    start: f64,
    end: f64,
    beats_per_bar: u32,
    loop_bars: u32,
    session: u64,
    bpm: f64,
) -> Vec<Segment> {
    let bpb = beats_per_bar as f64;
    let loop_beats = bpb * loop_bars as f64;
    let mut segments = Vec::new();
    let mut cursor = start;
    while cursor < end {
        let cycle_index = (cursor / loop_beats).floor();
        let cycle_start = cycle_index * loop_beats;
        let segment_end = end.min(cycle_start + loop_beats);
        let first_offset = ((cursor - cycle_start) / bpb).floor() as u32;
        let last_offset = (((segment_end - cycle_start) / bpb).ceil() as u32)
            .saturating_sub(1)
            .min(loop_bars - 1)
            .max(first_offset);
        segments.push(Segment {
            session,
            cycle_start_beat: cycle_start,
            cycle_base_bar: cycle_index as i64 * loop_bars as i64,
            first_offset,
            last_offset,
            bpm,
        });
        cursor = segment_end;
    }
    segments
}

/// Events retained per visual bar slot for display.
///
/// Each slot remembers which absolute bar produced it; crossing into a new
/// cycle evicts the previous cycle's entry for that slot.
#[derive(Default)]
pub struct BarEventBuffer {
    slots: HashMap<u32, (i64, Vec<ScheduledEvent>)>,
}

impl BarEventBuffer {
    fn record(&mut self, visual: u32, absolute: i64, events: Vec<ScheduledEvent>) {
        self.slots.insert(visual, (absolute, events));
    }

    fn rotate(&mut self, entering_absolute: i64, loop_bars: u32) {
        let visual = visual_bar(entering_absolute, loop_bars);
        if let Some((absolute, _)) = self.slots.get(&visual) {
            if *absolute != entering_absolute {
                self.slots.remove(&visual);
            }
        }
    }

    pub fn events_for(&self, visual: u32) -> Option<&[ScheduledEvent]> {
        self.slots.get(&visual).map(|(_, events)| events.as_slice())
    }

    fn clear(&mut self) {
        self.slots.clear();
    }
}

/// The transport state machine: Idle until `start()`, Playing until
/// `stop()`.
pub struct TransportScheduler<C: CompileService + 'static> {
    state: Arc<SharedState>,
    config: SchedulerConfig,
    graph: Arc<dyn FlowGraphStore>,
    compiler: Arc<C>,
    audio: Option<Arc<dyn AudioEngine>>,
    capabilities: Capabilities,
    seed: u32,
    bar_events: Arc<tokio::sync::Mutex<BarEventBuffer>>,
    tick_task: Mutex<Option<JoinHandle<()>>>,
    dispatch_task: Mutex<Option<JoinHandle<()>>>,
}

impl<C: CompileService + 'static> TransportScheduler<C> {
    pub fn new(
        config: SchedulerConfig,
        graph: Arc<dyn FlowGraphStore>,
        compiler: Arc<C>,
        state: Arc<SharedState>,
        seed: u32,
    ) -> Self {
        Self {
            state,
            config,
            graph,
            compiler,
            audio: None,
            capabilities: Capabilities::default(),
            seed,
            bar_events: Arc::new(tokio::sync::Mutex::new(BarEventBuffer::default())),
            tick_task: Mutex::new(None),
            dispatch_task: Mutex::new(None),
        }
    }

    pub fn attach_audio(&mut self, audio: Arc<dyn AudioEngine>) {
        self.audio = Some(audio);
    }

    pub fn set_capabilities(&mut self, capabilities: Capabilities) {
        self.capabilities = capabilities;
    }

    /// Update the tempo for subsequent window computations.
    pub async fn set_bpm(&self, bpm: f64) {
        *self.state.bpm.write().await = bpm;
        if let Some(audio) = &self.audio {
            audio.set_bpm(bpm);
        }
    }

    /// Events currently retained for a visual bar slot.
    pub async fn events_for_bar(&self, visual: u32) -> Option<Vec<ScheduledEvent>> {
        self.bar_events
            .lock()
            .await
            .events_for(visual)
            .map(<[ScheduledEvent]>::to_vec)
    }

    /// Idle → Playing. Fails if no audio engine is attached; playback never
    /// begins without a clock to schedule against.
    pub async fn start(&self) -> Result<()> {
        let audio = self
            .audio
            .clone()
            .ok_or_else(|| Error::AudioEngine("no audio engine attached".into()))?;
        if self.state.playing.swap(true, Ordering::SeqCst) {
            return Err(Error::InvalidState("transport already playing".into()));
        }

        let session = self.state.bump_session();
        let bpm = *self.state.bpm.read().await;
        audio.set_bpm(bpm);
        audio.start();
        let epoch = audio.current_time();

        *self.state.position.write().await = TransportPosition::default();
        self.bar_events.lock().await.clear();
        self.state.broadcast_event(TransportEvent::PlaybackStarted {
            session,
            bpm,
            timestamp: chrono::Utc::now(),
        });
        info!(session, bpm, epoch, "playback started");

        let (segment_tx, segment_rx) = mpsc::channel::<Segment>(64);

        let dispatcher = BarDispatcher {
            state: self.state.clone(),
            config: self.config.clone(),
            graph: self.graph.clone(),
            compiler: self.compiler.clone(),
            audio: audio.clone(),
            capabilities: self.capabilities.clone(),
            seed: self.seed,
            session,
            epoch,
            bar_events: self.bar_events.clone(),
        };
        let dispatch_task = tokio::spawn(dispatcher.run(segment_rx));

        let ticker = TickLoop {
            state: self.state.clone(),
            config: self.config.clone(),
            audio,
            session,
            epoch,
            bar_events: self.bar_events.clone(),
        };
        let tick_task = tokio::spawn(ticker.run(segment_tx));

        *self.tick_task.lock().expect("task slot poisoned") = Some(tick_task);
        *self.dispatch_task.lock().expect("task slot poisoned") = Some(dispatch_task);
        Ok(())
    }

    /// Playing → Idle. Invalidates in-flight compile work via the session
    /// token; results that land afterwards are dropped, not cancelled.
    pub async fn stop(&self) {
        if !self.state.playing.swap(false, Ordering::SeqCst) {
            return;
        }
        let ended = self.state.current_session();
        self.state.bump_session();

        if let Some(handle) = self.tick_task.lock().expect("task slot poisoned").take() {
            handle.abort();
        }
        // The dispatcher drains on its own once the tick task's sender is
        // gone; buffered segments fail the session check and are dropped.

        if let Some(audio) = &self.audio {
            audio.stop();
        }
        self.state.broadcast_event(TransportEvent::PlaybackStopped {
            session: ended,
            timestamp: chrono::Utc::now(),
        });
        info!(session = ended, "playback stopped");
    }
}

/// Fixed-interval polling task: one instance per playback session.
struct TickLoop {
    state: Arc<SharedState>,
    config: SchedulerConfig,
    audio: Arc<dyn AudioEngine>,
    session: u64,
    epoch: f64,
    bar_events: Arc<tokio::sync::Mutex<BarEventBuffer>>,
}

impl TickLoop {
    async fn run(self, segment_tx: mpsc::Sender<Segment>) {
        let mut interval = tokio::time::interval(Duration::from_millis(self.config.tick_interval_ms));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // High-water mark of dispatched beats; the window only advances.
        let mut scheduled_through = 0.0_f64;
        let mut last_bar: Option<i64> = None;

        loop {
            interval.tick().await;
            if self.state.current_session() != self.session {
                break;
            }

            let bpm = *self.state.bpm.read().await;
            let spb = seconds_per_beat(bpm);
            let elapsed = (self.audio.current_time() - self.epoch).max(0.0);
            let current_beat = elapsed_to_beats(elapsed, bpm);
            let bar = bar_of_beat(current_beat, self.config.beats_per_bar);
            let beat_pos = beat_in_bar(current_beat, self.config.beats_per_bar);

            *self.state.position.write().await = TransportPosition {
                beat: current_beat,
                bar,
                beat_in_bar: beat_pos,
            };

            if last_bar != Some(bar) {
                self.bar_events.lock().await.rotate(bar, self.config.loop_bars);
                self.state.broadcast_event(TransportEvent::BarAdvanced {
                    bar: visual_bar(bar, self.config.loop_bars),
                    beat_in_bar: beat_pos,
                    timestamp: chrono::Utc::now(),
                });
                last_bar = Some(bar);
            }

            let window_start = current_beat.max(scheduled_through);
            let window_end = current_beat + self.config.lookahead_sec / spb;
            if window_end <= window_start {
                continue;
            }
            scheduled_through = window_end;

            self.state.broadcast_event(TransportEvent::ScheduleWindow {
                window_start_beat: window_start,
                window_end_beat: window_end,
                timestamp: chrono::Utc::now(),
            });

            for segment in split_window(
                window_start,
                window_end,
                self.config.beats_per_bar,
                self.config.loop_bars,
                self.session,
                bpm,
            ) {
                if segment_tx.send(segment).await.is_err() {
                    return;
                }
            }
        }
        debug!(session = self.session, "tick loop ended");
    }
}

/// Single sequential consumer of window segments.
///
/// Owns the compiled-bar set and the opaque runtime state for one session;
/// both die with the task.
struct BarDispatcher<C: CompileService> {
    state: Arc<SharedState>,
    config: SchedulerConfig,
    graph: Arc<dyn FlowGraphStore>,
    compiler: Arc<C>,
    audio: Arc<dyn AudioEngine>,
    capabilities: Capabilities,
    seed: u32,
    session: u64,
    epoch: f64,
    bar_events: Arc<tokio::sync::Mutex<BarEventBuffer>>,
}

impl<C: CompileService> BarDispatcher<C> {
    async fn run(self, mut segment_rx: mpsc::Receiver<Segment>) {
        let mut compiled: HashSet<i64> = HashSet::new();
        let mut runtime_state: Option<Value> = None;
        let mut last_error_log: Option<Instant> = None;

        while let Some(segment) = segment_rx.recv().await {
            if segment.session != self.session || self.state.current_session() != self.session {
                continue;
            }
            for offset in segment.first_offset..=segment.last_offset {
                let absolute_bar = segment.cycle_base_bar + offset as i64;
                // A bar is compiled at most once per session, even when
                // timer jitter re-examines beats the window already covered.
                if !compiled.insert(absolute_bar) {
                    continue;
                }
                self.dispatch_bar(
                    &segment,
                    offset,
                    absolute_bar,
                    &mut runtime_state,
                    &mut last_error_log,
                )
                .await;
            }
        }
        debug!(session = self.session, "dispatcher ended");
    }

    async fn dispatch_bar(
        &self,
        segment: &Segment,
        offset: u32,
        absolute_bar: i64,
        runtime_state: &mut Option<Value>,
        last_error_log: &mut Option<Instant>,
    ) {
        let bpb = self.config.beats_per_bar;
        let beat_start = (offset * bpb) as f64;
        let beat_end = beat_start + bpb as f64;
        let request = build_compile_payload(
            &self.graph.snapshot(),
            offset,
            beat_start,
            beat_end,
            runtime_state.clone(),
            self.seed,
            segment.bpm,
            &self.capabilities,
        );

        let result = self.compiler.compile(request).await;
        if self.state.current_session() != self.session {
            debug!(absolute_bar, "discarding stale compile result");
            return;
        }

        match result {
            Ok(response) => {
                self.consume_response(segment, offset, absolute_bar, response, runtime_state)
                    .await;
            }
            Err(error) => {
                let now = Instant::now();
                let quiet = Duration::from_secs(self.config.error_log_interval_sec);
                if last_error_log.map_or(true, |t| now.duration_since(t) >= quiet) {
                    warn!(absolute_bar, %error, "bar compile failed");
                    *last_error_log = Some(now);
                }
                self.state.broadcast_event(TransportEvent::Diagnostics {
                    bar: visual_bar(absolute_bar, self.config.loop_bars),
                    diagnostics: vec![Diagnostic::error(format!("compile failed: {error}"))],
                    timestamp: chrono::Utc::now(),
                });
            }
        }
    }

    async fn consume_response(
        &self,
        segment: &Segment,
        offset: u32,
        absolute_bar: i64,
        response: CompileResponse,
        runtime_state: &mut Option<Value>,
    ) {
        // Thread the opaque carry-value into the next bar's request. A
        // response without one keeps the previous value alive.
        if response.runtime_state.is_some() {
            *runtime_state = response.runtime_state;
        }

        let spb = seconds_per_beat(segment.bpm);
        let scheduled: Vec<ScheduledEvent> = response
            .events
            .into_iter()
            .map(|event| {
                let audio_time = event_audio_time(
                    self.epoch,
                    segment.cycle_start_beat,
                    offset,
                    self.config.beats_per_bar,
                    event.t_beat,
                    spb,
                );
                ScheduledEvent { event, audio_time }
            })
            .collect();

        let visual = visual_bar(absolute_bar, self.config.loop_bars);
        self.bar_events
            .lock()
            .await
            .record(visual, absolute_bar, scheduled.clone());
        self.state.broadcast_event(TransportEvent::BarEvents {
            bar: visual,
            events: scheduled.clone(),
            timestamp: chrono::Utc::now(),
        });
        if !response.diagnostics.is_empty() {
            self.state.broadcast_event(TransportEvent::Diagnostics {
                bar: visual,
                diagnostics: response.diagnostics,
                timestamp: chrono::Utc::now(),
            });
        }
        if !response.debug_trace.is_empty() {
            self.state.broadcast_event(TransportEvent::DebugTrace {
                lines: response.debug_trace,
                timestamp: chrono::Utc::now(),
            });
        }

        if !scheduled.is_empty() {
            self.audio.schedule(&scheduled, 0.0);
        }
        debug!(absolute_bar, visual, events = scheduled.len(), "bar dispatched");
    }
}
