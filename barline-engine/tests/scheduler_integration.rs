//! Transport scheduler integration tests
//!
//! Run under tokio's paused clock: the fake audio engine derives its clock
//! from `tokio::time::Instant`, so virtual sleeps advance playback
//! deterministically. Tempo is 80 bpm (0.75 s/beat, 3 s bars) with a 0.25 s
//! lookahead throughout.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::json;
use tokio::sync::Notify;
use tokio::time::{sleep, Duration, Instant};

use barline_common::config::SchedulerConfig;
use barline_common::events::{NoteEvent, ScheduledEvent, TransportEvent};
use barline_engine::audio::AudioEngine;
use barline_engine::compile::{CompileRequest, CompileResponse, CompileService};
use barline_engine::error::{Error, Result};
use barline_engine::graph::{FlowGraphSnapshot, FlowNode, FlowRuntime, InMemoryGraphStore};
use barline_engine::scheduler::TransportScheduler;
use barline_engine::state::SharedState;

/// Audio engine whose clock is the tokio test clock.
#[derive(Default)]
struct FakeAudioEngine {
    origin: Mutex<Option<Instant>>,
    scheduled: Mutex<Vec<ScheduledEvent>>,
    stopped: AtomicBool,
}

impl FakeAudioEngine {
    fn scheduled_events(&self) -> Vec<ScheduledEvent> {
        self.scheduled.lock().unwrap().clone()
    }
}

impl AudioEngine for FakeAudioEngine {
    fn start(&self) {
        *self.origin.lock().unwrap() = Some(Instant::now());
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    fn set_bpm(&self, _bpm: f64) {}

    fn current_time(&self) -> f64 {
        self.origin
            .lock()
            .unwrap()
            .map(|origin| origin.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn schedule(&self, events: &[ScheduledEvent], _offset_seconds: f64) {
        self.scheduled.lock().unwrap().extend_from_slice(events);
    }
}

fn note(t_beat: f64) -> NoteEvent {
    NoteEvent {
        t_beat,
        lane: None,
        pitches: vec![60, 64, 67],
        duration_beats: 1.0,
        velocity: 0.8,
        preset: None,
    }
}

/// Compile service that records every request and answers immediately.
struct RecordingCompiler {
    requests: Mutex<Vec<CompileRequest>>,
    /// When set, every response carries one event at this beat offset
    event_beat: Option<f64>,
    /// When true, responses thread a counter through `runtimeState`
    carry_state: bool,
}

impl RecordingCompiler {
    fn new(event_beat: Option<f64>) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            event_beat,
            carry_state: false,
        }
    }

    fn with_state_carry() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            event_beat: None,
            carry_state: true,
        }
    }

    fn bar_indexes(&self) -> Vec<u32> {
        self.requests.lock().unwrap().iter().map(|r| r.bar_index).collect()
    }

    fn requests(&self) -> Vec<CompileRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl CompileService for RecordingCompiler {
    fn compile(&self, request: CompileRequest) -> impl Future<Output = Result<CompileResponse>> + Send {
        let mut requests = self.requests.lock().unwrap();
        requests.push(request);
        let response = CompileResponse {
            events: self.event_beat.map(note).into_iter().collect(),
            runtime_state: self.carry_state.then(|| json!({ "count": requests.len() })),
            debug_trace: vec![],
            diagnostics: vec![],
        };
        drop(requests);
        async move { Ok(response) }
    }
}

/// Compile service that holds every call until released.
struct BlockingCompiler {
    calls: AtomicUsize,
    release: Arc<Notify>,
}

impl CompileService for BlockingCompiler {
    fn compile(&self, _request: CompileRequest) -> impl Future<Output = Result<CompileResponse>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let release = self.release.clone();
        async move {
            release.notified().await;
            Ok(CompileResponse {
                events: vec![note(0.0)],
                ..Default::default()
            })
        }
    }
}

/// Fails the first call, succeeds with events afterwards.
struct FlakyCompiler {
    calls: AtomicUsize,
}

impl CompileService for FlakyCompiler {
    fn compile(&self, _request: CompileRequest) -> impl Future<Output = Result<CompileResponse>> + Send {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        async move {
            if call == 0 {
                Err(Error::Compile("service unavailable".into()))
            } else {
                Ok(CompileResponse {
                    events: vec![note(0.0)],
                    ..Default::default()
                })
            }
        }
    }
}

fn test_config(loop_bars: u32) -> SchedulerConfig {
    SchedulerConfig {
        tick_interval_ms: 25,
        lookahead_sec: 0.25,
        beats_per_bar: 4,
        loop_bars,
        default_bpm: 80.0,
        error_log_interval_sec: 5,
    }
}

fn test_graph() -> FlowGraphSnapshot {
    FlowGraphSnapshot {
        nodes: vec![FlowNode {
            id: "node-1".into(),
            kind: "thought".into(),
            params: json!({ "styleId": "classical_film", "styleSeed": 12345 }),
        }],
        edges: vec![],
        runtime: FlowRuntime::default(),
    }
}

fn setup<C: CompileService + 'static>(
    compiler: Arc<C>,
    loop_bars: u32,
) -> (TransportScheduler<C>, Arc<SharedState>, Arc<FakeAudioEngine>) {
    let state = Arc::new(SharedState::new(80.0));
    let store = Arc::new(InMemoryGraphStore::new(test_graph()));
    let mut scheduler =
        TransportScheduler::new(test_config(loop_bars), store, compiler, state.clone(), 7);
    let audio = Arc::new(FakeAudioEngine::default());
    scheduler.attach_audio(audio.clone());
    (scheduler, state, audio)
}

/// Drain all currently buffered transport events.
fn drain_events(rx: &mut tokio::sync::broadcast::Receiver<TransportEvent>) -> Vec<TransportEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(tokio::sync::broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    events
}

#[tokio::test(start_paused = true)]
async fn bars_within_lookahead_compile_exactly_once() {
    let compiler = Arc::new(RecordingCompiler::new(None));
    let (scheduler, _state, _audio) = setup(compiler.clone(), 16);

    scheduler.start().await.unwrap();

    // 4.15 s at 80 bpm = beat 5.53; window end 5.87 covers bars 0 and 1
    sleep(Duration::from_millis(4150)).await;
    assert_eq!(compiler.bar_indexes(), vec![0, 1]);

    // bar 2 enters the window once the end passes beat 8 (t > 5.75 s)
    sleep(Duration::from_millis(1700)).await;
    assert_eq!(compiler.bar_indexes(), vec![0, 1, 2]);

    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn lookahead_window_only_advances() {
    let compiler = Arc::new(RecordingCompiler::new(None));
    let (scheduler, state, _audio) = setup(compiler, 16);
    let mut rx = state.subscribe_events();

    scheduler.start().await.unwrap();
    sleep(Duration::from_millis(2000)).await;
    scheduler.stop().await;

    let mut previous_end: Option<f64> = None;
    let mut windows = 0;
    for event in drain_events(&mut rx) {
        if let TransportEvent::ScheduleWindow {
            window_start_beat,
            window_end_beat,
            ..
        } = event
        {
            assert!(window_end_beat > window_start_beat);
            if let Some(end) = previous_end {
                assert!(
                    window_start_beat >= end - 1e-9,
                    "window re-covered dispatched beats: {window_start_beat} < {end}"
                );
            }
            previous_end = Some(window_end_beat);
            windows += 1;
        }
    }
    assert!(windows > 10);
}

#[tokio::test(start_paused = true)]
async fn loop_wrap_recompiles_under_new_absolute_bar() {
    let compiler = Arc::new(RecordingCompiler::new(None));
    // 2-bar loop: 8 beats = 6 s per cycle
    let (scheduler, _state, _audio) = setup(compiler.clone(), 2);

    scheduler.start().await.unwrap();
    // 6.2 s = beat 8.27; the window has crossed into the second cycle
    sleep(Duration::from_millis(6200)).await;
    scheduler.stop().await;

    // same visual slot, new absolute bar: loop-relative index wraps while
    // each absolute bar still compiles exactly once
    assert_eq!(compiler.bar_indexes(), vec![0, 1, 0]);
}

#[tokio::test(start_paused = true)]
async fn events_are_scheduled_at_absolute_audio_times() {
    let compiler = Arc::new(RecordingCompiler::new(Some(1.5)));
    let (scheduler, _state, audio) = setup(compiler, 16);

    scheduler.start().await.unwrap();
    sleep(Duration::from_millis(4150)).await;
    scheduler.stop().await;

    let scheduled = audio.scheduled_events();
    assert_eq!(scheduled.len(), 2);
    // epoch + (barOffset * 4 + 1.5) * 0.75
    assert!((scheduled[0].audio_time - 1.125).abs() < 1e-9);
    assert!((scheduled[1].audio_time - 4.125).abs() < 1e-9);
}

#[tokio::test(start_paused = true)]
async fn stop_discards_in_flight_results() {
    let release = Arc::new(Notify::new());
    let compiler = Arc::new(BlockingCompiler {
        calls: AtomicUsize::new(0),
        release: release.clone(),
    });
    let (scheduler, state, audio) = setup(compiler.clone(), 16);
    let mut rx = state.subscribe_events();

    scheduler.start().await.unwrap();
    sleep(Duration::from_millis(100)).await;
    assert_eq!(compiler.calls.load(Ordering::SeqCst), 1);

    scheduler.stop().await;
    release.notify_waiters();
    sleep(Duration::from_millis(100)).await;

    // the response landed after the session changed: nothing reaches the
    // engine and no bar events are recorded
    assert!(audio.scheduled_events().is_empty());
    let bar_events = drain_events(&mut rx)
        .into_iter()
        .filter(|e| matches!(e, TransportEvent::BarEvents { .. }))
        .count();
    assert_eq!(bar_events, 0);
    assert!(scheduler.events_for_bar(0).await.is_none());
}

#[tokio::test(start_paused = true)]
async fn compile_failure_logs_diagnostic_and_playback_continues() {
    let compiler = Arc::new(FlakyCompiler {
        calls: AtomicUsize::new(0),
    });
    let (scheduler, state, audio) = setup(compiler.clone(), 16);
    let mut rx = state.subscribe_events();

    scheduler.start().await.unwrap();
    sleep(Duration::from_millis(4150)).await;

    assert!(state.playing.load(Ordering::SeqCst));
    assert_eq!(compiler.calls.load(Ordering::SeqCst), 2);
    // bar 0 failed, bar 1 still produced events
    let scheduled = audio.scheduled_events();
    assert_eq!(scheduled.len(), 1);
    assert!((scheduled[0].audio_time - 3.0).abs() < 1e-9);

    let diagnostics: Vec<_> = drain_events(&mut rx)
        .into_iter()
        .filter_map(|e| match e {
            TransportEvent::Diagnostics { bar, diagnostics, .. } => Some((bar, diagnostics)),
            _ => None,
        })
        .collect();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].0, 0);
    assert!(diagnostics[0].1[0].is_error());

    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn runtime_state_threads_into_next_bar() {
    let compiler = Arc::new(RecordingCompiler::with_state_carry());
    let (scheduler, _state, _audio) = setup(compiler.clone(), 16);

    scheduler.start().await.unwrap();
    sleep(Duration::from_millis(7000)).await;
    scheduler.stop().await;

    let requests = compiler.requests();
    assert!(requests.len() >= 3);
    assert!(requests[0].runtime_state.is_none());
    assert_eq!(requests[1].runtime_state, Some(json!({ "count": 1 })));
    assert_eq!(requests[2].runtime_state, Some(json!({ "count": 2 })));
}

#[tokio::test(start_paused = true)]
async fn restart_resets_compiled_bars_under_new_session() {
    let compiler = Arc::new(RecordingCompiler::new(None));
    let (scheduler, state, _audio) = setup(compiler.clone(), 16);

    scheduler.start().await.unwrap();
    sleep(Duration::from_millis(1000)).await;
    let first_session = state.current_session();
    scheduler.stop().await;

    sleep(Duration::from_millis(100)).await;
    scheduler.start().await.unwrap();
    assert!(state.current_session() > first_session);
    sleep(Duration::from_millis(1000)).await;
    scheduler.stop().await;

    // bar 0 compiles once per session
    let zeros = compiler.bar_indexes().iter().filter(|&&b| b == 0).count();
    assert_eq!(zeros, 2);
}

#[tokio::test]
async fn start_without_audio_engine_is_fatal() {
    let compiler = Arc::new(RecordingCompiler::new(None));
    let state = Arc::new(SharedState::new(80.0));
    let store = Arc::new(InMemoryGraphStore::new(test_graph()));
    let scheduler = TransportScheduler::new(test_config(16), store, compiler, state.clone(), 7);

    let result = scheduler.start().await;
    assert!(matches!(result, Err(Error::AudioEngine(_))));
    assert!(!state.playing.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn thought_nodes_arrive_resolved_in_payload() {
    let compiler = Arc::new(RecordingCompiler::new(None));
    let (scheduler, _state, _audio) = setup(compiler.clone(), 16);

    scheduler.start().await.unwrap();
    sleep(Duration::from_millis(100)).await;
    scheduler.stop().await;

    let requests = compiler.requests();
    assert!(!requests.is_empty());
    let node = &requests[0].flow_graph["nodes"][0];
    assert_eq!(node["params"]["style"]["seed"], 12345);
    assert_eq!(node["resolved"]["styleId"], "classical_film");
    assert!(node["resolved"]["notePatternId"].is_string());
    assert_eq!(requests[0].beat_start, 0.0);
    assert_eq!(requests[0].beat_end, 4.0);
}
