//! Shared transport state
//!
//! One `SharedState` is held by the scheduler and any display surface.
//! Mutable fields use RwLock for concurrent read access with rare writes;
//! the session counter is atomic because it is checked after every await
//! point in async dispatch work.

use barline_common::events::TransportEvent;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::{broadcast, RwLock};

/// Playhead position derived each tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransportPosition {
    /// Absolute beat since the session epoch
    pub beat: f64,
    /// Absolute bar index
    pub bar: i64,
    /// Beat within the current bar
    pub beat_in_bar: f64,
}

/// Shared state accessible by all transport components
pub struct SharedState {
    /// Whether a playback session is live
    pub playing: AtomicBool,

    /// Playback session token. Bumped on every start and stop; async
    /// results tagged with an older value are discarded.
    session: AtomicU64,

    /// Current tempo in beats per minute
    pub bpm: RwLock<f64>,

    /// Playhead position as of the last tick
    pub position: RwLock<TransportPosition>,

    /// Event broadcaster for display surfaces
    event_tx: broadcast::Sender<TransportEvent>,
}

impl SharedState {
    pub fn new(default_bpm: f64) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self {
            playing: AtomicBool::new(false),
            session: AtomicU64::new(0),
            bpm: RwLock::new(default_bpm),
            position: RwLock::new(TransportPosition::default()),
            event_tx,
        }
    }

    /// The currently live session token.
    pub fn current_session(&self) -> u64 {
        self.session.load(Ordering::SeqCst)
    }

    /// Invalidate all in-flight work and return the new session token.
    pub fn bump_session(&self) -> u64 {
        self.session.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Broadcast an event to all listeners. No receivers is fine.
    pub fn broadcast_event(&self, event: TransportEvent) {
        let _ = self.event_tx.send(event);
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<TransportEvent> {
        self.event_tx.subscribe()
    }
}
