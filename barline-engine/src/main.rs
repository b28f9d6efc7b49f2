//! Barline transport engine - Main entry point
//!
//! Runs the transport scheduler against a remote compile service, driving a
//! headless (null) audio engine. Display surfaces attach over the transport
//! event broadcast; this binary just logs them.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use barline_common::config::BarlineConfig;
use barline_engine::audio::NullAudioEngine;
use barline_engine::compile::HttpCompileService;
use barline_engine::graph::{FlowGraphSnapshot, InMemoryGraphStore};
use barline_engine::scheduler::TransportScheduler;
use barline_engine::state::SharedState;

/// Command-line arguments for barline-engine
#[derive(Parser, Debug)]
#[command(name = "barline-engine")]
#[command(about = "Live transport scheduler for the Barline playback core")]
#[command(version)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "barline.toml", env = "BARLINE_CONFIG")]
    config: PathBuf,

    /// Path to a JSON flow-graph file to play
    #[arg(short, long, env = "BARLINE_GRAPH")]
    graph: Option<PathBuf>,

    /// Tempo in beats per minute (overrides the config default)
    #[arg(short, long, env = "BARLINE_BPM")]
    bpm: Option<f64>,

    /// Scheduling seed forwarded to the compile service
    #[arg(short, long, default_value = "1", env = "BARLINE_SEED")]
    seed: u32,

    /// Compile service base URL (overrides the config value)
    #[arg(long, env = "BARLINE_COMPILE_URL")]
    compile_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "barline_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = BarlineConfig::load(&args.config).context("Failed to load configuration")?;
    if let Some(url) = args.compile_url {
        config.compile.base_url = url;
    }
    let bpm = args.bpm.unwrap_or(config.scheduler.default_bpm);

    info!(
        compile_url = %config.compile.base_url,
        bpm,
        seed = args.seed,
        "Starting Barline transport"
    );

    let graph = match &args.graph {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read flow graph {}", path.display()))?;
            serde_json::from_str::<FlowGraphSnapshot>(&raw)
                .with_context(|| format!("Failed to parse flow graph {}", path.display()))?
        }
        None => FlowGraphSnapshot::default(),
    };
    info!(nodes = graph.nodes.len(), edges = graph.edges.len(), "Flow graph loaded");

    let store = Arc::new(InMemoryGraphStore::new(graph));
    let compiler = Arc::new(
        HttpCompileService::new(&config.compile).context("Failed to build compile client")?,
    );
    let state = Arc::new(SharedState::new(bpm));

    let mut scheduler =
        TransportScheduler::new(config.scheduler.clone(), store, compiler, state.clone(), args.seed);
    scheduler.attach_audio(Arc::new(NullAudioEngine::new()));

    let mut events = state.subscribe_events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            tracing::debug!(?event, "transport event");
        }
    });

    scheduler.start().await.context("Failed to start playback")?;
    info!("Playback started; press Ctrl+C to stop");

    shutdown_signal().await;

    scheduler.stop().await;
    info!("Transport shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
