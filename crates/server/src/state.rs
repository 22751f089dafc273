//! Shared server state.
//!
//! Contains channels, metrics, and the cached simulation snapshot shared
//! across handlers.
//!
//! # Design Principles
//!
//! - **Declarative**: State is data, handlers extract what they need
//! - **Modular**: State independent of route logic
//! - **SoC**: State holds snapshots, doesn't own the simulation

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{broadcast, RwLock};
use types::{Bot, BotId, MarketTick, Tick, Timestamp, Trade};

use crate::bridge::{SimCommand, TickUpdate};

// =============================================================================
// SimData - cached snapshot for REST reads
// =============================================================================

/// Latest simulation snapshot, cached for REST endpoints.
///
/// Written by `DataServiceHook` from the simulation thread; read by API
/// handlers. REST reads therefore never touch the engine.
#[derive(Debug, Default)]
pub struct SimData {
    /// Tick the snapshot was taken at.
    pub tick: Tick,
    /// Simulated timestamp (ms) of the snapshot.
    pub timestamp: Timestamp,
    /// All bots, in insertion order.
    pub bots: Vec<Bot>,
    /// All market tickers, in seed order.
    pub market: Vec<MarketTick>,
}

impl SimData {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up one bot in the snapshot.
    pub fn bot(&self, id: BotId) -> Option<&Bot> {
        self.bots.iter().find(|b| b.id == id)
    }

    /// A bot's trade history, newest first.
    pub fn trades_of(&self, id: BotId) -> Option<&[Trade]> {
        self.bot(id).map(|b| b.trades.as_slice())
    }

    /// Look up one pair's ticker in the snapshot.
    pub fn market_tick(&self, pair: &str) -> Option<&MarketTick> {
        self.market.iter().find(|t| t.pair == pair)
    }
}

// =============================================================================
// ServerState
// =============================================================================

/// Shared state for all route handlers.
///
/// Cloned into each handler via Axum's State extractor.
#[derive(Clone)]
pub struct ServerState {
    /// Broadcast channel for tick updates (simulation → clients).
    pub tick_tx: broadcast::Sender<TickUpdate>,

    /// Command sender (server → simulation).
    pub cmd_tx: crossbeam_channel::Sender<SimCommand>,

    /// Server start time.
    pub start_time: Instant,

    /// Shared metrics.
    pub metrics: Arc<ServerMetrics>,

    /// Cached simulation snapshot for REST endpoints.
    pub sim_data: Arc<RwLock<SimData>>,
}

impl ServerState {
    /// Create new server state with channels.
    pub fn new(
        tick_tx: broadcast::Sender<TickUpdate>,
        cmd_tx: crossbeam_channel::Sender<SimCommand>,
    ) -> Self {
        Self {
            tick_tx,
            cmd_tx,
            start_time: Instant::now(),
            metrics: Arc::new(ServerMetrics::new()),
            sim_data: Arc::new(RwLock::new(SimData::new())),
        }
    }

    /// Create server state around pre-shared snapshot and metrics handles
    /// (the same handles the simulation-side hooks write to).
    pub fn with_shared(
        tick_tx: broadcast::Sender<TickUpdate>,
        cmd_tx: crossbeam_channel::Sender<SimCommand>,
        sim_data: Arc<RwLock<SimData>>,
        metrics: Arc<ServerMetrics>,
    ) -> Self {
        Self {
            tick_tx,
            cmd_tx,
            start_time: Instant::now(),
            metrics,
            sim_data,
        }
    }

    /// Get uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Subscribe to tick updates.
    pub fn subscribe_ticks(&self) -> broadcast::Receiver<TickUpdate> {
        self.tick_tx.subscribe()
    }

    /// Send command to simulation.
    pub fn send_command(
        &self,
        cmd: SimCommand,
    ) -> Result<(), crossbeam_channel::SendError<SimCommand>> {
        self.cmd_tx.send(cmd)
    }
}

// =============================================================================
// ServerMetrics
// =============================================================================

/// Server-side metrics.
pub struct ServerMetrics {
    /// Current tick from simulation.
    pub current_tick: AtomicU64,
    /// Total bots in simulation.
    pub total_bots: AtomicU64,
    /// Bots in running status.
    pub running_bots: AtomicU64,
    /// Whether the tick loop is running.
    pub sim_running: AtomicBool,
    /// Active WebSocket connections.
    pub ws_connections: AtomicU64,
}

impl ServerMetrics {
    /// Create new metrics.
    pub fn new() -> Self {
        Self {
            current_tick: AtomicU64::new(0),
            total_bots: AtomicU64::new(0),
            running_bots: AtomicU64::new(0),
            sim_running: AtomicBool::new(false),
            ws_connections: AtomicU64::new(0),
        }
    }

    /// Update from a simulation snapshot.
    pub fn update_from_snapshot(&self, tick: u64, total: u64, running: u64) {
        self.current_tick.store(tick, Ordering::Relaxed);
        self.total_bots.store(total, Ordering::Relaxed);
        self.running_bots.store(running, Ordering::Relaxed);
    }

    /// Set whether the tick loop is running.
    pub fn set_sim_running(&self, running: bool) {
        self.sim_running.store(running, Ordering::Relaxed);
    }

    /// Increment WebSocket connection count.
    pub fn ws_connect(&self) {
        self.ws_connections.fetch_add(1, Ordering::Relaxed);
    }

    /// Decrement WebSocket connection count.
    pub fn ws_disconnect(&self) {
        self.ws_connections.fetch_sub(1, Ordering::Relaxed);
    }

    /// Get current tick.
    pub fn tick(&self) -> u64 {
        self.current_tick.load(Ordering::Relaxed)
    }

    /// Get bot count.
    pub fn bots(&self) -> u64 {
        self.total_bots.load(Ordering::Relaxed)
    }

    /// Get running bot count.
    pub fn running(&self) -> u64 {
        self.running_bots.load(Ordering::Relaxed)
    }

    /// Check if the tick loop is running.
    pub fn is_running(&self) -> bool {
        self.sim_running.load(Ordering::Relaxed)
    }

    /// Get WebSocket connection count.
    pub fn ws_count(&self) -> u64 {
        self.ws_connections.load(Ordering::Relaxed)
    }
}

impl Default for ServerMetrics {
    fn default() -> Self {
        Self::new()
    }
}
