//! SimulationHook implementations feeding the server.
//!
//! Provides the bridge from sync simulation to async server via hooks.
//!
//! # Architecture
//!
//! ```text
//! Simulation (sync)         BroadcastHook            Server (async)
//!       │                        │                        │
//!       │── on_snapshot() ──────▶│                        │
//!       │                        │── tick_tx.send() ─────▶│── ws broadcast
//!       │                        │                        │
//!       │                   DataServiceHook               │
//!       │── on_snapshot() ──────▶│                        │
//!       │                        │── SimData write ──────▶│── REST reads
//! ```
//!
//! Both hooks run on the simulation thread. `DataServiceHook` takes the
//! snapshot lock with `blocking_write`; it must never be driven from inside
//! the async runtime.

use std::sync::Arc;

use simulation::{HookContext, SimulationHook};
use tokio::sync::{broadcast, RwLock};
use types::Bot;

use crate::bridge::TickUpdate;
use crate::state::{ServerMetrics, SimData};

// =============================================================================
// BroadcastHook
// =============================================================================

/// Hook that forwards every snapshot into a tokio broadcast channel.
///
/// WebSocket handlers subscribe to the channel and push the JSON to clients.
pub struct BroadcastHook {
    /// Broadcast sender for tick updates.
    tick_tx: broadcast::Sender<TickUpdate>,
}

impl BroadcastHook {
    /// Create a new broadcast hook.
    pub fn new(tick_tx: broadcast::Sender<TickUpdate>) -> Self {
        Self { tick_tx }
    }

    /// Get a sender handle for server state.
    pub fn sender(&self) -> broadcast::Sender<TickUpdate> {
        self.tick_tx.clone()
    }

    fn build_update(&self, bots: &[Bot], ctx: &HookContext) -> TickUpdate {
        TickUpdate {
            tick: ctx.tick,
            timestamp: ctx.timestamp,
            bots: bots.to_vec(),
            market: ctx.market.clone(),
        }
    }
}

impl SimulationHook for BroadcastHook {
    fn name(&self) -> &str {
        "Broadcast"
    }

    fn on_snapshot(&self, bots: &[Bot], ctx: &HookContext) {
        let update = self.build_update(bots, ctx);

        // Fire-and-forget: if no receivers, drop the message
        let _ = self.tick_tx.send(update);
    }
}

// =============================================================================
// DataServiceHook
// =============================================================================

/// Hook that caches the latest snapshot for REST endpoints and keeps the
/// shared server metrics current.
pub struct DataServiceHook {
    sim_data: Arc<RwLock<SimData>>,
    metrics: Arc<ServerMetrics>,
}

impl DataServiceHook {
    /// Create a new data service hook around shared handles.
    pub fn new(sim_data: Arc<RwLock<SimData>>, metrics: Arc<ServerMetrics>) -> Self {
        Self { sim_data, metrics }
    }
}

impl SimulationHook for DataServiceHook {
    fn name(&self) -> &str {
        "DataService"
    }

    fn on_snapshot(&self, bots: &[Bot], ctx: &HookContext) {
        let running = bots.iter().filter(|b| b.is_running()).count() as u64;
        self.metrics
            .update_from_snapshot(ctx.tick, bots.len() as u64, running);

        // Runs on the simulation thread, outside the async runtime.
        let mut data = self.sim_data.blocking_write();
        data.tick = ctx.tick;
        data.timestamp = ctx.timestamp;
        data.bots = bots.to_vec();
        data.market = ctx.market.clone();
    }
}
