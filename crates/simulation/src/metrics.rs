//! MetricsHook - Built-in hook for aggregating simulation statistics.
//!
//! Collects per-tick metrics and computes aggregate statistics.
//! Useful for headless runs and post-simulation reports.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use types::Bot;

use crate::hooks::{HookContext, SimulationHook};
use crate::SimulationStats;

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Total ticks processed.
    pub total_ticks: u64,
    /// Total snapshots received (ticks plus out-of-band publishes).
    pub total_snapshots: u64,
    /// Total trades filled.
    pub total_trades: u64,
    /// Average trades per tick.
    pub avg_trades_per_tick: f64,
    /// Peak trades in a single tick.
    pub peak_trades_per_tick: u64,
    /// Peak number of simultaneously running bots.
    pub peak_running_bots: u64,
}

/// Built-in hook for collecting simulation metrics.
///
/// Thread-safe via atomics and mutex for interior mutability.
/// Designed for efficient per-tick updates.
///
/// # Example
///
/// ```ignore
/// use simulation::{MetricsHook, Simulation};
/// use std::sync::Arc;
///
/// let metrics = Arc::new(MetricsHook::new());
/// let mut sim = Simulation::with_defaults();
/// sim.subscribe(metrics.clone());
/// sim.run(100);
/// println!("Avg trades/tick: {:.2}", metrics.snapshot().avg_trades_per_tick);
/// ```
pub struct MetricsHook {
    /// Total ticks seen.
    tick_count: AtomicU64,
    /// Total snapshots seen.
    snapshot_count: AtomicU64,
    /// Total trades seen.
    trade_count: AtomicU64,
    /// Peak trades in a single tick.
    peak_trades: AtomicU64,
    /// Peak running bots across all snapshots.
    peak_running: AtomicU64,
    /// Per-tick trade counts (for variance/distribution analysis).
    /// Limited to max_history entries to bound memory.
    trade_history: Mutex<Vec<u64>>,
    /// Maximum history entries to keep.
    max_history: usize,
}

impl MetricsHook {
    /// Create a new metrics hook with default settings.
    pub fn new() -> Self {
        Self::with_max_history(10_000)
    }

    /// Create a metrics hook with custom history limit.
    pub fn with_max_history(max_history: usize) -> Self {
        Self {
            tick_count: AtomicU64::new(0),
            snapshot_count: AtomicU64::new(0),
            trade_count: AtomicU64::new(0),
            peak_trades: AtomicU64::new(0),
            peak_running: AtomicU64::new(0),
            trade_history: Mutex::new(Vec::with_capacity(max_history.min(10_000))),
            max_history,
        }
    }

    /// Get a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        let total_ticks = self.tick_count.load(Ordering::Relaxed);
        let total_trades = self.trade_count.load(Ordering::Relaxed);

        let avg_trades = if total_ticks > 0 {
            total_trades as f64 / total_ticks as f64
        } else {
            0.0
        };

        MetricsSnapshot {
            total_ticks,
            total_snapshots: self.snapshot_count.load(Ordering::Relaxed),
            total_trades,
            avg_trades_per_tick: avg_trades,
            peak_trades_per_tick: self.peak_trades.load(Ordering::Relaxed),
            peak_running_bots: self.peak_running.load(Ordering::Relaxed),
        }
    }

    /// Get the per-tick trade count history (for variance analysis).
    pub fn trade_history(&self) -> Vec<u64> {
        self.trade_history.lock().clone()
    }

    /// Reset all metrics.
    pub fn reset(&self) {
        self.tick_count.store(0, Ordering::Relaxed);
        self.snapshot_count.store(0, Ordering::Relaxed);
        self.trade_count.store(0, Ordering::Relaxed);
        self.peak_trades.store(0, Ordering::Relaxed);
        self.peak_running.store(0, Ordering::Relaxed);
        self.trade_history.lock().clear();
    }

    /// Update peak value atomically (CAS loop).
    fn update_peak(peak: &AtomicU64, value: u64) {
        let mut current = peak.load(Ordering::Relaxed);
        while value > current {
            match peak.compare_exchange_weak(current, value, Ordering::Relaxed, Ordering::Relaxed) {
                Ok(_) => break,
                Err(actual) => current = actual,
            }
        }
    }
}

impl Default for MetricsHook {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationHook for MetricsHook {
    fn name(&self) -> &str {
        "Metrics"
    }

    fn on_snapshot(&self, bots: &[Bot], _ctx: &HookContext) {
        self.snapshot_count.fetch_add(1, Ordering::Relaxed);
        let running = bots.iter().filter(|b| b.is_running()).count() as u64;
        Self::update_peak(&self.peak_running, running);
    }

    fn on_tick_end(&self, stats: &SimulationStats, _ctx: &HookContext) {
        self.tick_count.fetch_add(1, Ordering::Relaxed);
        let trades = stats.trades_this_tick as u64;
        self.trade_count.fetch_add(trades, Ordering::Relaxed);
        Self::update_peak(&self.peak_trades, trades);

        // Record in history (bounded)
        let mut history = self.trade_history.lock();
        if history.len() < self.max_history {
            history.push(trades);
        }
    }

    fn on_simulation_end(&self, final_stats: &SimulationStats) {
        tracing::debug!(
            ticks = final_stats.tick,
            trades = final_stats.total_trades,
            "run complete"
        );
    }
}
