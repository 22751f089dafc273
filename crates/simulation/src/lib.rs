//! Simulation crate: the tick engine behind the crypto bot dashboard.
//!
//! This crate provides the engine that coordinates:
//! - A fixed-period tick loop over a synthetic market
//! - Per-bot trade generation for running bots
//! - Snapshot fan-out to registered hooks
//!
//! # Architecture
//!
//! The simulation runs in discrete ticks:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            Simulation.step()            │
//! │                                         │
//! │  1. Advance tick counter and timestamp  │
//! │  2. Random-walk every market pair       │
//! │  3. Maybe fill one trade per running bot│
//! │  4. Refresh engine stats                │
//! │  5. Hook: on_snapshot                   │
//! │  6. Hook: on_tick_end                   │
//! │                                         │
//! └─────────────────────────────────────────┘
//! ```
//!
//! Commands (`start_bot`, `create_bot`, ...) mutate between ticks and fire
//! `on_snapshot` out of band; `subscribe` delivers one snapshot immediately.
//!
//! # Hooks
//!
//! The simulation supports pluggable hooks for observation:
//!
//! ```ignore
//! use simulation::{MetricsHook, Simulation, SimulationConfig};
//! use std::sync::Arc;
//!
//! let mut sim = Simulation::new(SimulationConfig::default().with_seed(42));
//! let metrics = Arc::new(MetricsHook::new());
//! sim.subscribe(metrics.clone());
//!
//! sim.run(1000);
//! println!("Avg trades/tick: {:.2}", metrics.snapshot().avg_trades_per_tick);
//! ```
//!
//! # Determinism
//!
//! Pass a seed through [`SimulationConfig::with_seed`] and two engines built
//! from the same config produce identical runs. Without a seed the RNG is
//! drawn from the OS.

pub mod config;
pub mod defaults;
mod hooks;
mod market;
mod metrics;
mod runner;
mod trading;

pub use config::{PairSpec, SimulationConfig};
pub use runner::{Simulation, SimulationStats};

// Re-export hook types
pub use hooks::{
    FnHook, HookContext, HookRunner, NoOpHook, SimulationHook, SubscriptionId,
};
pub use market::MarketState;
pub use metrics::{MetricsHook, MetricsSnapshot};
pub use trading::TradeGenerator;
