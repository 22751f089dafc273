//! Channel bridge types for simulation ↔ server communication.
//!
//! Provides message types for the sync-async bridge.
//!
//! # Architecture
//!
//! ```text
//! Simulation (sync)                    Server (async)
//!       │                                   │
//!       │──── TickUpdate ───────────────────▶│ (broadcast to WS clients)
//!       │                                   │
//!       │◀─── SimCommand ───────────────────│ (pause/resume/bot commands)
//!       │                                   │
//! ```
//!
//! # Design Principles
//!
//! - **Declarative**: Message types are plain data, no behavior
//! - **Modular**: Bridge is independent of simulation/server internals
//! - **SoC**: Types here, senders/receivers in respective modules

use serde::{Deserialize, Serialize};
use types::{Bot, BotConfig, BotId, BotSettingsPatch, BotStatus, MarketTick, Tick, Timestamp};

/// Per-tick snapshot for WebSocket broadcast.
///
/// Carries the full bot list and market state, matching what an in-process
/// subscriber would receive from `on_snapshot`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickUpdate {
    /// Current tick number.
    pub tick: Tick,
    /// Simulated timestamp (ms).
    pub timestamp: Timestamp,
    /// All bots, in insertion order.
    pub bots: Vec<Bot>,
    /// All market tickers, in seed order.
    pub market: Vec<MarketTick>,
}

/// Commands from server to simulation.
///
/// Engine-level variants control the driver loop; bot-level variants are
/// applied to the engine between ticks. Delivery is fire-and-forget: the
/// result shows up in the next broadcast snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SimCommand {
    /// Start/resume the tick loop.
    Start,
    /// Pause the tick loop.
    Pause,
    /// Toggle pause/resume.
    Toggle,
    /// Step one tick (when paused).
    Step,
    /// Quit the simulation thread.
    Quit,
    /// Start a bot.
    StartBot(BotId),
    /// Pause a bot.
    PauseBot(BotId),
    /// Create a new bot from a config.
    CreateBot(BotConfig),
    /// Delete a bot.
    DeleteBot(BotId),
    /// Merge a settings patch into a bot.
    UpdateSettings { id: BotId, patch: BotSettingsPatch },
    /// Assign a bot's status directly.
    SetBotStatus { id: BotId, status: BotStatus },
}
