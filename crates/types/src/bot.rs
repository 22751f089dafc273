//! Bot types for the simulation.
//!
//! This module defines the simulated trading bot: its status and strategy
//! enums, its preset statistics block, and the entity itself with the
//! bounded trade history and incremental stat updates applied on every
//! simulated fill.

use crate::config::{BotConfig, BotSettings};
use crate::ids::{BotId, Pair, Timestamp};
use crate::trade::Trade;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Bot Status
// =============================================================================

/// Lifecycle status of a bot.
///
/// Only `Running` bots participate in simulation ticks. `Error` is never
/// entered by the simulator itself; it exists for explicit external
/// assignment and simply fails the running gate like `Idle` and `Paused`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BotStatus {
    #[default]
    Idle,
    Running,
    Paused,
    Error,
}

impl BotStatus {
    /// Check if this status participates in ticks.
    #[inline]
    pub fn is_running(self) -> bool {
        self == BotStatus::Running
    }
}

impl fmt::Display for BotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BotStatus::Idle => write!(f, "idle"),
            BotStatus::Running => write!(f, "running"),
            BotStatus::Paused => write!(f, "paused"),
            BotStatus::Error => write!(f, "error"),
        }
    }
}

// =============================================================================
// Strategy
// =============================================================================

/// Strategy tag attached to a bot.
///
/// Purely cosmetic: the only behavioral difference between strategies is the
/// shape of the random profit distribution used when synthesizing trades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Grid,
    Dca,
    Momentum,
    Arbitrage,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Grid => write!(f, "grid"),
            Strategy::Dca => write!(f, "dca"),
            Strategy::Momentum => write!(f, "momentum"),
            Strategy::Arbitrage => write!(f, "arbitrage"),
        }
    }
}

// =============================================================================
// Bot Stats
// =============================================================================

/// Blend factor for the incremental win-rate update. Each recorded trade
/// pulls the rate 10% of the way toward 100 (win) or 0 (loss).
pub const WIN_RATE_BLEND: f64 = 0.1;

/// Performance statistics displayed for a bot.
///
/// `total_trades` and `win_rate` are recomputed on every recorded trade; the
/// remaining fields are static presets carried through from seeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BotStats {
    /// Trades recorded over the bot's lifetime.
    pub total_trades: u64,
    /// Fraction of winning trades in percent, blended incrementally.
    pub win_rate: f64,
    /// Average profit per trade (static preset).
    pub avg_profit_per_trade: f64,
    /// Maximum drawdown in percent (static preset).
    pub max_drawdown: f64,
    /// Sharpe ratio (static preset).
    pub sharpe_ratio: f64,
    /// Hours the bot has nominally been live (static preset).
    pub uptime_hours: f64,
}

impl BotStats {
    /// Fold one trade outcome into the recomputed fields.
    pub fn record(&mut self, profit: f64) {
        self.total_trades += 1;
        let target = if profit > 0.0 { 100.0 } else { 0.0 };
        self.win_rate += WIN_RATE_BLEND * (target - self.win_rate);
    }
}

// =============================================================================
// Bot
// =============================================================================

/// A simulated trading bot.
///
/// `balance` never changes after creation; realized profit accumulates
/// separately in `profit` and is reported relative to the balance via
/// `profit_percentage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bot {
    /// Unique identifier.
    pub id: BotId,
    /// Display name.
    pub name: String,
    /// Lifecycle status.
    pub status: BotStatus,
    /// Strategy tag.
    pub strategy: Strategy,
    /// Pair this bot trades.
    pub pair: Pair,
    /// Allocated balance in quote currency (fixed after creation).
    pub balance: f64,
    /// Accumulated realized profit (signed).
    pub profit: f64,
    /// Profit relative to balance, in percent.
    pub profit_percentage: f64,
    /// Strategy settings (stored, not enforced).
    pub settings: BotSettings,
    /// Performance statistics.
    pub stats: BotStats,
    /// Most recent trades, newest first, at most [`Bot::MAX_TRADE_HISTORY`].
    pub trades: Vec<Trade>,
    /// When the bot was last touched by the simulator (wall clock, ms).
    pub last_update: Timestamp,
}

impl Bot {
    /// Bound on the retained trade history.
    pub const MAX_TRADE_HISTORY: usize = 10;

    /// Create a bot from a config with zeroed profit, zeroed stats, and an
    /// empty trade history.
    pub fn new(id: BotId, config: BotConfig, now: Timestamp) -> Self {
        Self {
            id,
            name: config.name,
            status: config.status,
            strategy: config.strategy,
            pair: config.pair,
            balance: config.balance,
            profit: 0.0,
            profit_percentage: 0.0,
            settings: config.settings,
            stats: BotStats::default(),
            trades: Vec::new(),
            last_update: now,
        }
    }

    /// Fold a simulated fill into the bot.
    ///
    /// Prepends the trade to the history (evicting beyond the bound),
    /// accumulates its profit, and updates the recomputed stats.
    pub fn record_trade(&mut self, trade: Trade) {
        self.profit += trade.profit;
        self.profit_percentage = if self.balance > 0.0 {
            self.profit / self.balance * 100.0
        } else {
            0.0
        };
        self.stats.record(trade.profit);
        self.trades.insert(0, trade);
        self.trades.truncate(Self::MAX_TRADE_HISTORY);
    }

    /// Check if this bot participates in ticks.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.status.is_running()
    }
}

impl fmt::Display for Bot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} \"{}\" [{}] {} on {} ({:+.2})",
            self.id, self.name, self.status, self.strategy, self.pair, self.profit
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
