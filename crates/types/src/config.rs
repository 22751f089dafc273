//! Bot configuration types.
//!
//! This module defines the per-bot settings block, the partial-update patch
//! applied by settings commands, and the config used to create new bots.

use crate::bot::{BotStatus, Strategy};
use crate::ids::Pair;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Risk Level
// =============================================================================

/// Coarse risk appetite stored on a bot's settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

// =============================================================================
// Bot Settings
// =============================================================================

/// Per-bot strategy settings.
///
/// These are stored and echoed back to clients but never enforced: the
/// simulator does not run a real strategy, so stop-losses and trade caps
/// have no behavioral effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotSettings {
    /// Number of grid levels (grid strategy).
    pub grid_levels: u32,
    /// Spacing between grid levels in percent.
    pub grid_spacing: f64,
    /// Capital allocated to the strategy in quote currency.
    pub investment: f64,
    /// Stop-loss threshold in percent.
    pub stop_loss: f64,
    /// Take-profit threshold in percent.
    pub take_profit: f64,
    /// Maximum simultaneous trades.
    pub max_trades: u32,
    /// Coarse risk appetite.
    pub risk_level: RiskLevel,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            grid_levels: 10,
            grid_spacing: 0.5,   // 0.5% between levels
            investment: 1_000.0, // Quote currency
            stop_loss: 5.0,      // Percent
            take_profit: 10.0,   // Percent
            max_trades: 50,
            risk_level: RiskLevel::Medium,
        }
    }
}

impl BotSettings {
    /// Set the grid shape.
    pub fn with_grid(mut self, levels: u32, spacing: f64) -> Self {
        self.grid_levels = levels;
        self.grid_spacing = spacing;
        self
    }

    /// Set the allocated investment.
    pub fn with_investment(mut self, investment: f64) -> Self {
        self.investment = investment;
        self
    }

    /// Set stop-loss and take-profit thresholds.
    pub fn with_exits(mut self, stop_loss: f64, take_profit: f64) -> Self {
        self.stop_loss = stop_loss;
        self.take_profit = take_profit;
        self
    }

    /// Set the trade cap.
    pub fn with_max_trades(mut self, max_trades: u32) -> Self {
        self.max_trades = max_trades;
        self
    }

    /// Set the risk level.
    pub fn with_risk_level(mut self, risk_level: RiskLevel) -> Self {
        self.risk_level = risk_level;
        self
    }

    /// Merge the set fields of a patch into these settings.
    pub fn apply_patch(&mut self, patch: &BotSettingsPatch) {
        if let Some(v) = patch.grid_levels {
            self.grid_levels = v;
        }
        if let Some(v) = patch.grid_spacing {
            self.grid_spacing = v;
        }
        if let Some(v) = patch.investment {
            self.investment = v;
        }
        if let Some(v) = patch.stop_loss {
            self.stop_loss = v;
        }
        if let Some(v) = patch.take_profit {
            self.take_profit = v;
        }
        if let Some(v) = patch.max_trades {
            self.max_trades = v;
        }
        if let Some(v) = patch.risk_level {
            self.risk_level = v;
        }
    }
}

// =============================================================================
// Settings Patch
// =============================================================================

/// Partial settings update: only set fields are merged, everything else is
/// left untouched. No range validation is performed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BotSettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_levels: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investment: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub take_profit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_trades: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_level: Option<RiskLevel>,
}

impl BotSettingsPatch {
    /// Check if the patch sets nothing.
    pub fn is_empty(&self) -> bool {
        self.grid_levels.is_none()
            && self.grid_spacing.is_none()
            && self.investment.is_none()
            && self.stop_loss.is_none()
            && self.take_profit.is_none()
            && self.max_trades.is_none()
            && self.risk_level.is_none()
    }
}

// =============================================================================
// Bot Config
// =============================================================================

/// Configuration for creating a new bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    /// Display name.
    pub name: String,
    /// Strategy tag (cosmetic, shapes the profit distribution only).
    pub strategy: Strategy,
    /// Pair the bot trades.
    pub pair: Pair,
    /// Starting balance in quote currency.
    pub balance: f64,
    /// Initial status.
    pub status: BotStatus,
    /// Strategy settings.
    pub settings: BotSettings,
}

impl BotConfig {
    /// Create a config with default strategy, balance, and settings.
    pub fn new(name: impl Into<String>, pair: impl Into<Pair>) -> Self {
        Self {
            name: name.into(),
            strategy: Strategy::Grid,
            pair: pair.into(),
            balance: 10_000.0,
            status: BotStatus::Idle,
            settings: BotSettings::default(),
        }
    }

    /// Set the strategy tag.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the starting balance.
    pub fn with_balance(mut self, balance: f64) -> Self {
        self.balance = balance;
        self
    }

    /// Set the initial status.
    pub fn with_status(mut self, status: BotStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the settings block.
    pub fn with_settings(mut self, settings: BotSettings) -> Self {
        self.settings = settings;
        self
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self::new("New Bot", "BTC/USDT")
    }
}

// =============================================================================
// Tests
// =============================================================================
