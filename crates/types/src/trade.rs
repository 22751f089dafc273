//! Trade types for the bot simulation.
//!
//! This module contains the simulated fill records that bots accumulate in
//! their bounded trade history.

use crate::ids::{Pair, Timestamp, TradeId};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Trade Side
// =============================================================================

/// Which side of the market the trade is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    /// Returns the opposite side.
    pub fn opposite(self) -> Self {
        match self {
            TradeSide::Buy => TradeSide::Sell,
            TradeSide::Sell => TradeSide::Buy,
        }
    }
}

impl fmt::Display for TradeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "BUY"),
            TradeSide::Sell => write!(f, "SELL"),
        }
    }
}

// =============================================================================
// Trade Status
// =============================================================================

/// Status of a simulated trade.
///
/// The simulator fills everything instantly, so generated trades are always
/// `Filled`. The enum exists so the payload shape stays honest about being a
/// status field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    #[default]
    Filled,
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeStatus::Filled => write!(f, "filled"),
        }
    }
}

// =============================================================================
// Trade Type
// =============================================================================

/// A simulated fill credited to a bot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    /// Unique trade identifier.
    pub id: TradeId,
    /// Buy or sell. Serialized as `type` to match the client payload.
    #[serde(rename = "type")]
    pub side: TradeSide,
    /// Pair traded.
    pub pair: Pair,
    /// Trade size in quote currency (a slice of the bot's balance).
    pub amount: f64,
    /// Execution price.
    pub price: f64,
    /// Realized profit or loss (signed, quote currency).
    pub profit: f64,
    /// When the trade occurred (wall clock, ms).
    pub timestamp: Timestamp,
    /// Always `Filled` as generated.
    pub status: TradeStatus,
}

impl Trade {
    /// Check if the trade made money.
    #[inline]
    pub fn is_profitable(&self) -> bool {
        self.profit > 0.0
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trade[{}]: {} {:.2} {} @ {:.2} ({:+.2})",
            self.id, self.side, self.amount, self.pair, self.price, self.profit
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
