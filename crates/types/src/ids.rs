//! Core identifier types for the bot simulation.
//!
//! This module defines the fundamental ID types used throughout the system
//! to uniquely identify bots and trades.

use derive_more::{Add, From, Into};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Core ID Types
// =============================================================================

/// Unique identifier for a trading bot.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Add,
    From,
    Into,
)]
pub struct BotId(pub u64);

impl fmt::Display for BotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bot#{}", self.0)
    }
}

/// Unique identifier for a simulated trade.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    Add,
    From,
    Into,
)]
pub struct TradeId(pub u64);

impl fmt::Display for TradeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Trade#{}", self.0)
    }
}

// =============================================================================
// Pair Type
// =============================================================================

/// Trading pair identifier (e.g., "BTC/USDT", "ETH/USDT").
pub type Pair = String;

// =============================================================================
// Time Types
// =============================================================================

/// Wall clock timestamp in milliseconds since epoch.
pub type Timestamp = u64;

/// Simulation tick (discrete time step).
pub type Tick = u64;
