//! Market data types for the bot simulation.
//!
//! This module contains the live ticker state for each simulated trading
//! pair. One `MarketTick` exists per pair and is mutated in place on every
//! simulation step.

use crate::ids::{Pair, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Market Tick
// =============================================================================

/// Live ticker state for a single trading pair.
///
/// `high_24h`/`low_24h` form a running envelope: they only ever widen as the
/// price walks, they are never reset or tightened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketTick {
    /// Trading pair (e.g., "BTC/USDT").
    pub pair: Pair,
    /// Last traded price.
    pub price: f64,
    /// 24h price change in percent (signed).
    pub change_24h: f64,
    /// 24h traded volume in quote currency.
    pub volume: f64,
    /// Highest price observed.
    pub high_24h: f64,
    /// Lowest price observed.
    pub low_24h: f64,
    /// When this tick was last updated (wall clock, ms).
    pub timestamp: Timestamp,
}

impl MarketTick {
    /// Create a fresh ticker at the given price.
    ///
    /// The high/low envelope starts collapsed onto the price; volume and
    /// change start at zero.
    pub fn new(pair: impl Into<Pair>, price: f64) -> Self {
        Self {
            pair: pair.into(),
            price,
            change_24h: 0.0,
            volume: 0.0,
            high_24h: price,
            low_24h: price,
            timestamp: 0,
        }
    }

    /// Set the 24h change (builder style, for seeding).
    pub fn with_change_24h(mut self, change: f64) -> Self {
        self.change_24h = change;
        self
    }

    /// Set the volume (builder style, for seeding).
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    /// Set the 24h high/low envelope (builder style, for seeding).
    pub fn with_range_24h(mut self, high: f64, low: f64) -> Self {
        self.high_24h = high;
        self.low_24h = low;
        self
    }

    /// Move the ticker to a new price and widen the envelope to cover it.
    pub fn apply_price(&mut self, price: f64) {
        self.price = price;
        self.high_24h = self.high_24h.max(price);
        self.low_24h = self.low_24h.min(price);
    }

    /// Width of the 24h envelope.
    #[inline]
    pub fn range_24h(&self) -> f64 {
        self.high_24h - self.low_24h
    }

    /// Check if the ticker is up on the day.
    #[inline]
    pub fn is_up(&self) -> bool {
        self.change_24h >= 0.0
    }
}

impl fmt::Display for MarketTick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.2} ({:+.2}%)",
            self.pair, self.price, self.change_24h
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
