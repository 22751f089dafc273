//! Simulation configuration options.

use types::{Bot, Pair, Timestamp};

use crate::defaults;

// =============================================================================
// Pair Spec
// =============================================================================

/// Seed values for one tracked trading pair.
#[derive(Debug, Clone, PartialEq)]
pub struct PairSpec {
    /// Pair identifier (e.g., "BTC/USDT").
    pub pair: Pair,
    /// Starting price.
    pub price: f64,
    /// Starting 24h change in percent.
    pub change_24h: f64,
    /// Starting 24h volume in quote currency.
    pub volume: f64,
}

impl PairSpec {
    /// Create a spec with zero change and volume.
    pub fn new(pair: impl Into<Pair>, price: f64) -> Self {
        Self {
            pair: pair.into(),
            price,
            change_24h: 0.0,
            volume: 0.0,
        }
    }

    /// Set the starting 24h change.
    pub fn with_change_24h(mut self, change: f64) -> Self {
        self.change_24h = change;
        self
    }

    /// Set the starting 24h volume.
    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }
}

// =============================================================================
// Simulation Config
// =============================================================================

/// Configuration for the simulation.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Tracked pairs, seeded at construction.
    pub pairs: Vec<PairSpec>,

    /// Bots present at construction. Defaults to the three named presets;
    /// pass an empty vec for a clean slate.
    pub bots: Vec<Bot>,

    /// Nominal wall-clock period of one tick. The engine itself advances
    /// its timestamp by this much per `step()`; pacing is the driver's job.
    pub tick_interval_ms: u64,

    /// Timestamp base for the first tick (ms since epoch).
    pub start_timestamp_ms: Timestamp,

    /// RNG seed. `None` seeds from OS entropy; `Some` makes runs
    /// reproducible.
    pub seed: Option<u64>,

    /// Bound on the per-tick multiplicative price perturbation.
    pub price_jitter: f64,

    /// Decay applied to `change24h` each tick before adding fresh noise.
    pub change_decay: f64,

    /// Bound on the per-tick `change24h` noise increment.
    pub change_jitter: f64,

    /// Bound on per-tick volume growth as a fraction of current volume.
    pub volume_jitter: f64,

    /// Probability that a running bot trades on a given tick.
    pub trade_probability: f64,

    /// Smallest trade size as a fraction of bot balance.
    pub trade_fraction_min: f64,

    /// Largest trade size as a fraction of bot balance.
    pub trade_fraction_max: f64,

    /// Bound on the execution-price offset around the market price.
    pub trade_price_offset: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            pairs: defaults::default_pairs(),
            bots: defaults::default_bots(),
            tick_interval_ms: 2_000,  // One tick every 2s
            start_timestamp_ms: 0,
            seed: None,
            price_jitter: 0.002,      // ±0.2% per tick
            change_decay: 0.95,
            change_jitter: 0.25,      // Percentage points per tick
            volume_jitter: 0.001,     // Up to +0.1% per tick
            trade_probability: 0.3,
            trade_fraction_min: 0.05, // 5% of balance
            trade_fraction_max: 0.15, // 15% of balance
            trade_price_offset: 0.001, // ±0.1% around market
        }
    }
}

impl SimulationConfig {
    /// Replace the tracked pairs.
    pub fn with_pairs(mut self, pairs: Vec<PairSpec>) -> Self {
        self.pairs = pairs;
        self
    }

    /// Add one tracked pair.
    pub fn with_pair(mut self, spec: PairSpec) -> Self {
        self.pairs.push(spec);
        self
    }

    /// Replace the seeded bots.
    pub fn with_bots(mut self, bots: Vec<Bot>) -> Self {
        self.bots = bots;
        self
    }

    /// Start with no bots at all.
    pub fn without_bots(mut self) -> Self {
        self.bots.clear();
        self
    }

    /// Set the tick interval in milliseconds.
    pub fn with_tick_interval_ms(mut self, interval: u64) -> Self {
        self.tick_interval_ms = interval;
        self
    }

    /// Set the timestamp base.
    pub fn with_start_timestamp_ms(mut self, start: Timestamp) -> Self {
        self.start_timestamp_ms = start;
        self
    }

    /// Seed the RNG for a reproducible run.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the per-tick price perturbation bound.
    pub fn with_price_jitter(mut self, jitter: f64) -> Self {
        self.price_jitter = jitter;
        self
    }

    /// Set the per-tick trade probability.
    pub fn with_trade_probability(mut self, probability: f64) -> Self {
        self.trade_probability = probability;
        self
    }

    /// Set the trade size range as fractions of bot balance.
    pub fn with_trade_sizing(mut self, min: f64, max: f64) -> Self {
        self.trade_fraction_min = min;
        self.trade_fraction_max = max;
        self
    }

    /// Set the execution-price offset bound.
    pub fn with_trade_price_offset(mut self, offset: f64) -> Self {
        self.trade_price_offset = offset;
        self
    }
}
