//! Synthetic market state and its per-tick random walk.
//!
//! One [`MarketTick`] per trading pair, held in seed order. Each tick the
//! walk nudges every price by a bounded multiplicative jitter, widens the
//! 24h envelope, decays the 24h change toward zero, and grows volume.
//!
//! Prices are clamped at a positive floor so the multiplicative walk can
//! never produce zero or negative prices.

use rand::Rng;
use types::{MarketTick, Timestamp};

use crate::config::{PairSpec, SimulationConfig};

/// Fraction of the seed price used to pre-open the 24h envelope.
const SEED_RANGE_24H: f64 = 0.025;

/// Floor for the multiplicative walk.
const MIN_PRICE: f64 = 0.01;

// =============================================================================
// MarketState
// =============================================================================

/// All tracked pairs, in seed order.
#[derive(Debug, Clone, Default)]
pub struct MarketState {
    ticks: Vec<MarketTick>,
}

impl MarketState {
    /// Seed the market from pair specs.
    ///
    /// Each pair opens with a 24h envelope of ±2.5% around its seed price,
    /// so the first ticks have a plausible high/low spread instead of a
    /// collapsed one.
    pub fn new(pairs: &[PairSpec]) -> Self {
        let ticks = pairs
            .iter()
            .map(|spec| {
                MarketTick::new(&spec.pair, spec.price)
                    .with_change_24h(spec.change_24h)
                    .with_volume(spec.volume)
                    .with_range_24h(
                        spec.price * (1.0 + SEED_RANGE_24H),
                        spec.price * (1.0 - SEED_RANGE_24H),
                    )
            })
            .collect();
        Self { ticks }
    }

    /// Advance every pair by one tick of the random walk.
    pub fn advance(&mut self, rng: &mut impl Rng, config: &SimulationConfig, now: Timestamp) {
        for tick in &mut self.ticks {
            let jitter = rng.random_range(-config.price_jitter..=config.price_jitter);
            let price = (tick.price * (1.0 + jitter)).max(MIN_PRICE);
            tick.apply_price(price);

            // Old momentum bleeds off while fresh moves accumulate, so the
            // 24h change drifts instead of resetting every tick.
            let drift = rng.random_range(-config.change_jitter..=config.change_jitter);
            tick.change_24h = tick.change_24h * config.change_decay + drift;

            tick.volume += tick.volume * rng.random_range(0.0..=config.volume_jitter);
            tick.timestamp = now;
        }
    }

    /// All tickers, in seed order.
    pub fn all(&self) -> &[MarketTick] {
        &self.ticks
    }

    /// Look up one pair.
    pub fn get(&self, pair: &str) -> Option<&MarketTick> {
        self.ticks.iter().find(|t| t.pair == pair)
    }

    /// Current price of one pair.
    pub fn price_of(&self, pair: &str) -> Option<f64> {
        self.get(pair).map(|t| t.price)
    }

    /// Number of tracked pairs.
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    /// Check if no pairs are tracked.
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn two_pair_market() -> MarketState {
        MarketState::new(&[
            PairSpec::new("BTC/USDT", 40_000.0)
                .with_change_24h(2.0)
                .with_volume(1.0e9),
            PairSpec::new("ETH/USDT", 2_000.0),
        ])
    }

    #[test]
    fn test_seeding_preserves_order_and_values() {
        let market = two_pair_market();
        assert_eq!(market.len(), 2);

        let btc = &market.all()[0];
        assert_eq!(btc.pair, "BTC/USDT");
        assert_eq!(btc.price, 40_000.0);
        assert_eq!(btc.change_24h, 2.0);
        assert!(btc.high_24h > btc.price, "seed envelope opens above price");
        assert!(btc.low_24h < btc.price, "seed envelope opens below price");

        assert_eq!(market.all()[1].pair, "ETH/USDT");
        assert_eq!(market.price_of("ETH/USDT"), Some(2_000.0));
        assert_eq!(market.get("DOGE/USDT"), None);
    }

    #[test]
    fn test_advance_bounds_price_step() {
        let config = SimulationConfig::default().with_seed(7);
        let mut rng = StdRng::seed_from_u64(7);
        let mut market = two_pair_market();

        let mut prev: Vec<f64> = market.all().iter().map(|t| t.price).collect();
        for _ in 0..200 {
            market.advance(&mut rng, &config, 0);
            for (tick, old) in market.all().iter().zip(&prev) {
                let step = (tick.price - old).abs() / old;
                assert!(
                    step <= config.price_jitter + 1e-12,
                    "per-tick move {step} exceeded jitter bound for {}",
                    tick.pair
                );
                assert!(tick.price >= MIN_PRICE);
            }
            prev = market.all().iter().map(|t| t.price).collect();
        }
    }

    #[test]
    fn test_envelope_tracks_extremes() {
        let config = SimulationConfig::default().with_seed(11);
        let mut rng = StdRng::seed_from_u64(11);
        let mut market = two_pair_market();

        let mut high = market.all()[0].high_24h;
        let mut low = market.all()[0].low_24h;
        for _ in 0..500 {
            market.advance(&mut rng, &config, 0);
            let btc = &market.all()[0];
            assert!(btc.high_24h >= high, "high watermark must not shrink");
            assert!(btc.low_24h <= low, "low watermark must not rise");
            assert!(btc.low_24h <= btc.price && btc.price <= btc.high_24h);
            high = btc.high_24h;
            low = btc.low_24h;
        }
    }

    #[test]
    fn test_volume_never_decreases() {
        let config = SimulationConfig::default().with_seed(13);
        let mut rng = StdRng::seed_from_u64(13);
        let mut market = two_pair_market();

        let mut prev = market.all()[0].volume;
        for _ in 0..100 {
            market.advance(&mut rng, &config, 0);
            let volume = market.all()[0].volume;
            assert!(volume >= prev, "volume increments are non-negative");
            prev = volume;
        }
    }

    #[test]
    fn test_advance_stamps_timestamp() {
        let config = SimulationConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut market = two_pair_market();

        market.advance(&mut rng, &config, 1_700_000_002_000);
        for tick in market.all() {
            assert_eq!(tick.timestamp, 1_700_000_002_000);
        }
    }

    #[test]
    fn test_tiny_price_clamped_above_zero() {
        let config = SimulationConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut market = MarketState::new(&[PairSpec::new("DUST/USDT", 0.010_000_1)]);

        for _ in 0..1_000 {
            market.advance(&mut rng, &config, 0);
            assert!(market.all()[0].price >= MIN_PRICE);
        }
    }
}
