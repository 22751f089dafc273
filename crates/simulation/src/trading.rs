//! Trade generation for running bots.
//!
//! Each tick a running bot rolls against the configured trade probability.
//! On a hit the generator sizes the trade from the bot's balance, fills it
//! near the current market price, and draws the profit from a per-strategy
//! normal distribution expressed as a fraction of the trade amount.
//!
//! The strategy only shapes that distribution. No orders rest on a book and
//! the bot's balance is never debited.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use types::{Bot, Strategy, Timestamp, Trade, TradeId, TradeSide, TradeStatus};

use crate::config::SimulationConfig;

/// Profit distribution for a strategy, as (mean, std dev) fractions of the
/// trade amount.
fn profit_params(strategy: Strategy) -> (f64, f64) {
    match strategy {
        // Many small wins from pinging a range.
        Strategy::Grid => (0.004, 0.010),
        // Slow accumulation, close to a coin flip per fill.
        Strategy::Dca => (0.002, 0.015),
        // Feast or famine.
        Strategy::Momentum => (0.003, 0.030),
        // Small edges, captured consistently.
        Strategy::Arbitrage => (0.005, 0.006),
    }
}

fn profit_distribution(strategy: Strategy) -> Normal<f64> {
    let (mean, std_dev) = profit_params(strategy);
    Normal::new(mean, std_dev).unwrap_or_else(|_| Normal::new(0.0, 0.01).unwrap())
}

// =============================================================================
// TradeGenerator
// =============================================================================

/// Stateful trade factory. Owns the monotonically increasing trade id.
#[derive(Debug, Clone)]
pub struct TradeGenerator {
    next_trade_id: u64,
}

impl Default for TradeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TradeGenerator {
    /// Create a generator with trade ids starting at 1.
    pub fn new() -> Self {
        Self { next_trade_id: 1 }
    }

    /// Roll the probability gate and maybe produce one filled trade.
    ///
    /// `market_price` is the bot's pair price before the ±offset fill jitter.
    /// Returns `None` when the gate does not fire. The caller is responsible
    /// for only passing bots that are actually running.
    pub fn maybe_trade(
        &mut self,
        rng: &mut impl Rng,
        config: &SimulationConfig,
        bot: &Bot,
        market_price: f64,
        now: Timestamp,
    ) -> Option<Trade> {
        if !rng.random_bool(config.trade_probability) {
            return None;
        }

        let side = if rng.random_bool(0.5) {
            TradeSide::Buy
        } else {
            TradeSide::Sell
        };
        let fraction = rng.random_range(config.trade_fraction_min..=config.trade_fraction_max);
        let amount = bot.balance * fraction;
        let offset = rng.random_range(-config.trade_price_offset..=config.trade_price_offset);
        let price = market_price * (1.0 + offset);
        let profit = amount * profit_distribution(bot.strategy).sample(rng);

        let id = TradeId(self.next_trade_id);
        self.next_trade_id += 1;

        Some(Trade {
            id,
            side,
            pair: bot.pair.clone(),
            amount,
            price,
            profit,
            timestamp: now,
            status: TradeStatus::Filled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use types::{BotConfig, BotId, BotStatus};

    fn running_bot() -> Bot {
        let config = BotConfig::new("Test Bot", "BTC/USDT")
            .with_balance(10_000.0)
            .with_status(BotStatus::Running);
        Bot::new(BotId(1), config, 0)
    }

    #[test]
    fn test_gate_fully_closed_and_fully_open() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut generator = TradeGenerator::new();
        let bot = running_bot();

        let never = SimulationConfig::default().with_trade_probability(0.0);
        for _ in 0..100 {
            assert!(generator
                .maybe_trade(&mut rng, &never, &bot, 40_000.0, 0)
                .is_none());
        }

        let always = SimulationConfig::default().with_trade_probability(1.0);
        for _ in 0..100 {
            assert!(generator
                .maybe_trade(&mut rng, &always, &bot, 40_000.0, 0)
                .is_some());
        }
    }

    #[test]
    fn test_trade_fields_within_bounds() {
        let config = SimulationConfig::default().with_trade_probability(1.0);
        let mut rng = StdRng::seed_from_u64(7);
        let mut generator = TradeGenerator::new();
        let bot = running_bot();

        for expected_id in 1..=200u64 {
            let trade = generator
                .maybe_trade(&mut rng, &config, &bot, 40_000.0, 123_456)
                .unwrap();

            assert_eq!(trade.id, TradeId(expected_id), "ids increment per fill");
            assert_eq!(trade.pair, "BTC/USDT");
            assert_eq!(trade.status, TradeStatus::Filled);
            assert_eq!(trade.timestamp, 123_456);

            let min = bot.balance * config.trade_fraction_min;
            let max = bot.balance * config.trade_fraction_max;
            assert!(
                trade.amount >= min && trade.amount <= max,
                "amount {} outside [{min}, {max}]",
                trade.amount
            );

            let deviation = (trade.price - 40_000.0).abs() / 40_000.0;
            assert!(
                deviation <= config.trade_price_offset + 1e-12,
                "fill price strayed {deviation} from market"
            );
        }
    }

    #[test]
    fn test_both_sides_occur() {
        let config = SimulationConfig::default().with_trade_probability(1.0);
        let mut rng = StdRng::seed_from_u64(1);
        let mut generator = TradeGenerator::new();
        let bot = running_bot();

        let mut buys = 0;
        let mut sells = 0;
        for _ in 0..200 {
            match generator
                .maybe_trade(&mut rng, &config, &bot, 40_000.0, 0)
                .unwrap()
                .side
            {
                TradeSide::Buy => buys += 1,
                TradeSide::Sell => sells += 1,
            }
        }
        assert!(buys > 0 && sells > 0, "coin flip must land on both sides");
    }

    #[test]
    fn test_arbitrage_wins_more_than_it_loses() {
        let config = SimulationConfig::default().with_trade_probability(1.0);
        let mut rng = StdRng::seed_from_u64(99);
        let mut generator = TradeGenerator::new();

        let bot_config = BotConfig::new("Arb Bot", "BTC/USDT")
            .with_strategy(Strategy::Arbitrage)
            .with_balance(10_000.0)
            .with_status(BotStatus::Running);
        let bot = Bot::new(BotId(2), bot_config, 0);

        let mut wins = 0;
        for _ in 0..1_000 {
            let trade = generator
                .maybe_trade(&mut rng, &config, &bot, 40_000.0, 0)
                .unwrap();
            if trade.is_profitable() {
                wins += 1;
            }
        }
        // Mean 0.5% with 0.6% std dev puts roughly 80% of draws above zero.
        assert!(wins > 700, "expected a winning tilt, got {wins}/1000");
    }

    #[test]
    fn test_profit_scales_with_amount() {
        let config = SimulationConfig::default().with_trade_probability(1.0);
        let mut rng = StdRng::seed_from_u64(5);
        let mut generator = TradeGenerator::new();
        let bot = running_bot();

        for _ in 0..100 {
            let trade = generator
                .maybe_trade(&mut rng, &config, &bot, 40_000.0, 0)
                .unwrap();
            // Grid draws at 1% std dev. Anything beyond 10% of the trade
            // amount means the fraction leaked.
            assert!(
                trade.profit.abs() < trade.amount * 0.10,
                "profit {} out of scale for amount {}",
                trade.profit,
                trade.amount
            );
        }
    }
}
