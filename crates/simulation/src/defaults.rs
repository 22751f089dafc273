//! Default seed data: the tracked pairs and the three preset bots the
//! simulator boots with.

use types::{Bot, BotId, BotSettings, BotStats, BotStatus, RiskLevel, Strategy};

use crate::config::PairSpec;

/// Default tracked pairs with plausible base prices and volumes.
pub fn default_pairs() -> Vec<PairSpec> {
    vec![
        PairSpec::new("BTC/USDT", 43_250.50)
            .with_change_24h(2.45)
            .with_volume(1.2845e9),
        PairSpec::new("ETH/USDT", 2_285.75)
            .with_change_24h(-1.23)
            .with_volume(8.423e8),
        PairSpec::new("SOL/USDT", 98.42)
            .with_change_24h(5.67)
            .with_volume(3.157e8),
        PairSpec::new("BNB/USDT", 312.80)
            .with_change_24h(0.89)
            .with_volume(9.54e7),
    ]
}

/// The three preset bots. Ids 1-3 are reserved for them; generated ids
/// continue from 4.
pub fn default_bots() -> Vec<Bot> {
    vec![
        Bot {
            id: BotId(1),
            name: "Grid Master".to_string(),
            status: BotStatus::Running,
            strategy: Strategy::Grid,
            pair: "BTC/USDT".to_string(),
            balance: 12_500.0,
            profit: 1_245.50,
            profit_percentage: 9.964,
            settings: BotSettings::default()
                .with_grid(12, 0.5)
                .with_investment(10_000.0)
                .with_exits(5.0, 12.0),
            stats: BotStats {
                total_trades: 142,
                win_rate: 68.5,
                avg_profit_per_trade: 8.77,
                max_drawdown: 4.2,
                sharpe_ratio: 1.85,
                uptime_hours: 168.5,
            },
            trades: Vec::new(),
            last_update: 0,
        },
        Bot {
            id: BotId(2),
            name: "DCA Accumulator".to_string(),
            status: BotStatus::Running,
            strategy: Strategy::Dca,
            pair: "ETH/USDT".to_string(),
            balance: 8_000.0,
            profit: 680.20,
            profit_percentage: 8.5025,
            settings: BotSettings::default()
                .with_grid(5, 1.0)
                .with_investment(7_500.0)
                .with_exits(8.0, 20.0)
                .with_max_trades(30)
                .with_risk_level(RiskLevel::Low),
            stats: BotStats {
                total_trades: 87,
                win_rate: 72.4,
                avg_profit_per_trade: 7.82,
                max_drawdown: 2.8,
                sharpe_ratio: 2.10,
                uptime_hours: 96.0,
            },
            trades: Vec::new(),
            last_update: 0,
        },
        Bot {
            id: BotId(3),
            name: "Momentum Scout".to_string(),
            status: BotStatus::Paused,
            strategy: Strategy::Momentum,
            pair: "SOL/USDT".to_string(),
            balance: 5_000.0,
            profit: -120.80,
            profit_percentage: -2.416,
            settings: BotSettings::default()
                .with_grid(8, 2.0)
                .with_investment(4_000.0)
                .with_exits(10.0, 25.0)
                .with_max_trades(20)
                .with_risk_level(RiskLevel::High),
            stats: BotStats {
                total_trades: 56,
                win_rate: 44.6,
                avg_profit_per_trade: -2.16,
                max_drawdown: 11.3,
                sharpe_ratio: 0.42,
                uptime_hours: 48.5,
            },
            trades: Vec::new(),
            last_update: 0,
        },
    ]
}
