//! Core types for the crypto bot simulator.
//!
//! This crate provides all shared data types used across the simulation:
//! identifiers, the bot entity with its bounded trade history, market
//! ticker state, and the settings/config structs mutated by bot commands.
//!
//! Prices, balances, and profits are plain `f64`: the simulator does
//! percent-walk arithmetic on synthetic numbers and never settles a real
//! ledger, so fixed-point precision would buy nothing here.

pub mod bot;
pub mod config;
pub mod ids;
pub mod market_data;
pub mod trade;

pub use bot::{Bot, BotStats, BotStatus, Strategy, WIN_RATE_BLEND};
pub use config::{BotConfig, BotSettings, BotSettingsPatch, RiskLevel};
pub use ids::{BotId, Pair, Tick, Timestamp, TradeId};
pub use market_data::MarketTick;
pub use trade::{Trade, TradeSide, TradeStatus};
