//! Read endpoints over the cached simulation snapshot.
//!
//! All endpoints serve from `SimData`, the snapshot cached by
//! `DataServiceHook` on every publish. Nothing here talks to the engine.
//!
//! # Endpoints
//!
//! - `GET /api/bots` - All bots, in insertion order
//! - `GET /api/bots/{bot_id}` - One bot (404 for unknown ids)
//! - `GET /api/bots/{bot_id}/trades` - A bot's trade history, newest first
//! - `GET /api/market?pair=X` - Market tickers, optionally one pair
//!
//! # Design Principles
//!
//! - **Declarative**: Pure handler functions returning typed responses
//! - **Modular**: Reads here, commands in [`super::api`]
//! - **SoC**: Handlers extract from state, return JSON

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use types::{Bot, BotId, MarketTick, Trade};

use crate::error::{AppError, AppResult};
use crate::state::ServerState;

// =============================================================================
// Response Types
// =============================================================================

/// Response for /api/bots.
#[derive(Debug, Serialize)]
pub struct BotsResponse {
    pub bots: Vec<Bot>,
    pub total_count: usize,
    pub tick: u64,
}

/// Response for /api/bots/{bot_id}/trades.
#[derive(Debug, Serialize)]
pub struct TradesResponse {
    pub bot_id: u64,
    /// Newest first, capped at the engine's history bound.
    pub trades: Vec<Trade>,
    pub count: usize,
}

/// Query parameters for the market endpoint.
#[derive(Debug, Deserialize)]
pub struct MarketQuery {
    /// Pair to query (optional, returns all pairs if not specified).
    pub pair: Option<String>,
}

/// Response for /api/market.
#[derive(Debug, Serialize)]
pub struct MarketResponse {
    pub ticks: Vec<MarketTick>,
    pub count: usize,
    pub tick: u64,
}

// =============================================================================
// Handlers
// =============================================================================

/// List all bots: `GET /api/bots`
pub async fn get_bots(State(state): State<ServerState>) -> Json<BotsResponse> {
    let sim_data = state.sim_data.read().await;

    Json(BotsResponse {
        bots: sim_data.bots.clone(),
        total_count: sim_data.bots.len(),
        tick: sim_data.tick,
    })
}

/// Get one bot: `GET /api/bots/{bot_id}`
pub async fn get_bot(
    State(state): State<ServerState>,
    Path(bot_id): Path<u64>,
) -> AppResult<Json<Bot>> {
    let sim_data = state.sim_data.read().await;

    sim_data
        .bot(BotId(bot_id))
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("bot {bot_id}")))
}

/// Get a bot's trade history: `GET /api/bots/{bot_id}/trades`
pub async fn get_bot_trades(
    State(state): State<ServerState>,
    Path(bot_id): Path<u64>,
) -> AppResult<Json<TradesResponse>> {
    let sim_data = state.sim_data.read().await;

    let trades = sim_data
        .trades_of(BotId(bot_id))
        .ok_or_else(|| AppError::NotFound(format!("bot {bot_id}")))?
        .to_vec();

    Ok(Json(TradesResponse {
        bot_id,
        count: trades.len(),
        trades,
    }))
}

/// Get market tickers: `GET /api/market?pair=X`
///
/// An unknown pair yields an empty list, not an error.
pub async fn get_market(
    State(state): State<ServerState>,
    Query(query): Query<MarketQuery>,
) -> Json<MarketResponse> {
    let sim_data = state.sim_data.read().await;

    let ticks: Vec<MarketTick> = match query.pair {
        Some(ref pair) => sim_data.market_tick(pair).cloned().into_iter().collect(),
        None => sim_data.market.clone(),
    };

    Json(MarketResponse {
        count: ticks.len(),
        ticks,
        tick: sim_data.tick,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::SimCommand;
    use std::sync::Arc;
    use tokio::sync::{broadcast, RwLock};
    use types::BotConfig;

    use crate::state::SimData;

    fn state_with_snapshot() -> ServerState {
        let (tick_tx, _) = broadcast::channel::<crate::bridge::TickUpdate>(4);
        let (cmd_tx, _) = crossbeam_channel::unbounded::<SimCommand>();

        let mut data = SimData::new();
        data.tick = 7;
        data.bots
            .push(Bot::new(BotId(1), BotConfig::new("Reader", "BTC/USDT"), 0));
        data.market.push(MarketTick::new("BTC/USDT", 43_000.0));

        ServerState::with_shared(
            tick_tx,
            cmd_tx,
            Arc::new(RwLock::new(data)),
            Arc::new(crate::state::ServerMetrics::new()),
        )
    }

    #[tokio::test]
    async fn test_get_bots_serves_snapshot() {
        let state = state_with_snapshot();
        let Json(response) = get_bots(State(state)).await;

        assert_eq!(response.total_count, 1);
        assert_eq!(response.tick, 7);
        assert_eq!(response.bots[0].name, "Reader");
    }

    #[tokio::test]
    async fn test_get_bot_not_found() {
        let state = state_with_snapshot();

        assert!(get_bot(State(state.clone()), Path(1)).await.is_ok());
        let err = get_bot(State(state), Path(99)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_get_trades_for_fresh_bot_is_empty() {
        let state = state_with_snapshot();
        let Json(response) = get_bot_trades(State(state), Path(1)).await.unwrap();

        assert_eq!(response.bot_id, 1);
        assert_eq!(response.count, 0);
        assert!(response.trades.is_empty());
    }

    #[tokio::test]
    async fn test_get_market_pair_filter() {
        let state = state_with_snapshot();

        let Json(all) = get_market(
            State(state.clone()),
            Query(MarketQuery { pair: None }),
        )
        .await;
        assert_eq!(all.count, 1);

        let Json(one) = get_market(
            State(state.clone()),
            Query(MarketQuery {
                pair: Some("BTC/USDT".into()),
            }),
        )
        .await;
        assert_eq!(one.count, 1);

        let Json(none) = get_market(
            State(state),
            Query(MarketQuery {
                pair: Some("DOGE/USDT".into()),
            }),
        )
        .await;
        assert_eq!(none.count, 0, "unknown pair is empty, not an error");
    }
}
