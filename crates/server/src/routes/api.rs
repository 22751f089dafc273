//! REST API endpoints for simulation and bot commands.
//!
//! Commands are queued to the simulation thread and acknowledged on
//! enqueue. The effect shows up in the next broadcast snapshot; handlers do
//! not wait for it.
//!
//! # Endpoints
//!
//! - `GET /api/status` - Current simulation state
//! - `POST /api/command` - Engine-level command (start/pause/toggle/step/quit)
//! - `POST /api/bots` - Create a bot
//! - `POST /api/bots/{bot_id}/start` - Start a bot
//! - `POST /api/bots/{bot_id}/pause` - Pause a bot
//! - `POST /api/bots/{bot_id}/settings` - Merge a settings patch
//! - `POST /api/bots/{bot_id}/status` - Assign a bot status
//! - `DELETE /api/bots/{bot_id}` - Delete a bot
//!
//! # Design Principles
//!
//! - **Declarative**: Each endpoint handler is a pure function
//! - **Modular**: Commands here, reads in [`super::data`]
//! - **SoC**: Handlers enqueue, the simulation thread applies

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use types::{BotConfig, BotId, BotSettingsPatch, BotStatus};

use crate::bridge::SimCommand;
use crate::error::{AppError, AppResult};
use crate::state::ServerState;

/// Simulation status response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Current tick.
    pub tick: u64,
    /// Whether the tick loop is running.
    pub running: bool,
    /// Total bot count.
    pub bots: u64,
    /// Bots in running status.
    pub running_bots: u64,
}

/// Get simulation status: `GET /api/status`
pub async fn get_status(State(state): State<ServerState>) -> Json<StatusResponse> {
    let metrics = &state.metrics;

    Json(StatusResponse {
        tick: metrics.tick(),
        running: metrics.is_running(),
        bots: metrics.bots(),
        running_bots: metrics.running(),
    })
}

/// Command request body.
#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    /// Command to send.
    pub command: SimCommand,
}

/// Command response.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// Whether command was queued.
    pub ok: bool,
}

/// Status assignment request body.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    /// Status to assign.
    pub status: BotStatus,
}

fn queue(state: &ServerState, cmd: SimCommand) -> AppResult<Json<CommandResponse>> {
    state
        .send_command(cmd)
        .map_err(|_| AppError::Unavailable("Simulation not connected".into()))?;
    Ok(Json(CommandResponse { ok: true }))
}

/// Send an engine-level command: `POST /api/command`
pub async fn post_command(
    State(state): State<ServerState>,
    Json(req): Json<CommandRequest>,
) -> AppResult<Json<CommandResponse>> {
    queue(&state, req.command)
}

/// Create a bot: `POST /api/bots`
///
/// The new bot appears in the next snapshot with a generated id.
pub async fn create_bot(
    State(state): State<ServerState>,
    Json(config): Json<BotConfig>,
) -> AppResult<Json<CommandResponse>> {
    queue(&state, SimCommand::CreateBot(config))
}

/// Start a bot: `POST /api/bots/{bot_id}/start`
pub async fn start_bot(
    State(state): State<ServerState>,
    Path(bot_id): Path<u64>,
) -> AppResult<Json<CommandResponse>> {
    queue(&state, SimCommand::StartBot(BotId(bot_id)))
}

/// Pause a bot: `POST /api/bots/{bot_id}/pause`
pub async fn pause_bot(
    State(state): State<ServerState>,
    Path(bot_id): Path<u64>,
) -> AppResult<Json<CommandResponse>> {
    queue(&state, SimCommand::PauseBot(BotId(bot_id)))
}

/// Delete a bot: `DELETE /api/bots/{bot_id}`
pub async fn delete_bot(
    State(state): State<ServerState>,
    Path(bot_id): Path<u64>,
) -> AppResult<Json<CommandResponse>> {
    queue(&state, SimCommand::DeleteBot(BotId(bot_id)))
}

/// Merge a settings patch: `POST /api/bots/{bot_id}/settings`
pub async fn update_settings(
    State(state): State<ServerState>,
    Path(bot_id): Path<u64>,
    Json(patch): Json<BotSettingsPatch>,
) -> AppResult<Json<CommandResponse>> {
    queue(
        &state,
        SimCommand::UpdateSettings {
            id: BotId(bot_id),
            patch,
        },
    )
}

/// Assign a bot status: `POST /api/bots/{bot_id}/status`
pub async fn set_bot_status(
    State(state): State<ServerState>,
    Path(bot_id): Path<u64>,
    Json(req): Json<StatusRequest>,
) -> AppResult<Json<CommandResponse>> {
    queue(
        &state,
        SimCommand::SetBotStatus {
            id: BotId(bot_id),
            status: req.status,
        },
    )
}
