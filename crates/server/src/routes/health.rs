//! Health check endpoints.
//!
//! Provides liveness and readiness probes for the server.
//!
//! # Endpoints
//!
//! - `GET /health` - Liveness probe (always 200 if server is up)
//! - `GET /health/ready` - Readiness probe (200 once ticks are flowing)
//!
//! # Design Principles
//!
//! - **Declarative**: Response types define the contract
//! - **Modular**: Health checks independent of other routes
//! - **SoC**: Handlers only read state, don't modify

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::ServerState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status.
    pub status: &'static str,
    /// Current simulation tick.
    pub tick: u64,
    /// Total bot count.
    pub bots: u64,
    /// Server uptime in seconds.
    pub uptime_secs: u64,
    /// Active WebSocket connections.
    pub ws_connections: u64,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// Whether server is ready.
    pub ready: bool,
    /// Readiness reason.
    pub reason: &'static str,
    /// Tick loop running state.
    pub sim_running: bool,
}

/// Liveness probe: `GET /health`
///
/// Returns 200 if the server is running.
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let metrics = &state.metrics;

    Json(HealthResponse {
        status: "healthy",
        tick: metrics.tick(),
        bots: metrics.bots(),
        uptime_secs: state.uptime_secs(),
        ws_connections: metrics.ws_count(),
    })
}

/// Readiness probe: `GET /health/ready`
///
/// Returns ready=true once the simulation has produced at least one tick or
/// the tick loop is running.
pub async fn ready(State(state): State<ServerState>) -> Json<ReadyResponse> {
    let metrics = &state.metrics;
    let running = metrics.is_running();

    let (ready, reason) = if running {
        (true, "simulation running")
    } else if metrics.tick() > 0 {
        (true, "simulation paused")
    } else {
        (false, "waiting for first tick")
    };

    Json(ReadyResponse {
        ready,
        reason,
        sim_running: running,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: "healthy",
            tick: 100,
            bots: 3,
            uptime_secs: 60,
            ws_connections: 5,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(json.contains("\"tick\":100"));
    }

    #[test]
    fn test_ready_response_serialization() {
        let response = ReadyResponse {
            ready: true,
            reason: "simulation running",
            sim_running: true,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"ready\":true"));
    }
}
