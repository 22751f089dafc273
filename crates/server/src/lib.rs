//! Server crate: Axum-based async web services for the bot simulation.
//!
//! Provides the bridge between the synchronous simulation engine and async
//! web clients.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────┐         ┌────────────────────────┐
//! │  Simulation Thread      │         │  Axum Server           │
//! │  (sync loop)            │         │  (async/await)         │
//! │                         │         │                        │
//! │  sim.step()             │────────>│ receive snapshot       │
//! │  hook.on_snapshot()     │ channel │ broadcast to WS        │
//! │  apply queued commands  │<────────│ handle REST requests   │
//! └─────────────────────────┘         └────────────────────────┘
//! ```
//!
//! # Design Principles
//!
//! - **Declarative**: Routes and handlers declared via Axum's type-safe routing
//! - **Modular**: Each feature (health, WebSocket, API) in separate module
//! - **SoC**: Simulation owns state; server observes and broadcasts
//!
//! # Modules
//!
//! - [`app`]: Axum application builder and router setup
//! - [`state`]: Shared server state (channels, metrics, SimData)
//! - [`error`]: Unified error handling with HTTP status codes
//! - [`routes`]: HTTP route handlers (health, ws, api, data)
//! - [`bridge`]: Channel types for simulation ↔ server communication
//! - [`hooks`]: SimulationHook implementations feeding the server

pub mod app;
pub mod bridge;
pub mod error;
pub mod hooks;
pub mod routes;
pub mod state;

// Re-exports for convenience
pub use app::{create_app, serve, ServerConfig};
pub use bridge::{SimCommand, TickUpdate};
pub use error::{AppError, AppResult};
pub use hooks::{BroadcastHook, DataServiceHook};
pub use state::{ServerMetrics, ServerState, SimData};
