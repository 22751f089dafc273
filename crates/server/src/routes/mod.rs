//! Route handlers for the server.
//!
//! # Modules
//!
//! - [`health`]: Health and readiness endpoints
//! - [`ws`]: WebSocket handlers for real-time updates
//! - [`api`]: REST API endpoints for simulation and bot commands
//! - [`data`]: Read endpoints over the cached snapshot (bots, trades, market)

pub mod api;
pub mod data;
pub mod health;
pub mod ws;
