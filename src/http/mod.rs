//! HTTP API server for external control (classroom UI)
//!
//! This module provides a REST API for controlling transcript sessions:
//! - POST /sessions/start - Start consuming a session's event stream
//! - POST /sessions/stop/:id - Stop a session
//! - GET /sessions/:id/status - Query session statistics
//! - GET /sessions/:id/segments - Raw transcript state snapshot
//! - GET /sessions/:id/transcript - Grouped chat view
//! - GET /sessions/:id/timeline - Speaking timeline view
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
