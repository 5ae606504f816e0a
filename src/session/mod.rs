//! Transcript session management
//!
//! This module provides the `TranscriptSession` abstraction that manages:
//! - Consuming a session's live transcription event stream from NATS
//! - Reconciling events into the transcript state
//! - Driving the typing cursor and its reveal producers
//! - Render projections (grouped chat view, speaking timeline)
//! - Session statistics and lifecycle

mod config;
mod session;
mod stats;

pub use config::SessionConfig;
pub use session::TranscriptSession;
pub use stats::SessionStats;
