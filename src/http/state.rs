use crate::session::TranscriptSession;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Active transcript sessions (session_id → session)
    pub sessions: Arc<RwLock<HashMap<String, Arc<TranscriptSession>>>>,

    /// NATS server URL new sessions connect to
    pub nats_url: String,

    /// Reveal pacing for new sessions (characters per second)
    pub reveal_chars_per_sec: u32,
}

impl AppState {
    pub fn new(nats_url: String, reveal_chars_per_sec: u32) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            nats_url,
            reveal_chars_per_sec,
        }
    }
}
