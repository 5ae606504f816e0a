use serde::{Deserialize, Serialize};

/// Configuration for a transcript session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Unique session identifier (e.g., "classroom-2026-03-12-period2")
    pub session_id: String,

    /// NATS server URL
    pub nats_url: String,

    /// Reveal pacing for the typing effect (characters per second);
    /// 0 disables pacing
    pub reveal_chars_per_sec: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("classroom-{}", uuid::Uuid::new_v4()),
            nats_url: "nats://localhost:4222".to_string(),
            reveal_chars_per_sec: 150,
        }
    }
}
