use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Statistics about a transcript session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Whether the event stream is still being consumed
    pub is_running: bool,

    /// Whether the transcript has been finalized (done or error)
    pub is_finished: bool,

    /// When the session started
    pub started_at: DateTime<Utc>,

    /// Wall-clock seconds since the session started
    pub duration_secs: f64,

    /// Number of transcript segments assembled so far
    pub segment_count: usize,

    /// Number of chat display groups
    pub group_count: usize,

    /// Upper bound on speech end time, once known (seconds)
    pub total_speech_secs: Option<f64>,
}
