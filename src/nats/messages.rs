use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One inbound update from the live transcription stream.
///
/// The stream multiplexes three kinds of content updates (timed-segment
/// batches, token deltas, the final authoritative snapshot) plus two
/// terminal signals. Discriminated by the `type` tag so dispatch is an
/// exhaustive match rather than shape-sniffing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TranscriptEvent {
    /// Batch of timed, speaker-attributed segments
    TranscriptChunk(ChunkPayload),

    /// Streaming token delta, optionally speaker-attributed
    Transcript {
        token: String,
        #[serde(default)]
        speaker: Option<String>,
        #[serde(default)]
        start: Option<f64>,
        #[serde(default)]
        end: Option<f64>,
    },

    /// Authoritative close-out snapshot
    Final(FinalPayload),

    /// Stream failure; the session finalizes and stops growing
    Error { message: String },

    /// Normal end of stream
    Done,
}

/// Payload of a `transcript_chunk` event. Missing fields are tolerated
/// with defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkPayload {
    #[serde(default)]
    pub segments: Vec<RawSegment>,

    /// Base offset (seconds) the inner timestamps are relative to
    #[serde(default)]
    pub start_time: Option<f64>,

    /// Declared end of the chunk's audio window (seconds)
    #[serde(default)]
    pub end_time: Option<f64>,
}

/// One timed segment inside a `transcript_chunk` batch, as produced by
/// upstream diarization. Timestamps are relative to the chunk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSegment {
    #[serde(default)]
    pub speaker: Option<String>,

    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub start: Option<f64>,

    #[serde(default)]
    pub end: Option<f64>,
}

/// Payload of the `final` event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinalPayload {
    /// Speaker tag upstream identified as the teacher
    #[serde(default)]
    pub teacher_speaker: Option<String>,

    /// Cumulative spoken seconds per speaker
    #[serde(default)]
    pub speaker_text_stats: Option<HashMap<String, f64>>,
}
