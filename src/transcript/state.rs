use crate::speakers::{self, Language};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A contiguous span of attributed speech.
///
/// Text is append-only until `is_complete`; `start`/`end` are seconds from
/// session start and are not guaranteed monotonic across segments (the
/// stream can deliver out of temporal order).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Unique id, assigned at creation, never reused
    pub id: String,

    /// Normalized speaker tag (trimmed, uppercased)
    pub speaker: String,

    /// Accumulated transcript text
    pub text: String,

    /// Start offset in seconds, once known
    pub start: Option<f64>,

    /// End offset in seconds, once known
    pub end: Option<f64>,

    /// True once no further text will be appended
    pub is_complete: bool,
}

impl TranscriptSegment {
    pub(crate) fn new(
        speaker: String,
        text: String,
        start: Option<f64>,
        end: Option<f64>,
    ) -> Self {
        let id = format!("{}-{}", speaker, uuid::Uuid::new_v4());
        Self {
            id,
            speaker,
            text,
            start,
            end,
            is_complete: false,
        }
    }

    /// Spoken duration, when both endpoints are known.
    pub fn duration(&self) -> Option<f64> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

/// The consolidated transcript for one session: source of truth for text,
/// timing, speaker attribution, and completion state.
///
/// Mutated exclusively by the reconciler operations (see `reconciler.rs`)
/// and by typing completion. There is no partial reset path: `reset`
/// restores every field.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TranscriptState {
    /// Segments in arrival order
    pub segments: Vec<TranscriptSegment>,

    /// The single "currently revealing" segment index, if any
    pub current_typing_index: Option<usize>,

    /// Whether the stream has terminated (normally or with an error)
    pub is_finished: bool,

    /// Normalized teacher speaker tag, once identified by the final snapshot
    pub teacher_speaker: Option<String>,

    /// Monotonically non-decreasing upper bound on speech end time (seconds)
    pub total_duration: Option<f64>,

    /// Cumulative spoken seconds per speaker; wholesale-replaced on each
    /// authoritative payload
    pub speaker_stats: HashMap<String, f64>,

    /// Majority-script language of the accumulated text
    pub detected_language: Option<Language>,
}

impl TranscriptState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Language to localize labels for (default English until detected).
    pub fn language(&self) -> Language {
        self.detected_language.unwrap_or_default()
    }

    /// Raise `total_duration` to `candidate` if larger. Never decreases.
    pub(crate) fn raise_total_duration(&mut self, candidate: f64) {
        let current = self.total_duration.unwrap_or(0.0);
        self.total_duration = Some(current.max(candidate));
    }

    /// Max positive end time across segments, if any.
    pub(crate) fn max_segment_end(&self) -> Option<f64> {
        self.segments
            .iter()
            .filter_map(|s| s.end)
            .filter(|e| *e > 0.0)
            .fold(None, |acc: Option<f64>, e| {
                Some(acc.map_or(e, |a| a.max(e)))
            })
    }

    /// Re-derive the detected language from the accumulated text.
    pub(crate) fn redetect_language(&mut self) {
        if self.segments.is_empty() {
            return;
        }
        let zh = self
            .segments
            .iter()
            .any(|s| s.text.chars().any(speakers::is_cjk));
        self.detected_language = Some(if zh { Language::Zh } else { Language::En });
    }

    /// Restore every field to its initial value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
