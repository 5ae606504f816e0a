//! Chunk reconciliation: merges the three inbound update channels (token
//! deltas, timed-segment batches, the final snapshot) plus the two terminal
//! signals into the transcript state.
//!
//! All operations are synchronous, applied one event at a time in arrival
//! order, and never rolled back — the design converges forward only.
//! Malformed chunks are tolerated with defaults rather than rejected.

use super::state::{TranscriptSegment, TranscriptState};
use crate::nats::messages::{ChunkPayload, FinalPayload, TranscriptEvent};
use crate::speakers::normalize_speaker;
use std::collections::HashMap;
use tracing::{error, info};

/// Fallback tag for token deltas with no speaker and no prior segment.
const DEFAULT_SPEAKER: &str = "SPEAKER_00";

impl TranscriptState {
    /// Apply one inbound event. Returns true when the event was terminal
    /// and the stream should stop being consumed.
    pub fn apply_event(&mut self, event: TranscriptEvent) -> bool {
        match event {
            TranscriptEvent::TranscriptChunk(chunk) => {
                self.apply_chunk(chunk);
                false
            }
            TranscriptEvent::Transcript {
                token,
                speaker,
                start,
                end,
            } => {
                self.apply_token(&token, speaker.as_deref(), start, end);
                false
            }
            TranscriptEvent::Final(payload) => {
                info!(
                    teacher = payload.teacher_speaker.as_deref().unwrap_or("unknown"),
                    "Final transcript snapshot received"
                );
                self.apply_final(payload);
                false
            }
            TranscriptEvent::Error { message } => {
                error!("Transcription stream error: {}", message);
                self.abort();
                true
            }
            TranscriptEvent::Done => {
                info!("Transcript stream done");
                self.finish();
                true
            }
        }
    }

    /// Append a batch of timed segments.
    ///
    /// Each inner segment becomes a brand-new segment, never merged with a
    /// prior one, with its timestamps shifted by the chunk's base offset.
    pub fn apply_chunk(&mut self, chunk: ChunkPayload) {
        let was_empty = self.segments.is_empty();
        let offset = chunk.start_time.unwrap_or(0.0);

        for raw in chunk.segments {
            let speaker = normalize_speaker(raw.speaker.as_deref().unwrap_or(""));
            let start = raw.start.unwrap_or(0.0) + offset;
            let end = raw.end.unwrap_or(0.0) + offset;
            self.segments.push(TranscriptSegment::new(
                speaker,
                raw.text,
                Some(start),
                Some(end),
            ));
        }

        if was_empty && !self.segments.is_empty() && self.current_typing_index.is_none() {
            self.current_typing_index = Some(0);
        }

        if let Some(end_time) = chunk.end_time {
            self.raise_total_duration(end_time);
        }

        self.redetect_language();
    }

    /// Append a streaming token delta.
    ///
    /// Continuation semantics: while the last segment belongs to the same
    /// effective speaker and is still open, the delta extends it in place.
    /// A speaker switch (or a completed last segment) starts a new segment.
    pub fn apply_token(
        &mut self,
        token: &str,
        speaker: Option<&str>,
        start: Option<f64>,
        end: Option<f64>,
    ) {
        let speaker = speaker
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(normalize_speaker)
            .or_else(|| {
                self.segments
                    .last()
                    .map(|s| s.speaker.clone())
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or_else(|| DEFAULT_SPEAKER.to_string());

        if self.segments.is_empty() {
            self.segments.push(TranscriptSegment::new(
                speaker,
                token.to_string(),
                start,
                end,
            ));
            self.current_typing_index = Some(0);
            self.redetect_language();
            return;
        }

        let continues = self
            .segments
            .last()
            .map_or(false, |last| last.speaker == speaker && !last.is_complete);

        if continues {
            if let Some(last) = self.segments.last_mut() {
                last.text.push_str(token);
                if end.is_some() {
                    last.end = end;
                }
            }
        } else {
            self.segments.push(TranscriptSegment::new(
                speaker,
                token.to_string(),
                start,
                end,
            ));
        }

        self.redetect_language();
    }

    /// Apply the authoritative final snapshot: teacher identity, wholesale
    /// stats replacement, duration recomputation, and unconditional
    /// completion of every segment.
    pub fn apply_final(&mut self, payload: FinalPayload) {
        if let Some(teacher) = payload
            .teacher_speaker
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            self.teacher_speaker = Some(normalize_speaker(teacher));
        }

        if let Some(stats) = payload.speaker_text_stats {
            self.update_speaker_stats(stats);
        }

        if let Some(max_end) = self.max_segment_end() {
            self.raise_total_duration(max_end);
        }

        for segment in &mut self.segments {
            segment.is_complete = true;
        }
    }

    /// Normal stream end. Idempotent: the first finalize wins and later
    /// terminal signals are no-ops.
    ///
    /// Derives duration and per-speaker stats from the segment list as a
    /// fallback for streams where `final` did not supply them. When both
    /// arrive, whichever was applied last wins (arrival order is preserved,
    /// no precedence is invented).
    pub fn finish(&mut self) {
        if self.is_finished {
            return;
        }

        if !self.segments.is_empty() {
            if let Some(max_end) = self.max_segment_end() {
                self.raise_total_duration(max_end);
            }

            let mut stats: HashMap<String, f64> = HashMap::new();
            for segment in &self.segments {
                if let Some(duration) = segment.duration() {
                    *stats.entry(segment.speaker.clone()).or_insert(0.0) += duration;
                }
            }
            if !stats.is_empty() {
                self.speaker_stats = stats;
            }
        }

        self.is_finished = true;
        self.current_typing_index = None;
        for segment in &mut self.segments {
            segment.is_complete = true;
        }
    }

    /// Error terminal. Idempotent. The transcript simply stops growing:
    /// existing segments are left untouched and nothing is discarded.
    pub fn abort(&mut self) {
        if self.is_finished {
            return;
        }
        self.is_finished = true;
        self.current_typing_index = None;
    }

    /// Mark segment `index` as fully revealed and advance the typing cursor
    /// to the next segment, or clear it past the end.
    pub fn complete_segment_typing(&mut self, index: usize) {
        if index >= self.segments.len() {
            return;
        }
        self.segments[index].is_complete = true;
        let next = index + 1;
        self.current_typing_index = if next < self.segments.len() {
            Some(next)
        } else {
            None
        };
    }

    /// Max-merge an externally supplied duration.
    pub fn set_total_duration(&mut self, duration: f64) {
        self.raise_total_duration(duration);
    }

    /// Wholesale-replace the per-speaker stats (keys normalized).
    pub fn update_speaker_stats(&mut self, stats: HashMap<String, f64>) {
        self.speaker_stats = stats
            .into_iter()
            .map(|(speaker, seconds)| (normalize_speaker(&speaker), seconds))
            .collect();
    }
}
