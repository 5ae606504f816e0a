//! Incremental transcript assembly
//!
//! This module is the source of truth for one session's transcript:
//! - `state`: the segment store and session-wide transcript state
//! - `reconciler`: event application (token deltas, timed batches, final
//!   snapshot, terminal signals)
//! - `typing`: the single global typing cursor and its reveal producers

mod reconciler;
mod state;
mod typing;

pub use state::{TranscriptSegment, TranscriptState};
pub use typing::{ImmediateReveal, PacedReveal, RevealProducer, TypingController};
