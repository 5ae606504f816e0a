//! Render-facing projections derived from the transcript state.
//!
//! Both projectors are stateless functions over the segment store. They
//! apply different validity filters: the chat grouping favors completeness,
//! the timeline favors clean diarization output.

pub mod groups;
pub mod timeline;

pub use groups::{DisplayGroup, RenderedGroup};
pub use timeline::{SpeakingInterval, TimelineInterval, TimelineRow, TimelineView};
