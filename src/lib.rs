pub mod config;
pub mod http;
pub mod nats;
pub mod session;
pub mod speakers;
pub mod transcript;
pub mod view;

pub use config::Config;
pub use http::{create_router, AppState};
pub use nats::{ChunkPayload, FinalPayload, NatsClient, RawSegment, TranscriptEvent};
pub use session::{SessionConfig, SessionStats, TranscriptSession};
pub use speakers::Language;
pub use transcript::{
    ImmediateReveal, PacedReveal, RevealProducer, TranscriptSegment, TranscriptState,
    TypingController,
};
pub use view::{RenderedGroup, SpeakingInterval, TimelineView};
