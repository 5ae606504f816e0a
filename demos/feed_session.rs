// Feed Session Demo: publish a scripted classroom event stream
//
// Simulates the upstream ASR/diarization pipeline by publishing a short
// lesson's worth of transcript events to NATS, so a running
// classroom-transcript service (or the HTTP API) has something to consume.
//
// Prerequisites:
// - NATS server running: docker run -p 4222:4222 nats
// - classroom-transcript service running with a session started for
//   the same session id (default: "classroom-demo")
//
// Usage: cargo run --example feed_session

use anyhow::Result;
use classroom_transcript::{ChunkPayload, FinalPayload, NatsClient, RawSegment, TranscriptEvent};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::sleep;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let session_id = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "classroom-demo".to_string());

    let nats = NatsClient::connect("nats://localhost:4222", session_id.clone()).await?;
    info!("Feeding session: {}", session_id);

    let chunks = [
        TranscriptEvent::TranscriptChunk(ChunkPayload {
            segments: vec![
                segment("speaker_00", "Good morning class, let's get started.", 0.0, 3.1),
                segment("speaker_01", "Morning!", 3.3, 3.9),
            ],
            start_time: None,
            end_time: Some(4.0),
        }),
        TranscriptEvent::TranscriptChunk(ChunkPayload {
            segments: vec![
                segment("speaker_00", "Today we cover the water cycle.", 0.2, 2.8),
                segment("speaker_00", "Evaporation, condensation, precipitation.", 3.0, 6.4),
                segment("speaker_02", "Is there a quiz on this?", 7.1, 8.9),
            ],
            start_time: Some(4.0),
            end_time: Some(13.0),
        }),
    ];

    for chunk in chunks {
        nats.publish_event(&chunk).await?;
        info!("Published chunk");
        sleep(Duration::from_millis(800)).await;
    }

    let mut stats = HashMap::new();
    stats.insert("speaker_00".to_string(), 9.1);
    stats.insert("speaker_01".to_string(), 0.6);
    stats.insert("speaker_02".to_string(), 1.8);

    nats.publish_event(&TranscriptEvent::Final(FinalPayload {
        teacher_speaker: Some("speaker_00".to_string()),
        speaker_text_stats: Some(stats),
    }))
    .await?;
    info!("Published final snapshot");

    nats.publish_event(&TranscriptEvent::Done).await?;
    info!("Published done");

    nats.close().await?;
    Ok(())
}

fn segment(speaker: &str, text: &str, start: f64, end: f64) -> RawSegment {
    RawSegment {
        speaker: Some(speaker.to_string()),
        text: text.to_string(),
        start: Some(start),
        end: Some(end),
    }
}
