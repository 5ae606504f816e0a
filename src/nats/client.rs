use super::messages::TranscriptEvent;
use anyhow::{Context, Result};
use async_nats::Client;
use tracing::info;

pub struct NatsClient {
    client: Client,
    session_id: String,
}

impl NatsClient {
    /// Connect to NATS server
    pub async fn connect(url: &str, session_id: String) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self { client, session_id })
    }

    fn subject(&self) -> String {
        format!("transcript.events.{}", self.session_id)
    }

    /// Publish one transcript event for this session. Used by the demo
    /// feeder and by upstream services speaking the same wire format.
    pub async fn publish_event(&self, event: &TranscriptEvent) -> Result<()> {
        let subject = self.subject();
        let payload = serde_json::to_vec(event)?;

        self.client
            .publish(subject, payload.into())
            .await
            .context("Failed to publish transcript event")?;

        Ok(())
    }

    /// Subscribe to this session's transcript event stream
    pub async fn subscribe_events(&self) -> Result<async_nats::Subscriber> {
        let subject = self.subject();

        info!("Subscribing to transcript events on {}", subject);

        let subscriber = self
            .client
            .subscribe(subject.clone())
            .await
            .context("Failed to subscribe to transcript events")?;

        info!("Subscribed to {}", subject);

        Ok(subscriber)
    }

    /// Close NATS connection
    pub async fn close(self) -> Result<()> {
        info!("Closing NATS connection");
        // async-nats handles cleanup on drop
        Ok(())
    }
}
