use super::config::SessionConfig;
use super::stats::SessionStats;
use crate::nats::{NatsClient, TranscriptEvent};
use crate::transcript::{PacedReveal, TranscriptState, TypingController};
use crate::view::{groups, timeline, RenderedGroup, TimelineView};
use anyhow::{Context, Result};
use chrono::Utc;
use futures::stream::StreamExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// A transcript session: consumes one live transcription event stream from
/// NATS, reconciles it into the transcript state, and drives the typing
/// cursor. Projections for the render layer are derived on demand.
pub struct TranscriptSession {
    /// Session configuration
    config: SessionConfig,

    /// NATS client delivering the event stream
    nats_client: Arc<NatsClient>,

    /// When the session started
    started_at: chrono::DateTime<chrono::Utc>,

    /// Whether the event stream is currently being consumed
    is_running: Arc<AtomicBool>,

    /// Consolidated transcript state
    state: Arc<Mutex<TranscriptState>>,

    /// Typing cursor controller (owns the reveal producers)
    controller: Arc<TypingController>,

    /// Completion channel handed to the typing task at start
    typing_completed_rx: Mutex<Option<mpsc::UnboundedReceiver<usize>>>,

    /// Handle for the event consumption task
    event_task_handle: Arc<Mutex<Option<JoinHandle<()>>>>,

    /// Handle for the typing advancement task
    typing_task_handle: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl TranscriptSession {
    /// Create a new transcript session
    pub async fn new(config: SessionConfig) -> Result<Self> {
        info!("Creating transcript session: {}", config.session_id);

        let nats_client = Arc::new(
            NatsClient::connect(&config.nats_url, config.session_id.clone())
                .await
                .context("Failed to connect to NATS")?,
        );

        let state = Arc::new(Mutex::new(TranscriptState::new()));
        let producer = Arc::new(PacedReveal::new(config.reveal_chars_per_sec));
        let (controller, typing_completed_rx) =
            TypingController::new(Arc::clone(&state), producer);

        Ok(Self {
            config,
            nats_client,
            started_at: Utc::now(),
            is_running: Arc::new(AtomicBool::new(false)),
            state,
            controller: Arc::new(controller),
            typing_completed_rx: Mutex::new(Some(typing_completed_rx)),
            event_task_handle: Arc::new(Mutex::new(None)),
            typing_task_handle: Arc::new(Mutex::new(None)),
        })
    }

    /// Start consuming the event stream
    pub async fn start(&self) -> Result<()> {
        if self.is_running.load(Ordering::SeqCst) {
            warn!("Session already started");
            return Ok(());
        }

        info!("Starting transcript session: {}", self.config.session_id);

        self.is_running.store(true, Ordering::SeqCst);

        let mut event_sub = self
            .nats_client
            .subscribe_events()
            .await
            .context("Failed to subscribe to transcript events")?;

        // Spawn the event consumption task. Events are applied one at a
        // time in arrival order; the loop stops at the first terminal
        // event or when the session is stopped.
        let state = Arc::clone(&self.state);
        let controller = Arc::clone(&self.controller);
        let is_running = Arc::clone(&self.is_running);
        let session_id = self.config.session_id.clone();

        let event_task = tokio::spawn(async move {
            info!("Event consumption task started");

            while let Some(msg) = event_sub.next().await {
                if !is_running.load(Ordering::SeqCst) {
                    break;
                }

                let event = match serde_json::from_slice::<TranscriptEvent>(&msg.payload) {
                    Ok(event) => event,
                    Err(e) => {
                        warn!("Failed to parse transcript event: {}", e);
                        continue;
                    }
                };

                let terminal = {
                    let mut state = state.lock().await;
                    state.apply_event(event)
                };
                controller.sync().await;

                if terminal {
                    info!("Session {} reached terminal event", session_id);
                    break;
                }
            }

            info!("Event consumption task stopped");
        });

        {
            let mut handle = self.event_task_handle.lock().await;
            *handle = Some(event_task);
        }

        // Spawn the typing advancement task: when a reveal finishes, mark
        // the segment complete and let the controller move to the next one.
        let completed_rx = {
            let mut slot = self.typing_completed_rx.lock().await;
            slot.take()
        };

        if let Some(mut completed_rx) = completed_rx {
            let state = Arc::clone(&self.state);
            let controller = Arc::clone(&self.controller);
            let is_running = Arc::clone(&self.is_running);

            let typing_task = tokio::spawn(async move {
                while let Some(index) = completed_rx.recv().await {
                    if !is_running.load(Ordering::SeqCst) {
                        break;
                    }
                    {
                        let mut state = state.lock().await;
                        state.complete_segment_typing(index);
                    }
                    controller.sync().await;
                }
            });

            let mut handle = self.typing_task_handle.lock().await;
            *handle = Some(typing_task);
        }

        info!("Transcript session started successfully");

        Ok(())
    }

    /// Stop the session: tear down the typing producers, stop consuming
    /// events, and return final statistics.
    pub async fn stop(&self) -> Result<SessionStats> {
        if !self.is_running.load(Ordering::SeqCst) {
            warn!("Session not running");
            return self.get_stats().await;
        }

        info!("Stopping transcript session: {}", self.config.session_id);

        self.is_running.store(false, Ordering::SeqCst);
        self.controller.shutdown();

        {
            let mut handle = self.event_task_handle.lock().await;
            if let Some(task) = handle.take() {
                task.abort();
                if let Err(e) = task.await {
                    if !e.is_cancelled() {
                        error!("Event task panicked: {}", e);
                    }
                }
            }
        }

        {
            let mut handle = self.typing_task_handle.lock().await;
            if let Some(task) = handle.take() {
                task.abort();
                if let Err(e) = task.await {
                    if !e.is_cancelled() {
                        error!("Typing task panicked: {}", e);
                    }
                }
            }
        }

        info!("Transcript session stopped successfully");

        self.get_stats().await
    }

    /// Get current session statistics
    pub async fn get_stats(&self) -> Result<SessionStats> {
        let duration = Utc::now().signed_duration_since(self.started_at);
        let state = self.state.lock().await;
        let group_count = groups::build_groups(&state.segments, state.current_typing_index).len();

        Ok(SessionStats {
            is_running: self.is_running.load(Ordering::SeqCst),
            is_finished: state.is_finished,
            started_at: self.started_at,
            duration_secs: duration.num_milliseconds() as f64 / 1000.0,
            segment_count: state.segments.len(),
            group_count,
            total_speech_secs: state.total_duration,
        })
    }

    /// Read-only snapshot of the transcript state
    pub async fn snapshot(&self) -> TranscriptState {
        self.state.lock().await.clone()
    }

    /// Chat-style grouped view, including in-progress reveal text
    pub async fn grouped_view(&self) -> Vec<RenderedGroup> {
        let display = self.controller.display_handle();
        let state = self.state.lock().await;
        let reveals = display.lock().await;
        groups::project(&state, &reveals)
    }

    /// Speaking-timeline view; `None` when there is nothing to draw
    pub async fn timeline_view(&self) -> Option<TimelineView> {
        let state = self.state.lock().await;
        timeline::project(
            &state.segments,
            state.teacher_speaker.as_deref(),
            state.total_duration,
            state.language(),
        )
    }
}
