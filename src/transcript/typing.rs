//! Typing cursor control: drives the one-segment-at-a-time text reveal.
//!
//! The controller owns the map of in-flight reveal producers (at most one
//! is active per session) and a per-segment display buffer holding the
//! revealed-so-far text. It is a small scheduler over the state machine
//! Idle / Typing(i): starting a new index cancels the producer for any
//! previous index, and teardown cancels everything.
//!
//! The reveal itself is best-effort: a failed or aborted producer falls
//! back to displaying the segment's full text and the segment is treated
//! as complete. Transcript integrity never depends on the reveal.

use super::state::TranscriptState;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, warn};

/// Produces a segment's text incrementally for the typing effect.
///
/// Implementations emit successive fragments of `text` on `out` at their
/// own pace and return when done. Cancellation is external: the controller
/// stops listening and aborts the producer task; a producer must not rely
/// on running to completion.
#[async_trait]
pub trait RevealProducer: Send + Sync + 'static {
    async fn run(&self, text: String, out: mpsc::Sender<String>) -> Result<()>;
}

/// Character-at-a-time reveal with a fixed pacing budget.
pub struct PacedReveal {
    delay: Duration,
}

impl PacedReveal {
    /// `chars_per_sec` of 0 falls back to an unpaced reveal.
    pub fn new(chars_per_sec: u32) -> Self {
        let delay = if chars_per_sec == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs(1) / chars_per_sec
        };
        Self { delay }
    }
}

#[async_trait]
impl RevealProducer for PacedReveal {
    async fn run(&self, text: String, out: mpsc::Sender<String>) -> Result<()> {
        for c in text.chars() {
            if out.send(c.to_string()).await.is_err() {
                // Receiver gone: the reveal was superseded or torn down.
                return Ok(());
            }
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }
        Ok(())
    }
}

/// Reveals the whole text in one step. Used by tests and headless callers
/// that want the transcript without the visual effect.
pub struct ImmediateReveal;

#[async_trait]
impl RevealProducer for ImmediateReveal {
    async fn run(&self, text: String, out: mpsc::Sender<String>) -> Result<()> {
        let _ = out.send(text).await;
        Ok(())
    }
}

/// One in-flight reveal: the cancellation flag checked before every display
/// mutation, plus handles to stop both halves of the pipeline.
struct TypingTask {
    cancelled: Arc<AtomicBool>,
    producer_abort: AbortHandle,
    consumer: JoinHandle<()>,
}

impl TypingTask {
    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.producer_abort.abort();
        self.consumer.abort();
    }
}

/// Owns the typing state machine for one session.
pub struct TypingController {
    state: Arc<Mutex<TranscriptState>>,
    display: Arc<Mutex<Vec<String>>>,
    producer: Arc<dyn RevealProducer>,
    tasks: std::sync::Mutex<HashMap<usize, TypingTask>>,
    completed_tx: mpsc::UnboundedSender<usize>,
}

impl TypingController {
    /// Returns the controller plus the channel on which it reports segment
    /// indices whose reveal finished. The session loop consumes that channel,
    /// marks the segment complete, and calls `sync` again to advance.
    pub fn new(
        state: Arc<Mutex<TranscriptState>>,
        producer: Arc<dyn RevealProducer>,
    ) -> (Self, mpsc::UnboundedReceiver<usize>) {
        let (completed_tx, completed_rx) = mpsc::unbounded_channel();
        let controller = Self {
            state,
            display: Arc::new(Mutex::new(Vec::new())),
            producer,
            tasks: std::sync::Mutex::new(HashMap::new()),
            completed_tx,
        };
        (controller, completed_rx)
    }

    /// Per-segment revealed-so-far text, index-aligned with the segments.
    pub fn display_handle(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.display)
    }

    /// Reconcile the running producers against the state's typing cursor.
    ///
    /// Sizes the display buffer, flushes full text for completed segments
    /// that are not the cursor, cancels producers whose index was
    /// superseded, and starts a producer for the cursor if none is running.
    /// The producer drives a snapshot of the segment's text taken here;
    /// later appends are flushed when the segment completes.
    pub async fn sync(&self) {
        let (cursor, snapshot, segment_count, completed) = {
            let state = self.state.lock().await;
            let cursor = state.current_typing_index;
            let snapshot = cursor.and_then(|i| state.segments.get(i).map(|s| s.text.clone()));
            let completed: Vec<(usize, String)> = state
                .segments
                .iter()
                .enumerate()
                .filter(|(i, s)| s.is_complete && cursor != Some(*i))
                .map(|(i, s)| (i, s.text.clone()))
                .collect();
            (cursor, snapshot, state.segments.len(), completed)
        };

        // Cancel superseded producers before touching the display, so a
        // stale producer cannot write over the flushed text below.
        let start = {
            let mut tasks = match self.tasks.lock() {
                Ok(tasks) => tasks,
                Err(poisoned) => poisoned.into_inner(),
            };
            tasks.retain(|&index, task| {
                if Some(index) == cursor {
                    true
                } else {
                    debug!("Cancelling superseded reveal for segment {}", index);
                    task.cancel();
                    false
                }
            });
            match (cursor, snapshot) {
                (Some(index), Some(text)) if !tasks.contains_key(&index) => Some((index, text)),
                _ => None,
            }
        };

        {
            let mut display = self.display.lock().await;
            while display.len() < segment_count {
                display.push(String::new());
            }
            for (index, text) in completed {
                if let Some(slot) = display.get_mut(index) {
                    *slot = text;
                }
            }
        }

        if let Some((index, text)) = start {
            self.start_reveal(index, text).await;
        }
    }

    async fn start_reveal(&self, index: usize, text: String) {
        // The reveal accumulates from scratch for this run.
        {
            let mut display = self.display.lock().await;
            if let Some(slot) = display.get_mut(index) {
                slot.clear();
            }
        }

        let (tx, mut rx) = mpsc::channel::<String>(32);
        let producer = Arc::clone(&self.producer);
        let producer_text = text.clone();
        let producer_task =
            tokio::spawn(async move { producer.run(producer_text, tx).await });
        let producer_abort = producer_task.abort_handle();

        let cancelled = Arc::new(AtomicBool::new(false));
        let consumer = tokio::spawn({
            let cancelled = Arc::clone(&cancelled);
            let display = Arc::clone(&self.display);
            let completed_tx = self.completed_tx.clone();
            async move {
                while let Some(fragment) = rx.recv().await {
                    if cancelled.load(Ordering::SeqCst) {
                        return;
                    }
                    let mut display = display.lock().await;
                    if let Some(slot) = display.get_mut(index) {
                        slot.push_str(&fragment);
                    }
                }

                let clean = matches!(producer_task.await, Ok(Ok(())));
                if cancelled.load(Ordering::SeqCst) {
                    return;
                }
                if !clean {
                    // Reveal failure: show the full snapshot immediately.
                    warn!("Reveal producer failed for segment {}", index);
                    let mut display = display.lock().await;
                    if let Some(slot) = display.get_mut(index) {
                        *slot = text;
                    }
                }
                let _ = completed_tx.send(index);
            }
        });

        let task = TypingTask {
            cancelled,
            producer_abort,
            consumer,
        };
        let mut tasks = match self.tasks.lock() {
            Ok(tasks) => tasks,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(previous) = tasks.insert(index, task) {
            previous.cancel();
        }
    }

    /// Cancel every outstanding producer and clear the task map. Safe to
    /// call repeatedly; also runs on drop so teardown is guaranteed however
    /// it is triggered.
    pub fn shutdown(&self) {
        let mut tasks = match self.tasks.lock() {
            Ok(tasks) => tasks,
            Err(poisoned) => poisoned.into_inner(),
        };
        for (_, task) in tasks.drain() {
            task.cancel();
        }
    }
}

impl Drop for TypingController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
