//! Trailing debounce for search-as-you-type.
//!
//! Raw text changes go in through [`SearchDebouncer::push`]; a value comes out
//! of the settled channel once no further change has arrived for the quiet
//! window. Consecutive duplicates are dropped on the way in and never restart
//! the timer.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

#[derive(Debug)]
pub struct SearchDebouncer {
    tx: mpsc::UnboundedSender<String>,
    task: JoinHandle<()>,
}

impl SearchDebouncer {
    /// Starts the debounce worker on the current tokio runtime.
    pub fn spawn(quiet: Duration, settled: mpsc::UnboundedSender<String>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(quiet, rx, settled));
        Self { tx, task }
    }

    /// Feeds one text change. Returns false once the worker has stopped.
    pub fn push(&self, text: impl Into<String>) -> bool {
        self.tx.send(text.into()).is_ok()
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        // A pending value must not fire after teardown.
        self.task.abort();
    }
}

async fn run(
    quiet: Duration,
    mut rx: mpsc::UnboundedReceiver<String>,
    settled: mpsc::UnboundedSender<String>,
) {
    let mut last_received: Option<String> = None;
    let mut last_emitted: Option<String> = None;
    let mut pending: Option<(String, Instant)> = None;

    loop {
        let incoming = match pending.take() {
            None => rx.recv().await,
            Some((text, deadline)) => {
                tokio::select! {
                    next = rx.recv() => {
                        pending = Some((text, deadline));
                        next
                    }
                    _ = sleep_until(deadline) => {
                        if last_emitted.as_deref() == Some(text.as_str()) {
                            debug!("Settled query unchanged, skipping: '{}'", text);
                            continue;
                        }
                        debug!("Settled query: '{}'", text);
                        last_emitted = Some(text.clone());
                        if settled.send(text).is_err() {
                            return;
                        }
                        continue;
                    }
                }
            }
        };

        let Some(text) = incoming else {
            // Input closed: drop whatever is pending.
            return;
        };
        if last_received.as_deref() == Some(text.as_str()) {
            continue;
        }
        last_received = Some(text.clone());
        pending = Some((text, Instant::now() + quiet));
    }
}
