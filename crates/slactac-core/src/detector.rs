//! Change detection.
//!
//! Subscribes to page mutations, filters each batch down to "labels may
//! have changed" and collapses bursts of relevant batches into one
//! reconciliation after a quiet window.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info};

use slactac_protocols::{LabelDom, MutationBatch, MutationSource, ObserverId};

use crate::reconciler::Reconcile;

#[cfg(test)]
#[path = "detector_tests.rs"]
mod tests;

/// Debounced mutation watcher feeding a [`Reconcile`] consumer.
pub struct ChangeDetector<P: MutationSource> {
    page: Arc<P>,
    consumer: Arc<dyn Reconcile>,
    label_class: String,
    debounce: Duration,
    running: Mutex<Option<Running>>,
}

struct Running {
    observer: ObserverId,
    shutdown_tx: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl<P: MutationSource + 'static> ChangeDetector<P> {
    pub fn new(
        page: Arc<P>,
        consumer: Arc<dyn Reconcile>,
        label_class: impl Into<String>,
        debounce: Duration,
    ) -> Self {
        Self {
            page,
            consumer,
            label_class: label_class.into(),
            debounce,
            running: Mutex::new(None),
        }
    }

    /// Subscribe and run the initial pass. Returns false if already running.
    pub fn start(&self) -> bool {
        let mut running = self.running.lock();
        if running.is_some() {
            return false;
        }

        let (batch_tx, batch_rx) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let observer = self.page.observe(batch_tx);

        let handle = tokio::spawn(Self::run_loop(
            self.page.clone(),
            self.consumer.clone(),
            self.label_class.clone(),
            self.debounce,
            batch_rx,
            shutdown_rx,
        ));

        info!(
            "Change detector started (debounce {} ms)",
            self.debounce.as_millis()
        );
        *running = Some(Running {
            observer,
            shutdown_tx,
            handle,
        });
        true
    }

    /// Unsubscribe and wait for the task to finish. A pending debounced
    /// pass is dropped. Returns false if not running.
    pub async fn stop(&self) -> bool {
        let Some(running) = self.running.lock().take() else {
            return false;
        };
        self.page.disconnect(running.observer);
        let _ = running.shutdown_tx.send(()).await;
        let _ = running.handle.await;
        info!("Change detector stopped");
        true
    }

    pub fn is_running(&self) -> bool {
        self.running.lock().is_some()
    }

    async fn run_loop(
        page: Arc<P>,
        consumer: Arc<dyn Reconcile>,
        label_class: String,
        debounce: Duration,
        mut batches: mpsc::UnboundedReceiver<MutationBatch<P::Node>>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        consumer.reconcile().await;

        // Single slot: a relevant batch always restarts the window.
        let mut deadline: Option<Instant> = None;

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => break,
                batch = batches.recv() => match batch {
                    Some(batch) => {
                        if is_relevant(page.as_ref(), &label_class, &batch) {
                            deadline = Some(Instant::now() + debounce);
                        }
                    }
                    None => {
                        debug!("Mutation stream closed");
                        break;
                    }
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    deadline = None;
                    consumer.reconcile().await;
                }
            }
        }
    }
}

/// Whether a batch may have changed the set or text of labels.
///
/// Removals always count: a detached subtree cannot be inspected reliably.
pub fn is_relevant<P: LabelDom>(page: &P, label_class: &str, batch: &MutationBatch<P::Node>) -> bool {
    batch.iter().any(|record| {
        !record.removed.is_empty()
            || record.added.iter().any(|node| {
                page.has_class(node, label_class)
                    || !page.find_by_class(Some(node), label_class).is_empty()
            })
    })
}
