//! Override reconciliation.
//!
//! One pass reads a fresh dictionary snapshot, enumerates every label under
//! the sidebar (or the whole document when the sidebar is absent) and
//! brings each label's visible text in line with its origin tag:
//!
//! - override present: show the override
//! - override absent: show the origin again
//!
//! Writes only happen when the visible text differs from the desired text,
//! so a second pass over an unchanged page writes nothing.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use slactac_config::{Config, SelectorConfig};
use slactac_protocols::{LabelDom, OverrideDictionary, Storage};

use crate::origin::OriginTags;
use crate::sanitize::Sanitizer;

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;

/// Consumer of debounced change notifications.
#[async_trait]
pub trait Reconcile: Send + Sync {
    async fn reconcile(&self);
}

/// Counters from one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Label elements in scope.
    pub scanned: usize,
    /// Labels rewritten to an override.
    pub overridden: usize,
    /// Labels rewritten back to their origin.
    pub restored: usize,
    /// Labels seen for the first time.
    pub tagged: usize,
}

impl PassReport {
    pub fn writes(&self) -> usize {
        self.overridden + self.restored
    }
}

/// Applies the override dictionary to a page.
pub struct OverrideReconciler<P: LabelDom> {
    page: Arc<P>,
    storage: Storage,
    sanitizer: Sanitizer,
    origins: Arc<dyn OriginTags<P>>,
    selectors: SelectorConfig,
    overrides_key: String,
    pass_lock: Mutex<()>,
    passes: AtomicUsize,
}

impl<P: LabelDom> OverrideReconciler<P> {
    pub fn new(
        page: Arc<P>,
        storage: Storage,
        sanitizer: Sanitizer,
        origins: Arc<dyn OriginTags<P>>,
        config: &Config,
    ) -> Self {
        Self {
            page,
            storage,
            sanitizer,
            origins,
            selectors: config.selectors.clone(),
            overrides_key: config.storage.overrides_key.clone(),
            pass_lock: Mutex::new(()),
            passes: AtomicUsize::new(0),
        }
    }

    /// Run one full pass. Returns `None` when the dictionary could not be
    /// read and the pass was skipped.
    pub async fn run(&self) -> Option<PassReport> {
        // Passes never interleave; each one works from its own snapshot.
        let _pass = self.pass_lock.lock().await;

        let snapshot = match self.storage.sync().get(&self.overrides_key).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Skipping reconciliation pass: {}", e);
                return None;
            }
        };
        let dictionary = self.sanitizer.sanitize(snapshot);
        let report = self.apply(&dictionary);
        self.passes.fetch_add(1, Ordering::SeqCst);

        debug!(
            "Reconciled {} labels: {} overridden, {} restored, {} newly tagged",
            report.scanned, report.overridden, report.restored, report.tagged
        );
        Some(report)
    }

    /// Apply an already sanitized dictionary to every label in scope.
    pub fn apply(&self, dictionary: &OverrideDictionary) -> PassReport {
        self.origins.prune();

        let page = self.page.as_ref();
        let scope = page.first_by_class(&self.selectors.sidebar_class);
        let labels = page.find_by_class(scope.as_ref(), &self.selectors.label_class);

        let mut report = PassReport {
            scanned: labels.len(),
            ..PassReport::default()
        };

        for label in labels {
            let current = page.text(&label);
            let origin = match self.origins.origin(page, &label) {
                Some(origin) => origin,
                None => {
                    let origin = current.trim().to_string();
                    self.origins.assign(page, &label, &origin);
                    report.tagged += 1;
                    origin
                }
            };

            match dictionary.get(&origin) {
                Some(replacement) => {
                    if *replacement != current {
                        page.set_text(&label, replacement);
                        report.overridden += 1;
                    }
                }
                None => {
                    if origin != current {
                        page.set_text(&label, &origin);
                        report.restored += 1;
                    }
                }
            }
        }

        report
    }

    /// Completed passes, skipped ones excluded.
    pub fn passes(&self) -> usize {
        self.passes.load(Ordering::SeqCst)
    }

    pub fn page(&self) -> &Arc<P> {
        &self.page
    }
}

#[async_trait]
impl<P: LabelDom + 'static> Reconcile for OverrideReconciler<P> {
    async fn reconcile(&self) {
        self.run().await;
    }
}
