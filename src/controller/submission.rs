use std::rc::Rc;

use crate::app::{FreshetError, Result};
use crate::domain::{FeedSource, FormState, LoadErrorKind, LoadingState};
use crate::store::Store;
use crate::sync::SyncEngine;
use crate::validation::validate;

/// Drives the two-axis submission state through the store:
///
/// ```text
/// form:         Filling → Validating → ValidatingFailed ───────────────→ Filling
///                                    → ValidatingSucceeded ────────────→ Filling
/// feed_loading: Idling ──────────────→ Loading → LoadingFailed ────────→ Idling
///                                              → LoadingSucceeded ─────→ Idling
/// ```
///
/// Every transition is a store mutation, so the presentation sees each
/// intermediate state before the final reset.
pub struct SubmissionController<S: Store> {
    engine: Rc<SyncEngine<S>>,
}

impl<S: Store> SubmissionController<S> {
    pub fn new(engine: Rc<SyncEngine<S>>) -> Self {
        Self { engine }
    }

    /// Validate and register a feed URL typed by the user.
    pub async fn submit(&self, raw_url: &str) -> Result<FeedSource> {
        let url = raw_url.trim();
        let store = self.engine.store();

        store.set_form_state(FormState::Validating);
        let result = self.add_feed(url).await;

        store.set_form_state(FormState::Filling);
        store.set_loading_state(LoadingState::Idling);
        result
    }

    async fn add_feed(&self, url: &str) -> Result<FeedSource> {
        let store = self.engine.store();

        if let Err(e) = validate(url, &store.known_urls()) {
            tracing::debug!("Rejected {:?}: {}", url, e);
            store.set_form_state(FormState::ValidatingFailed(e));
            return Err(FreshetError::Validation(e));
        }

        store.set_form_state(FormState::ValidatingSucceeded);
        store.set_loading_state(LoadingState::Loading);

        match self.engine.register(url).await {
            Ok(feed) => {
                store.set_loading_state(LoadingState::LoadingSucceeded);
                Ok(feed)
            }
            Err(e) => {
                let kind = LoadErrorKind::from(&e);
                match kind {
                    LoadErrorKind::Unknown => tracing::error!("Failed to add {}: {}", url, e),
                    _ => tracing::warn!("Failed to add {}: {}", url, e),
                }
                store.set_loading_state(LoadingState::LoadingFailed(kind));
                Err(e)
            }
        }
    }
}
