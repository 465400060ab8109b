//! Suggestion Board - Optimistic Mutator
//!
//! Holds the client's copy of the policy suggestion list, fetched
//! independently of snapshot refresh cycles. Approve/deny commands are
//! applied locally first so the console reacts instantly, then confirmed
//! against the backend; a failed confirmation restores the exact
//! pre-mutation status. One pending mutation per suggestion id at a time.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::api::client::{ApiError, SyncApi};
use crate::api::types::{Suggestion, SuggestionStatus};
use crate::logic::notify::{SubscriberSet, Subscription};

/// Why a mutation was rejected or failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutateError {
    /// A confirm request for this suggestion is already outstanding
    #[error("a decision for suggestion {0} is already in flight")]
    Conflict(String),
    /// Suggestion id not present in the local list
    #[error("unknown suggestion {0}")]
    UnknownSuggestion(String),
    /// Suggestion already left the pending state
    #[error("suggestion {id} is already {status:?}")]
    AlreadyResolved {
        id: String,
        status: SuggestionStatus,
    },
    /// `Pending` is not a valid decision target
    #[error("pending is not a valid decision")]
    InvalidTarget,
    /// The confirm request failed; local state has been rolled back
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Per-suggestion lock recording the pre-mutation status for rollback
struct PendingMutation {
    rollback_status: SuggestionStatus,
}

/// Observable, optimistically mutated suggestion list
pub struct SuggestionBoard<C: SyncApi> {
    api: Arc<C>,
    suggestions: RwLock<Vec<Suggestion>>,
    pending: Mutex<HashMap<String, PendingMutation>>,
    subscribers: SubscriberSet,
}

impl<C: SyncApi> SuggestionBoard<C> {
    pub fn new(api: Arc<C>) -> Self {
        Self {
            api,
            suggestions: RwLock::new(Vec::new()),
            pending: Mutex::new(HashMap::new()),
            subscribers: SubscriberSet::new(),
        }
    }

    /// Replace the local list from `GET /suggestions`
    pub async fn refresh(&self) -> Result<(), ApiError> {
        let list = self.api.list_suggestions().await?;
        log::debug!("Fetched {} suggestions", list.len());
        *self.suggestions.write() = list;
        self.subscribers.notify();
        Ok(())
    }

    /// Current local copy of the list
    pub fn suggestions(&self) -> Vec<Suggestion> {
        self.suggestions.read().clone()
    }

    /// Whether a confirm request is outstanding for this id
    pub fn is_pending(&self, id: &str) -> bool {
        self.pending.lock().contains_key(id)
    }

    /// Register a change callback
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    /// Approve or deny a suggestion with optimistic local effect
    ///
    /// The target status is visible to subscribers before the confirm
    /// request is issued. On success the server's returned status wins,
    /// even if it drifts from the target. On any transport error the exact
    /// pre-mutation status is restored and the error surfaced.
    pub async fn decide(
        &self,
        id: &str,
        target: SuggestionStatus,
    ) -> Result<SuggestionStatus, MutateError> {
        if target == SuggestionStatus::Pending {
            return Err(MutateError::InvalidTarget);
        }

        // Validate and take the per-suggestion lock in one critical section
        {
            let mut pending = self.pending.lock();
            if pending.contains_key(id) {
                return Err(MutateError::Conflict(id.to_string()));
            }

            let current = self
                .suggestions
                .read()
                .iter()
                .find(|s| s.id == id)
                .map(|s| s.status)
                .ok_or_else(|| MutateError::UnknownSuggestion(id.to_string()))?;

            if current.is_terminal() {
                return Err(MutateError::AlreadyResolved {
                    id: id.to_string(),
                    status: current,
                });
            }

            pending.insert(
                id.to_string(),
                PendingMutation {
                    rollback_status: current,
                },
            );
        }

        // Optimistic local apply
        self.set_local_status(id, target);
        self.subscribers.notify();

        let confirmation = match target {
            SuggestionStatus::Approved => self.api.approve_suggestion(id).await,
            SuggestionStatus::Denied => self.api.deny_suggestion(id).await,
            SuggestionStatus::Pending => unreachable!("rejected above"),
        };

        match confirmation {
            Ok(decision) => {
                if decision.status != target {
                    log::warn!(
                        "Suggestion {} confirmed as {:?}, expected {:?}; server wins",
                        id,
                        decision.status,
                        target
                    );
                }
                self.set_local_status(id, decision.status);
                self.pending.lock().remove(id);
                self.subscribers.notify();
                Ok(decision.status)
            }
            Err(err) => {
                let rollback = self
                    .pending
                    .lock()
                    .remove(id)
                    .map(|p| p.rollback_status)
                    .unwrap_or(SuggestionStatus::Pending);
                log::warn!(
                    "Decision for suggestion {} failed ({}), rolling back to {:?}",
                    id,
                    err,
                    rollback
                );
                self.set_local_status(id, rollback);
                self.subscribers.notify();
                Err(MutateError::Api(err))
            }
        }
    }

    fn set_local_status(&self, id: &str, status: SuggestionStatus) {
        let mut list = self.suggestions.write();
        if let Some(suggestion) = list.iter_mut().find(|s| s.id == id) {
            suggestion.status = status;
        }
    }
}
