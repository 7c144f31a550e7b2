use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::{StoreError, SwipeRecord, SwipeStore};
use crate::models::{Decision, Match, SwipeDecision, SwipeOutcome};
use crate::services::events::{MatchEvents, MatchNotification};

#[derive(Debug, thiserror::Error)]
pub enum SwipeError {
    #[error("already swiped {previous} on this profile")]
    AlreadySwiped { previous: Decision },

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The caller's decision about a target and where the pair stands.
#[derive(Debug, Clone)]
pub struct SwipeResult {
    pub swipe: SwipeDecision,
    pub outcome: SwipeOutcome,
    pub match_record: Option<Match>,
}

/// Records swipes, resolves pair outcomes and materializes matches.
///
/// Holds no per-user state; every call reads from the store.
pub struct SwipeService {
    store: Arc<dyn SwipeStore>,
    events: MatchEvents,
    storage_timeout: Duration,
}

impl SwipeService {
    pub fn new(store: Arc<dyn SwipeStore>, events: MatchEvents, storage_timeout: Duration) -> Self {
        Self {
            store,
            events,
            storage_timeout,
        }
    }

    pub fn events(&self) -> &MatchEvents {
        &self.events
    }

    async fn bounded<T, F>(&self, operation: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        tokio::time::timeout(self.storage_timeout, operation)
            .await
            .map_err(|_| StoreError::Timeout(self.storage_timeout))?
    }

    /// Runs a write on its own task and waits for it within the deadline.
    /// Dropping the wait (deadline, client gone) leaves the task running, so a
    /// committed write still publishes what it created.
    async fn detached<T, F>(&self, operation: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, StoreError>> + Send + 'static,
    {
        let task = tokio::spawn(operation);
        self.bounded(async move {
            match task.await {
                Ok(result) => result,
                Err(err) => Err(StoreError::Aborted(err.to_string())),
            }
        })
        .await
    }

    pub async fn touch_profile(&self, user_id: Uuid) -> Result<(), SwipeError> {
        Ok(self.bounded(self.store.touch_profile(user_id)).await?)
    }

    /// Records `actor_id`'s decision about `target_id` and resolves the pair.
    ///
    /// A repeated swipe on the same target fails with `AlreadySwiped` carrying
    /// the stored decision; nothing is written in that case.
    pub async fn record_swipe(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
        decision: Decision,
    ) -> Result<SwipeResult, SwipeError> {
        if actor_id == target_id {
            return Err(SwipeError::InvalidTarget("cannot swipe on yourself".to_string()));
        }
        if !self.bounded(self.store.profile_exists(target_id)).await? {
            return Err(SwipeError::InvalidTarget(format!("unknown profile {target_id}")));
        }

        let store = self.store.clone();
        let events = self.events.clone();
        let record = self
            .detached(async move {
                let record = store.record_swipe(actor_id, target_id, decision).await?;
                if let SwipeRecord::Recorded {
                    materialized: Some(m),
                    ..
                } = &record
                {
                    if m.created {
                        info!("Matched {} <-> {} as {}", actor_id, target_id, m.record.id);
                        events.publish(MatchNotification::from(&m.record));
                    }
                }
                Ok::<_, StoreError>(record)
            })
            .await
            .map_err(|err| match err {
                // Either side of the pair may be the one missing
                StoreError::MissingProfile => SwipeError::InvalidTarget("unknown profile".to_string()),
                other => SwipeError::Store(other),
            })?;

        match record {
            SwipeRecord::Duplicate { existing } => {
                debug!(
                    "Duplicate swipe {} -> {}, keeping {}",
                    actor_id, target_id, existing.decision
                );
                Err(SwipeError::AlreadySwiped {
                    previous: existing.decision,
                })
            }
            SwipeRecord::Recorded {
                swipe,
                reciprocal,
                materialized,
            } => {
                let outcome = SwipeOutcome::resolve(swipe.decision, reciprocal.map(|r| r.decision));
                info!("Swipe {} -> {}: {} ({})", actor_id, target_id, swipe.decision, outcome);

                let match_record = materialized.map(|m| m.record);

                Ok(SwipeResult {
                    swipe,
                    outcome,
                    match_record,
                })
            }
        }
    }

    /// Where the pair stands from `actor_id`'s side. `None` until `actor_id`
    /// has swiped on `target_id`, whatever the target has decided.
    pub async fn resolve(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> Result<Option<SwipeResult>, SwipeError> {
        let Some(swipe) = self.bounded(self.store.get_swipe(actor_id, target_id)).await? else {
            return Ok(None);
        };
        let reciprocal = self.bounded(self.store.get_swipe(target_id, actor_id)).await?;

        let outcome = SwipeOutcome::resolve(swipe.decision, reciprocal.map(|r| r.decision));
        let match_record = if outcome == SwipeOutcome::Match {
            Some(self.materialize(actor_id, target_id).await?)
        } else {
            None
        };

        Ok(Some(SwipeResult {
            swipe,
            outcome,
            match_record,
        }))
    }

    /// Returns the match for the unordered pair, creating it if needed.
    pub async fn materialize(&self, actor_id: Uuid, target_id: Uuid) -> Result<Match, SwipeError> {
        if actor_id == target_id {
            return Err(SwipeError::InvalidTarget("cannot match with yourself".to_string()));
        }

        let store = self.store.clone();
        let events = self.events.clone();
        let materialized = self
            .detached(async move {
                let materialized = store.materialize_match(actor_id, target_id).await?;
                if materialized.created {
                    info!("Materialized match {} <-> {} as {}", actor_id, target_id, materialized.record.id);
                    events.publish(MatchNotification::from(&materialized.record));
                }
                Ok::<_, StoreError>(materialized)
            })
            .await?;

        Ok(materialized.record)
    }

    pub async fn list_matches(&self, user_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Match>, SwipeError> {
        Ok(self.bounded(self.store.list_matches(user_id, limit, offset)).await?)
    }

    /// A match visible to `user_id`. Matches the user isn't part of read as missing.
    pub async fn get_match(&self, user_id: Uuid, match_id: Uuid) -> Result<Option<Match>, SwipeError> {
        let record = self.bounded(self.store.get_match(match_id)).await?;
        Ok(record.filter(|m| m.includes(user_id)))
    }
}
