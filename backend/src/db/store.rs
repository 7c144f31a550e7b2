use async_trait::async_trait;
use sqlx::error::ErrorKind;
use std::time::Duration;
use uuid::Uuid;

use crate::models::{Decision, Match, SwipeDecision};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage did not respond within {0:?}")]
    Timeout(Duration),

    #[error("referenced profile does not exist")]
    MissingProfile,

    #[error("storage task aborted: {0}")]
    Aborted(String),

    #[error("corrupt storage state: {0}")]
    Corrupt(String),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    /// Whether the caller can safely resubmit the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Timeout(_))
    }
}

// Postgres codes for serialization_failure and deadlock_detected
const TRANSIENT_SQLSTATES: [&str; 2] = ["40001", "40P01"];

fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::WorkerCrashed => true,
        sqlx::Error::Database(db_err) => db_err
            .code()
            .is_some_and(|code| TRANSIENT_SQLSTATES.contains(&&*code)),
        _ => false,
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if is_transient(&err) {
            return StoreError::Unavailable(err.to_string());
        }
        if let sqlx::Error::Database(db_err) = &err {
            if matches!(db_err.kind(), ErrorKind::ForeignKeyViolation) {
                return StoreError::MissingProfile;
            }
        }
        StoreError::Database(err)
    }
}

/// A match returned by the materializer, flagged when this call created it.
#[derive(Debug, Clone)]
pub struct MaterializedMatch {
    pub record: Match,
    pub created: bool,
}

#[derive(Debug, Clone)]
pub enum SwipeRecord {
    /// The swipe was new. `reciprocal` is the other side's decision as read in
    /// the same transaction; `materialized` is set on a mutual kiss.
    Recorded {
        swipe: SwipeDecision,
        reciprocal: Option<SwipeDecision>,
        materialized: Option<MaterializedMatch>,
    },
    /// A decision for the same ordered pair already existed and was kept.
    Duplicate { existing: SwipeDecision },
}

/// Durable storage for swipes and matches.
///
/// `record_swipe` is the only write path for decisions and must be atomic per
/// pair: inserting the decision, reading the reciprocal, and materializing a
/// match happen as one unit, so two concurrent mutual kisses produce exactly
/// one match and both observe it.
#[async_trait]
pub trait SwipeStore: Send + Sync {
    /// Registers `user_id` as a known profile, or refreshes its last-seen time.
    async fn touch_profile(&self, user_id: Uuid) -> Result<(), StoreError>;

    async fn profile_exists(&self, user_id: Uuid) -> Result<bool, StoreError>;

    async fn record_swipe(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
        decision: Decision,
    ) -> Result<SwipeRecord, StoreError>;

    async fn get_swipe(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> Result<Option<SwipeDecision>, StoreError>;

    /// Inserts the match for the unordered pair, or returns the existing one.
    async fn materialize_match(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<MaterializedMatch, StoreError>;

    async fn get_match(&self, match_id: Uuid) -> Result<Option<Match>, StoreError>;

    /// Matches involving `user_id`, newest first.
    async fn list_matches(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Match>, StoreError>;
}
