use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::db::store::{MaterializedMatch, StoreError, SwipeRecord, SwipeStore};
use crate::db::{matches, profiles, swipes};
use crate::models::{canonical_pair, Decision, Match, SwipeDecision, SwipeOutcome};

/// Postgres-backed store. Uniqueness lives in the schema; the per-pair advisory
/// lock serializes the read-then-write inside `record_swipe`.
#[derive(Debug, Clone)]
pub struct PgSwipeStore {
    pool: PgPool,
}

impl PgSwipeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Insert-or-read of the pair's match on an open connection. A lost insert
/// race resolves to the winner's row.
async fn materialize_on(
    conn: &mut PgConnection,
    user_a: Uuid,
    user_b: Uuid,
) -> Result<MaterializedMatch, StoreError> {
    let (low, high) = canonical_pair(user_a, user_b);

    if let Some(record) = matches::insert_match(&mut *conn, low, high).await? {
        return Ok(MaterializedMatch { record, created: true });
    }

    debug!("Match for {} <-> {} already exists, reading it back", low, high);
    let record = matches::get_match_by_pair(&mut *conn, low, high)
        .await?
        .ok_or_else(|| StoreError::Corrupt(format!("match for {low}:{high} conflicted but is missing")))?;

    Ok(MaterializedMatch { record, created: false })
}

#[async_trait]
impl SwipeStore for PgSwipeStore {
    async fn touch_profile(&self, user_id: Uuid) -> Result<(), StoreError> {
        profiles::upsert_profile(&self.pool, user_id).await?;
        Ok(())
    }

    async fn profile_exists(&self, user_id: Uuid) -> Result<bool, StoreError> {
        Ok(profiles::profile_exists(&self.pool, user_id).await?)
    }

    async fn record_swipe(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
        decision: Decision,
    ) -> Result<SwipeRecord, StoreError> {
        let mut tx = self.pool.begin().await?;

        swipes::lock_pair(&mut tx, actor_id, target_id).await?;

        let Some(swipe) = swipes::insert_swipe(&mut tx, actor_id, target_id, decision).await? else {
            let existing = swipes::get_swipe(&mut *tx, actor_id, target_id)
                .await?
                .ok_or_else(|| StoreError::Corrupt(format!("swipe {actor_id} -> {target_id} conflicted but is missing")))?;
            tx.rollback().await?;
            return Ok(SwipeRecord::Duplicate { existing });
        };

        let reciprocal = swipes::get_swipe(&mut *tx, target_id, actor_id).await?;

        let outcome = SwipeOutcome::resolve(decision, reciprocal.as_ref().map(|r| r.decision));
        let materialized = if outcome == SwipeOutcome::Match {
            Some(materialize_on(&mut tx, actor_id, target_id).await?)
        } else {
            None
        };

        tx.commit().await?;

        Ok(SwipeRecord::Recorded {
            swipe,
            reciprocal,
            materialized,
        })
    }

    async fn get_swipe(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> Result<Option<SwipeDecision>, StoreError> {
        Ok(swipes::get_swipe(&self.pool, actor_id, target_id).await?)
    }

    async fn materialize_match(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<MaterializedMatch, StoreError> {
        let mut conn = self.pool.acquire().await?;
        materialize_on(&mut conn, user_a, user_b).await
    }

    async fn get_match(&self, match_id: Uuid) -> Result<Option<Match>, StoreError> {
        Ok(matches::get_match_by_id(&self.pool, match_id).await?)
    }

    async fn list_matches(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Match>, StoreError> {
        Ok(matches::list_matches_for_user(&self.pool, user_id, limit, offset).await?)
    }
}
