use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::db::store::{MaterializedMatch, StoreError, SwipeRecord, SwipeStore};
use crate::models::{canonical_pair, Decision, Match, Profile, SwipeDecision, SwipeOutcome};

#[derive(Debug, Default)]
struct Tables {
    profiles: HashMap<Uuid, Profile>,
    swipes: HashMap<(Uuid, Uuid), SwipeDecision>,
    matches: HashMap<(Uuid, Uuid), Match>,
}

impl Tables {
    fn materialize(&mut self, user_a: Uuid, user_b: Uuid) -> MaterializedMatch {
        let key = canonical_pair(user_a, user_b);
        if let Some(existing) = self.matches.get(&key) {
            return MaterializedMatch {
                record: existing.clone(),
                created: false,
            };
        }

        let record = Match {
            id: Uuid::new_v4(),
            user_low: key.0,
            user_high: key.1,
            created_at: Utc::now(),
        };
        self.matches.insert(key, record.clone());
        MaterializedMatch { record, created: true }
    }
}

/// Process-local store for development and tests. One lock guards every table,
/// which makes each operation trivially atomic. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemorySwipeStore {
    tables: Mutex<Tables>,
}

impl MemorySwipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn swipe_count(&self) -> usize {
        self.tables.lock().await.swipes.len()
    }

    pub async fn match_count(&self) -> usize {
        self.tables.lock().await.matches.len()
    }
}

#[async_trait]
impl SwipeStore for MemorySwipeStore {
    async fn touch_profile(&self, user_id: Uuid) -> Result<(), StoreError> {
        let now = Utc::now();
        let mut tables = self.tables.lock().await;
        tables
            .profiles
            .entry(user_id)
            .and_modify(|profile| profile.last_seen_at = now)
            .or_insert(Profile {
                id: user_id,
                created_at: now,
                last_seen_at: now,
            });
        Ok(())
    }

    async fn profile_exists(&self, user_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.tables.lock().await.profiles.contains_key(&user_id))
    }

    async fn record_swipe(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
        decision: Decision,
    ) -> Result<SwipeRecord, StoreError> {
        let mut tables = self.tables.lock().await;

        if !tables.profiles.contains_key(&actor_id) || !tables.profiles.contains_key(&target_id) {
            return Err(StoreError::MissingProfile);
        }

        if let Some(existing) = tables.swipes.get(&(actor_id, target_id)) {
            return Ok(SwipeRecord::Duplicate {
                existing: existing.clone(),
            });
        }

        let swipe = SwipeDecision {
            actor_id,
            target_id,
            decision,
            created_at: Utc::now(),
        };
        tables.swipes.insert((actor_id, target_id), swipe.clone());

        let reciprocal = tables.swipes.get(&(target_id, actor_id)).cloned();
        let outcome = SwipeOutcome::resolve(decision, reciprocal.as_ref().map(|r| r.decision));
        let materialized = (outcome == SwipeOutcome::Match)
            .then(|| tables.materialize(actor_id, target_id));

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
        Ok(self.tables.lock().await.swipes.get(&(actor_id, target_id)).cloned())
    }

    async fn materialize_match(
        &self,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<MaterializedMatch, StoreError> {
        let mut tables = self.tables.lock().await;
        if !tables.profiles.contains_key(&user_a) || !tables.profiles.contains_key(&user_b) {
            return Err(StoreError::MissingProfile);
        }
        Ok(tables.materialize(user_a, user_b))
    }

    async fn get_match(&self, match_id: Uuid) -> Result<Option<Match>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.matches.values().find(|m| m.id == match_id).cloned())
    }

    async fn list_matches(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Match>, StoreError> {
        let tables = self.tables.lock().await;
        let mut records: Vec<Match> = tables
            .matches
            .values()
            .filter(|m| m.includes(user_id))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let offset = usize::try_from(offset).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(records.into_iter().skip(offset).take(limit).collect())
    }
}
