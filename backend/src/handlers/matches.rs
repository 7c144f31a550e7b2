use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::constants::page_bounds;
use crate::handlers::{ApiError, AppState, AuthUser};
use crate::models::Match;

#[derive(Debug, Deserialize)]
pub struct MatchesQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchResponse {
    pub match_id: Uuid,
    pub participant_ids: [Uuid; 2],
    /// The participant who isn't the caller.
    pub counterpart_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl MatchResponse {
    fn for_user(record: &Match, user_id: Uuid) -> Self {
        Self {
            match_id: record.id,
            participant_ids: record.participants(),
            counterpart_id: record.counterpart(user_id),
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchesPage {
    pub matches: Vec<MatchResponse>,
    pub limit: i64,
    pub offset: i64,
}

/// The caller's matches, newest first.
pub async fn list_matches(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<MatchesQuery>,
) -> Result<Json<MatchesPage>, ApiError> {
    let (limit, offset) = page_bounds(query.limit, query.offset);
    debug!("Listing matches for {}, limit: {}, offset: {}", user_id, limit, offset);

    let records = state.service.list_matches(user_id, limit, offset).await?;

    Ok(Json(MatchesPage {
        matches: records
            .iter()
            .map(|record| MatchResponse::for_user(record, user_id))
            .collect(),
        limit,
        offset,
    }))
}

pub async fn get_match(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(match_id): Path<Uuid>,
) -> Result<Json<MatchResponse>, ApiError> {
    let record = state
        .service
        .get_match(user_id, match_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Match not found".to_string()))?;

    Ok(Json(MatchResponse::for_user(&record, user_id)))
}
