use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::handlers::{ApiError, AppState, AuthUser};
use crate::models::{Decision, SwipeOutcome};
use crate::services::{SwipeError, SwipeResult};

#[derive(Debug, Deserialize)]
pub struct SwipeRequest {
    pub target_id: Uuid,
    pub decision: Decision,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SwipeResponse {
    /// Outcome tag from the caller's perspective.
    pub decision: SwipeOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_decision: Option<Decision>,
}

impl From<SwipeResult> for SwipeResponse {
    fn from(result: SwipeResult) -> Self {
        Self {
            decision: result.outcome,
            match_id: result.match_record.map(|m| m.id),
            message: None,
            previous_decision: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SwipeStatusResponse {
    pub target_id: Uuid,
    /// What the caller decided about the target.
    pub swiped: Decision,
    pub decision: SwipeOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_id: Option<Uuid>,
}

/// Record a kiss or rug against another profile.
///
/// A repeated swipe is informational: it answers 200 with the stored decision
/// and the pair's current outcome instead of failing, so clients can retry a
/// timed-out submission safely.
pub async fn submit_swipe(
    State(state): State<AppState>,
    AuthUser(actor_id): AuthUser,
    Json(req): Json<SwipeRequest>,
) -> Result<Json<SwipeResponse>, ApiError> {
    match state.service.record_swipe(actor_id, req.target_id, req.decision).await {
        Ok(result) => Ok(Json(result.into())),
        Err(SwipeError::AlreadySwiped { previous }) => {
            info!("User {} already swiped {} on {}", actor_id, previous, req.target_id);

            let current = state.service.resolve(actor_id, req.target_id).await?;
            let (decision, match_id) = match current {
                Some(result) => (result.outcome, result.match_record.map(|m| m.id)),
                None => (SwipeOutcome::Pending, None),
            };

            Ok(Json(SwipeResponse {
                decision,
                match_id,
                message: Some(format!("Already swiped {} on this profile", previous)),
                previous_decision: Some(previous),
            }))
        }
        Err(err) => Err(err.into()),
    }
}

/// Where the caller stands with `target_id`. 404 until the caller has swiped,
/// even if the target already decided.
pub async fn get_swipe_status(
    State(state): State<AppState>,
    AuthUser(actor_id): AuthUser,
    Path(target_id): Path<Uuid>,
) -> Result<Json<SwipeStatusResponse>, ApiError> {
    let result = state
        .service
        .resolve(actor_id, target_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No swipe on this profile yet".to_string()))?;

    Ok(Json(SwipeStatusResponse {
        target_id,
        swiped: result.swipe.decision,
        decision: result.outcome,
        match_id: result.match_record.map(|m| m.id),
    }))
}
