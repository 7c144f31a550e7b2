use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{self, AppState};
use crate::Config;

pub fn create_router(state: AppState, config: &Config) -> Router {
    let cors_layer = create_cors_layer(config);

    Router::new()
        .route("/health", get(health_check))
        // Swipe decisions
        .route("/swipe", post(handlers::submit_swipe))
        .route("/swipe/{target_id}", get(handlers::get_swipe_status))
        // Matches
        .route("/matches", get(handlers::list_matches))
        .route("/matches/{match_id}", get(handlers::get_match))
        .route("/events", get(handlers::match_events))
        .layer(cors_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn create_cors_layer(config: &Config) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_credentials(false);

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        // Default to permissive for development
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(origins)
    }
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemorySwipeStore;
    use crate::handlers::matches::MatchesPage;
    use crate::handlers::swipes::{SwipeResponse, SwipeStatusResponse};
    use crate::models::{Decision, SwipeOutcome};
    use crate::services::{MatchEvents, SwipeService};
    use crate::utils::{create_token, TokenVerifier};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde::de::DeserializeOwned;
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;
    use uuid::Uuid;

    const SECRET: &str = "test-secret";

    fn app() -> Router {
        let config = Config::from_lookup(|key| (key == "JWT_SECRET").then(|| SECRET.to_string()))
            .unwrap();
        let service = SwipeService::new(
            Arc::new(MemorySwipeStore::new()),
            MatchEvents::new(16),
            Duration::from_secs(5),
        );
        let state = AppState::new(service, TokenVerifier::new(SECRET, None));
        create_router(state, &config)
    }

    fn bearer(user_id: Uuid) -> String {
        let token = create_token(user_id, SECRET, None, chrono::Duration::hours(1)).unwrap();
        format!("Bearer {token}")
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn get_as(app: &Router, user_id: Uuid, uri: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, bearer(user_id))
            .body(Body::empty())
            .unwrap();
        send(app, request).await
    }

    async fn swipe_as(app: &Router, user_id: Uuid, body: serde_json::Value) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method("POST")
            .uri("/swipe")
            .header(header::AUTHORIZATION, bearer(user_id))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }

    fn parse<T: DeserializeOwned>(body: &[u8]) -> T {
        serde_json::from_slice(body).unwrap()
    }

    /// Any authenticated call registers the user as a swipeable profile.
    async fn register(app: &Router, users: &[Uuid]) {
        for user in users {
            let (status, _) = get_as(app, *user, "/matches").await;
            assert_eq!(status, StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_health_needs_no_token() {
        let app = app();
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");
    }

    #[tokio::test]
    async fn test_missing_or_bad_token_is_unauthorized() {
        let app = app();

        let request = Request::builder().uri("/matches").body(Body::empty()).unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let request = Request::builder()
            .uri("/matches")
            .header(header::AUTHORIZATION, "Bearer not-a-jwt")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let error: serde_json::Value = parse(&body);
        assert_eq!(error["retryable"], false);
    }

    #[tokio::test]
    async fn test_mutual_kiss_over_http() {
        let app = app();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        register(&app, &[a, b]).await;

        let (status, body) = swipe_as(&app, a, serde_json::json!({"target_id": b, "decision": "kiss"})).await;
        assert_eq!(status, StatusCode::OK);
        let first: SwipeResponse = parse(&body);
        assert_eq!(first.decision, SwipeOutcome::Pending);
        assert!(first.match_id.is_none());

        let (status, _) = get_as(&app, b, &format!("/swipe/{a}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = swipe_as(&app, b, serde_json::json!({"target_id": a, "decision": "kiss"})).await;
        let second: SwipeResponse = parse(&body);
        assert_eq!(second.decision, SwipeOutcome::Match);
        let match_id = second.match_id.expect("match id on match");

        let (status, body) = get_as(&app, a, &format!("/swipe/{b}")).await;
        assert_eq!(status, StatusCode::OK);
        let status_a: SwipeStatusResponse = parse(&body);
        assert_eq!(status_a.swiped, Decision::Kiss);
        assert_eq!(status_a.decision, SwipeOutcome::Match);
        assert_eq!(status_a.match_id, Some(match_id));

        let (_, body) = get_as(&app, a, "/matches").await;
        let page: MatchesPage = parse(&body);
        assert_eq!(page.matches.len(), 1);
        assert_eq!(page.matches[0].match_id, match_id);
        assert_eq!(page.matches[0].counterpart_id, b);

        let (status, _) = get_as(&app, b, &format!("/matches/{match_id}")).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = get_as(&app, Uuid::new_v4(), &format!("/matches/{match_id}")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_rug_outcomes_over_http() {
        let app = app();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        register(&app, &[a, b]).await;

        swipe_as(&app, b, serde_json::json!({"target_id": a, "decision": "rug"})).await;
        let (_, body) = swipe_as(&app, a, serde_json::json!({"target_id": b, "decision": "kiss"})).await;
        let kisser: SwipeResponse = parse(&body);
        assert_eq!(kisser.decision, SwipeOutcome::Rugged);

        let (_, body) = get_as(&app, b, &format!("/swipe/{a}")).await;
        let rugger: SwipeStatusResponse = parse(&body);
        assert_eq!(rugger.decision, SwipeOutcome::Profit);
        assert!(rugger.match_id.is_none());
    }

    #[tokio::test]
    async fn test_resubmission_is_informational() {
        let app = app();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        register(&app, &[a, b]).await;

        swipe_as(&app, a, serde_json::json!({"target_id": b, "decision": "kiss"})).await;
        let (status, body) = swipe_as(&app, a, serde_json::json!({"target_id": b, "decision": "rug"})).await;

        assert_eq!(status, StatusCode::OK);
        let retry: SwipeResponse = parse(&body);
        assert_eq!(retry.previous_decision, Some(Decision::Kiss));
        assert_eq!(retry.decision, SwipeOutcome::Pending);
        assert!(retry.message.unwrap().contains("kiss"));
    }

    #[tokio::test]
    async fn test_invalid_targets_are_bad_requests() {
        let app = app();
        let a = Uuid::new_v4();
        register(&app, &[a]).await;

        let (status, _) = swipe_as(&app, a, serde_json::json!({"target_id": a, "decision": "kiss"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let stranger = Uuid::new_v4();
        let (status, _) = swipe_as(&app, a, serde_json::json!({"target_id": stranger, "decision": "kiss"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = swipe_as(&app, a, serde_json::json!({"target_id": stranger, "decision": "superlike"})).await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_event_stream_announces_new_match() {
        use futures::StreamExt;

        let app = app();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        register(&app, &[a, b]).await;

        let request = Request::builder()
            .uri("/events")
            .header(header::AUTHORIZATION, bearer(a))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let mut stream = response.into_body().into_data_stream();

        swipe_as(&app, a, serde_json::json!({"target_id": b, "decision": "kiss"})).await;
        let (_, body) = swipe_as(&app, b, serde_json::json!({"target_id": a, "decision": "kiss"})).await;
        let match_id = parse::<SwipeResponse>(&body).match_id.expect("match id on match");

        let chunk = tokio::time::timeout(Duration::from_secs(2), stream.next())
            .await
            .expect("event before timeout")
            .expect("stream still open")
            .unwrap();
        let frame = String::from_utf8(chunk.to_vec()).unwrap();
        assert!(frame.contains("event: match_created"));
        assert!(frame.contains(&match_id.to_string()));
    }

    #[tokio::test]
    async fn test_matches_pagination_is_clamped() {
        let app = app();
        let a = Uuid::new_v4();
        register(&app, &[a]).await;

        let (status, body) = get_as(&app, a, "/matches?limit=5000&offset=-3").await;
        assert_eq!(status, StatusCode::OK);
        let page: MatchesPage = parse(&body);
        assert_eq!(page.limit, crate::constants::MAX_MATCHES_PAGE_SIZE);
        assert_eq!(page.offset, 0);
        assert!(page.matches.is_empty());
    }
}
