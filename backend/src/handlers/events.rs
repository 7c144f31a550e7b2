use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::constants::MATCH_CREATED_EVENT;
use crate::handlers::{AppState, AuthUser};

/// Server-sent events announcing the caller's new matches.
pub async fn match_events(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Opening match event stream for {}", user_id);
    let receiver = state.service.events().subscribe();

    let events = stream::unfold(receiver, move |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(notification) if notification.involves(user_id) => {
                    match Event::default().event(MATCH_CREATED_EVENT).json_data(&notification) {
                        Ok(event) => return Some((Ok::<_, Infallible>(event), receiver)),
                        Err(e) => warn!("Failed to encode match notification: {}", e),
                    }
                }
                Ok(_) => continue,
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Match event stream for {} skipped {} notifications", user_id, skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
