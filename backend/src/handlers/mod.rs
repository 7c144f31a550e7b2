pub mod auth;
pub mod error;
pub mod events;
pub mod matches;
pub mod swipes;

use std::sync::Arc;

use crate::services::SwipeService;
use crate::utils::TokenVerifier;

pub use auth::AuthUser;
pub use error::ApiError;
pub use events::match_events;
pub use matches::{get_match, list_matches};
pub use swipes::{get_swipe_status, submit_swipe};

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SwipeService>,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(service: SwipeService, verifier: TokenVerifier) -> Self {
        Self {
            service: Arc::new(service),
            verifier: Arc::new(verifier),
        }
    }
}
