pub mod events;
pub mod swipes;

pub use events::{MatchEvents, MatchNotification};
pub use swipes::{SwipeError, SwipeResult, SwipeService};
