pub mod matches;
pub mod profiles;
pub mod swipes;

pub use matches::{canonical_pair, Match};
pub use profiles::Profile;
pub use swipes::{Decision, SwipeDecision, SwipeOutcome, UnknownDecision};
