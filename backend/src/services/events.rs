use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use crate::models::Match;

/// Emitted once per newly created match; both participants receive it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchNotification {
    pub match_id: Uuid,
    pub participant_ids: [Uuid; 2],
    pub created_at: DateTime<Utc>,
}

impl MatchNotification {
    pub fn involves(&self, user_id: Uuid) -> bool {
        self.participant_ids.contains(&user_id)
    }
}

impl From<&Match> for MatchNotification {
    fn from(record: &Match) -> Self {
        Self {
            match_id: record.id,
            participant_ids: record.participants(),
            created_at: record.created_at,
        }
    }
}

/// In-process fan-out of match notifications to connected event streams.
#[derive(Debug, Clone)]
pub struct MatchEvents {
    sender: broadcast::Sender<MatchNotification>,
}

impl MatchEvents {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn publish(&self, notification: MatchNotification) {
        // Err only means nobody is listening right now
        if let Err(err) = self.sender.send(notification) {
            debug!("No subscribers for match {}", err.0.match_id);
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<MatchNotification> {
        self.sender.subscribe()
    }
}
