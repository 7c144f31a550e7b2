use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Directional decision one user makes about another profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Kiss,
    Rug,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Kiss => "kiss",
            Decision::Rug => "rug",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown swipe decision: {0}")]
pub struct UnknownDecision(pub String);

impl FromStr for Decision {
    type Err = UnknownDecision;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kiss" => Ok(Decision::Kiss),
            "rug" => Ok(Decision::Rug),
            other => Err(UnknownDecision(other.to_string())),
        }
    }
}

impl TryFrom<String> for Decision {
    type Error = UnknownDecision;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Joint outcome of a pair of swipes, as seen by one side of the pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwipeOutcome {
    Pending,
    Match,
    Rugged,
    Profit,
    MutualRug,
}

impl SwipeOutcome {
    /// Maps the caller's decision and the other side's decision (if any) to
    /// the caller's outcome. Only the decision values matter, never which
    /// side arrived first.
    pub fn resolve(caller: Decision, reciprocal: Option<Decision>) -> Self {
        match (caller, reciprocal) {
            (_, None) => SwipeOutcome::Pending,
            (Decision::Kiss, Some(Decision::Kiss)) => SwipeOutcome::Match,
            (Decision::Kiss, Some(Decision::Rug)) => SwipeOutcome::Rugged,
            (Decision::Rug, Some(Decision::Kiss)) => SwipeOutcome::Profit,
            (Decision::Rug, Some(Decision::Rug)) => SwipeOutcome::MutualRug,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SwipeOutcome::Pending => "pending",
            SwipeOutcome::Match => "match",
            SwipeOutcome::Rugged => "rugged",
            SwipeOutcome::Profit => "profit",
            SwipeOutcome::MutualRug => "mutual_rug",
        }
    }
}

impl fmt::Display for SwipeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SwipeDecision {
    pub actor_id: Uuid,
    pub target_id: Uuid,
    #[sqlx(try_from = "String")]
    pub decision: Decision,
    pub created_at: DateTime<Utc>,
}
