use crate::types::{ParseKindError, Target, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Represents the type of vote cast by a user.
///
/// There is no "remove" value: retracting a vote is expressed by casting the
/// same kind again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VoteKind {
    /// Indicates an upvote or positive endorsement.
    #[serde(rename = "upvote")]
    Up,
    /// Indicates a downvote or negative endorsement.
    #[serde(rename = "downvote")]
    Down,
}

impl VoteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VoteKind::Up => "upvote",
            VoteKind::Down => "downvote",
        }
    }
}

impl fmt::Display for VoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upvote" => Ok(VoteKind::Up),
            "downvote" => Ok(VoteKind::Down),
            other => Err(ParseKindError {
                expected: "vote type",
                value: other.to_string(),
            }),
        }
    }
}

/// A user's vote on a question or answer.
///
/// At most one `Vote` exists per (voter, target) pair. It is owned by the
/// voter and references the target; it is never embedded in the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub voter: UserId,
    pub target: Target,
    pub kind: VoteKind,
    pub created_at: DateTime<Utc>,
}

impl Vote {
    pub fn new(voter: UserId, target: Target, kind: VoteKind) -> Self {
        Self {
            voter,
            target,
            kind,
            created_at: Utc::now(),
        }
    }
}

/// What the caller currently has on record for a target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteStatus {
    pub upvoted: bool,
    pub downvoted: bool,
}

impl From<Option<VoteKind>> for VoteStatus {
    fn from(kind: Option<VoteKind>) -> Self {
        Self {
            upvoted: kind == Some(VoteKind::Up),
            downvoted: kind == Some(VoteKind::Down),
        }
    }
}
