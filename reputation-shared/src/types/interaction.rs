use crate::types::{ParseKindError, Target, UserId, VoteKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The notable actions kept in the interaction log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionVerb {
    View,
    Upvote,
    Downvote,
    Bookmark,
    Unbookmark,
    Post,
    Edit,
    Delete,
    Search,
}

impl InteractionVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionVerb::View => "view",
            InteractionVerb::Upvote => "upvote",
            InteractionVerb::Downvote => "downvote",
            InteractionVerb::Bookmark => "bookmark",
            InteractionVerb::Unbookmark => "unbookmark",
            InteractionVerb::Post => "post",
            InteractionVerb::Edit => "edit",
            InteractionVerb::Delete => "delete",
            InteractionVerb::Search => "search",
        }
    }
}

impl From<VoteKind> for InteractionVerb {
    fn from(kind: VoteKind) -> Self {
        match kind {
            VoteKind::Up => InteractionVerb::Upvote,
            VoteKind::Down => InteractionVerb::Downvote,
        }
    }
}

impl fmt::Display for InteractionVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionVerb {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let verb = match s {
            "view" => InteractionVerb::View,
            "upvote" => InteractionVerb::Upvote,
            "downvote" => InteractionVerb::Downvote,
            "bookmark" => InteractionVerb::Bookmark,
            "unbookmark" => InteractionVerb::Unbookmark,
            "post" => InteractionVerb::Post,
            "edit" => InteractionVerb::Edit,
            "delete" => InteractionVerb::Delete,
            "search" => InteractionVerb::Search,
            other => {
                return Err(ParseKindError {
                    expected: "interaction verb",
                    value: other.to_string(),
                });
            }
        };
        Ok(verb)
    }
}

/// An append-only entry of the interaction log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub actor: UserId,
    pub verb: InteractionVerb,
    pub target: Target,
    pub created_at: DateTime<Utc>,
}

impl InteractionRecord {
    pub fn new(actor: UserId, verb: InteractionVerb, target: Target) -> Self {
        Self {
            actor,
            verb,
            target,
            created_at: Utc::now(),
        }
    }
}
