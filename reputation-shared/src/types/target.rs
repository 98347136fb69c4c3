use crate::types::ContentId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The two kinds of content that can receive votes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Question,
    Answer,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Question => "question",
            TargetKind::Answer => "answer",
        }
    }

    /// Human readable label used in error messages ("Question not found").
    pub fn label(&self) -> &'static str {
        match self {
            TargetKind::Question => "Question",
            TargetKind::Answer => "Answer",
        }
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a wire string does not name a known kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {expected}: {value}")]
pub struct ParseKindError {
    pub expected: &'static str,
    pub value: String,
}

impl FromStr for TargetKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "question" => Ok(TargetKind::Question),
            "answer" => Ok(TargetKind::Answer),
            other => Err(ParseKindError {
                expected: "target kind",
                value: other.to_string(),
            }),
        }
    }
}

/// A question or an answer, resolved once at the boundary.
///
/// Everything below the boundary addresses content through this tagged value
/// instead of branching on loose strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Target {
    pub id: ContentId,
    pub kind: TargetKind,
}

impl Target {
    pub fn new(id: ContentId, kind: TargetKind) -> Self {
        Self { id, kind }
    }

    pub fn question(id: ContentId) -> Self {
        Self::new(id, TargetKind::Question)
    }

    pub fn answer(id: ContentId) -> Self {
        Self::new(id, TargetKind::Answer)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.id)
    }
}
