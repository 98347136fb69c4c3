use crate::paths;
use crate::types::{ContentId, Target, TargetKind, UserId, VoteKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A question or answer together with its cached vote counters.
///
/// `upvotes` and `downvotes` are a cache of the vote ledger, maintained
/// incrementally by the engine. For a question `question_id` is its own id,
/// for an answer it is the parent question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotableContent {
    pub target: Target,
    pub author: UserId,
    pub question_id: ContentId,
    pub upvotes: i64,
    pub downvotes: i64,
    pub answers: i64,
    pub created_at: DateTime<Utc>,
}

impl VotableContent {
    pub fn new_question(author: UserId) -> Self {
        let id = ContentId::new_v4();
        Self {
            target: Target::question(id),
            author,
            question_id: id,
            upvotes: 0,
            downvotes: 0,
            answers: 0,
            created_at: Utc::now(),
        }
    }

    pub fn new_answer(author: UserId, question_id: ContentId) -> Self {
        Self {
            target: Target::answer(ContentId::new_v4()),
            author,
            question_id,
            upvotes: 0,
            downvotes: 0,
            answers: 0,
            created_at: Utc::now(),
        }
    }

    pub fn count(&self, kind: VoteKind) -> i64 {
        match kind {
            VoteKind::Up => self.upvotes,
            VoteKind::Down => self.downvotes,
        }
    }

    pub fn is_question(&self) -> bool {
        self.target.kind == TargetKind::Question
    }

    /// Page that renders this content.
    pub fn canonical_path(&self) -> String {
        paths::question(self.question_id)
    }
}

/// What a content deletion removed alongside the content itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentRemoval {
    pub votes: u64,
    pub answers: u64,
    pub bookmarks: u64,
}

/// A target whose cached counters disagree with a recount of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterDrift {
    pub target: Target,
    pub cached_upvotes: i64,
    pub cached_downvotes: i64,
    pub ledger_upvotes: i64,
    pub ledger_downvotes: i64,
}
