use crate::types::{ContentId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A question saved to a user's collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub user: UserId,
    pub question_id: ContentId,
    pub created_at: DateTime<Utc>,
}

impl Bookmark {
    pub fn new(user: UserId, question_id: ContentId) -> Self {
        Self {
            user,
            question_id,
            created_at: Utc::now(),
        }
    }
}
