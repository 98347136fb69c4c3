//! Canonical page paths handed to the revalidation hook after a commit.
use crate::types::{ContentId, UserId};

/// Page of a question, which also renders all of its answers.
pub fn question(id: ContentId) -> String {
    format!("/questions/{id}")
}

pub fn profile(user: UserId) -> String {
    format!("/profile/{user}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::uuid;

    #[test]
    fn test_question_path() {
        let id = ContentId(uuid!("a7ef0016-a2f4-44fb-82ca-a4f5c61d2cf5"));
        assert_eq!(question(id), "/questions/a7ef0016-a2f4-44fb-82ca-a4f5c61d2cf5");
    }

    #[test]
    fn test_profile_path() {
        let user = UserId(uuid!("e50fe85c-108a-4d4a-97b9-376a1e5d318b"));
        assert_eq!(profile(user), "/profile/e50fe85c-108a-4d4a-97b9-376a1e5d318b");
    }
}
