//! Fixed reputation point schedule.
//!
//! Every reputation-bearing action maps to a `PointDelta` with a performer
//! side and an author side. Reversals are expressed by negating the delta of
//! the original action, never by a separate schedule row.
use crate::types::{TargetKind, UserId, VoteKind};
use std::ops::{Neg, Sub};

/// Actions that move reputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReputationEvent {
    VoteCast(VoteKind),
    Post(TargetKind),
    Delete(TargetKind),
    Bookmark,
    Unbookmark,
}

impl ReputationEvent {
    pub const fn points(self) -> PointDelta {
        match self {
            ReputationEvent::VoteCast(VoteKind::Up) => PointDelta::new(2, 10),
            ReputationEvent::VoteCast(VoteKind::Down) => PointDelta::new(-1, -2),
            ReputationEvent::Post(TargetKind::Question) => PointDelta::new(2, 5),
            ReputationEvent::Post(TargetKind::Answer) => PointDelta::new(5, 10),
            ReputationEvent::Delete(TargetKind::Question) => PointDelta::new(-2, -5),
            ReputationEvent::Delete(TargetKind::Answer) => PointDelta::new(-5, -10),
            ReputationEvent::Bookmark => PointDelta::new(1, 2),
            ReputationEvent::Unbookmark => PointDelta::new(-1, -2),
        }
    }
}

/// Points for the user performing an action and for the author of its target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointDelta {
    pub performer: i64,
    pub author: i64,
}

impl PointDelta {
    pub const ZERO: PointDelta = PointDelta::new(0, 0);

    pub const fn new(performer: i64, author: i64) -> Self {
        Self { performer, author }
    }

    /// Resolves the delta into per-account increments.
    ///
    /// When performer and author are the same account only the performer side
    /// is applied, once. Zero increments are dropped and the result is ordered
    /// by user id so concurrent units lock user rows in the same order.
    pub fn attribute(self, performer: UserId, author: UserId) -> Vec<ReputationDelta> {
        let mut deltas = if performer == author {
            vec![ReputationDelta::new(performer, self.performer)]
        } else {
            vec![
                ReputationDelta::new(performer, self.performer),
                ReputationDelta::new(author, self.author),
            ]
        };
        deltas.retain(|d| d.points != 0);
        deltas.sort_by_key(|d| d.user);
        deltas
    }
}

impl Neg for PointDelta {
    type Output = PointDelta;

    fn neg(self) -> Self::Output {
        PointDelta::new(-self.performer, -self.author)
    }
}

impl Sub for PointDelta {
    type Output = PointDelta;

    fn sub(self, rhs: PointDelta) -> Self::Output {
        PointDelta::new(self.performer - rhs.performer, self.author - rhs.author)
    }
}

/// A single increment of one user's reputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReputationDelta {
    pub user: UserId,
    pub points: i64,
}

impl ReputationDelta {
    pub fn new(user: UserId, points: i64) -> Self {
        Self { user, points }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::uuid;

    fn alice() -> UserId {
        UserId(uuid!("00000000-0000-0000-0000-00000000000a"))
    }

    fn bob() -> UserId {
        UserId(uuid!("00000000-0000-0000-0000-00000000000b"))
    }

    #[test]
    fn test_point_schedule() {
        let table = [
            (ReputationEvent::VoteCast(VoteKind::Up), 2, 10),
            (ReputationEvent::VoteCast(VoteKind::Down), -1, -2),
            (ReputationEvent::Post(TargetKind::Question), 2, 5),
            (ReputationEvent::Post(TargetKind::Answer), 5, 10),
            (ReputationEvent::Delete(TargetKind::Question), -2, -5),
            (ReputationEvent::Delete(TargetKind::Answer), -5, -10),
            (ReputationEvent::Bookmark, 1, 2),
            (ReputationEvent::Unbookmark, -1, -2),
        ];
        for (event, performer, author) in table {
            assert_eq!(event.points(), PointDelta::new(performer, author), "{event:?}");
        }
    }

    #[test]
    fn test_post_and_delete_cancel_out() {
        for kind in [TargetKind::Question, TargetKind::Answer] {
            let net = ReputationEvent::Post(kind).points() - -ReputationEvent::Delete(kind).points();
            assert_eq!(net, PointDelta::ZERO);
        }
    }

    #[test]
    fn test_attribute_to_distinct_accounts() {
        let deltas = PointDelta::new(2, 10).attribute(bob(), alice());
        assert_eq!(
            deltas,
            vec![ReputationDelta::new(alice(), 10), ReputationDelta::new(bob(), 2)]
        );
    }

    #[test]
    fn test_attribute_self_applies_performer_side_once() {
        let deltas = PointDelta::new(2, 10).attribute(alice(), alice());
        assert_eq!(deltas, vec![ReputationDelta::new(alice(), 2)]);
    }

    #[test]
    fn test_attribute_drops_zero_increments() {
        let deltas = PointDelta::new(0, -12).attribute(alice(), bob());
        assert_eq!(deltas, vec![ReputationDelta::new(bob(), -12)]);
        assert!(PointDelta::ZERO.attribute(alice(), bob()).is_empty());
    }
}
