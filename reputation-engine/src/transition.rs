//! Vote transition planning.
//!
//! A transition is decided from the caller's current vote on a target and the
//! requested kind alone. Applying it is left to the vote service, inside a
//! unit of work.
use reputation_shared::types::{InteractionVerb, PointDelta, ReputationEvent, VoteKind};

/// The ledger mutation implied by a vote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteTransition {
    /// No vote on record; a new one of the given kind is created.
    Create(VoteKind),
    /// The same kind is on record; the vote is deleted.
    Retract(VoteKind),
    /// The other kind is on record; the vote flips in place.
    Switch { from: VoteKind, to: VoteKind },
}

impl VoteTransition {
    /// Decides the transition for `requested` given the vote on record.
    pub fn plan(existing: Option<VoteKind>, requested: VoteKind) -> Self {
        match existing {
            None => VoteTransition::Create(requested),
            Some(current) if current == requested => VoteTransition::Retract(current),
            Some(current) => VoteTransition::Switch {
                from: current,
                to: requested,
            },
        }
    }

    /// Counter increments to apply on the target, one per affected counter.
    pub fn counter_deltas(&self) -> Vec<(VoteKind, i64)> {
        match *self {
            VoteTransition::Create(kind) => vec![(kind, 1)],
            VoteTransition::Retract(kind) => vec![(kind, -1)],
            VoteTransition::Switch { from, to } => vec![(from, -1), (to, 1)],
        }
    }

    /// Reputation points moved by the transition.
    ///
    /// A retraction is the exact inverse of the creation, a switch is the
    /// difference between the new and the old creation deltas.
    pub fn points(&self) -> PointDelta {
        match *self {
            VoteTransition::Create(kind) => ReputationEvent::VoteCast(kind).points(),
            VoteTransition::Retract(kind) => -ReputationEvent::VoteCast(kind).points(),
            VoteTransition::Switch { from, to } => {
                ReputationEvent::VoteCast(to).points() - ReputationEvent::VoteCast(from).points()
            }
        }
    }

    /// Interaction to record after commit. Retractions are not recorded.
    pub fn interaction_verb(&self) -> Option<InteractionVerb> {
        match *self {
            VoteTransition::Create(kind) => Some(kind.into()),
            VoteTransition::Retract(_) => None,
            VoteTransition::Switch { to, .. } => Some(to.into()),
        }
    }

    /// The caller's vote once the transition is applied.
    pub fn resulting_kind(&self) -> Option<VoteKind> {
        match *self {
            VoteTransition::Create(kind) => Some(kind),
            VoteTransition::Retract(_) => None,
            VoteTransition::Switch { to, .. } => Some(to),
        }
    }
}
