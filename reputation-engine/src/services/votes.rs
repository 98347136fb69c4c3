use super::{EngineContext, apply_points};
use crate::errors::EngineError;
use crate::transition::VoteTransition;
use futures::FutureExt;
use reputation_repository::UnitOfWork;
use reputation_shared::types::{Target, UserId, Vote, VoteKind, VoteStatus};
use tracing::info;

/// Result of a committed vote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteOutcome {
    pub transition: VoteTransition,
    /// The caller's vote after the request.
    pub status: VoteStatus,
    /// Counters of the target after the request.
    pub upvotes: i64,
    pub downvotes: i64,
}

/// Toggles votes and keeps counters and reputation in step with the ledger.
pub struct VoteService {
    context: EngineContext,
}

impl VoteService {
    pub fn new(context: EngineContext) -> Self {
        Self { context }
    }

    /// Casts `kind` on `target` for `voter`.
    ///
    /// With no vote on record a vote is created, repeating the recorded kind
    /// retracts it, and the other kind switches it in place. The ledger row,
    /// the target's counters and both reputations move in one unit of work.
    ///
    /// # Arguments
    ///
    /// * `voter` - The authenticated caller
    /// * `target` - The question or answer voted on
    /// * `kind` - The requested vote kind
    ///
    /// # Returns
    ///
    /// * `Ok(VoteOutcome)` - The applied transition and the resulting counters
    /// * `Err(EngineError::NotFound)` - The target does not exist
    pub async fn cast_vote(
        &self,
        voter: UserId,
        target: Target,
        kind: VoteKind,
    ) -> Result<VoteOutcome, EngineError> {
        let (outcome, path) = self
            .context
            .coordinator
            .run_atomic("cast_vote", move |uow| apply_vote(uow, voter, target, kind).boxed())
            .await?;

        info!(
            voter = %voter,
            content = %target,
            transition = ?outcome.transition,
            upvotes = outcome.upvotes,
            downvotes = outcome.downvotes,
            "Vote cast"
        );

        if let Some(verb) = outcome.transition.interaction_verb() {
            self.context.recorder.record(voter, verb, target);
        }
        self.context.revalidator.revalidate(&path);
        Ok(outcome)
    }

    /// Reports the vote `voter` currently has on `target`.
    pub async fn get_vote(
        &self,
        voter: UserId,
        target: Target,
    ) -> Result<VoteStatus, EngineError> {
        let vote = self.context.store.find_vote(voter, target).await?;
        Ok(vote.map(|v| v.kind).into())
    }
}

async fn apply_vote(
    uow: &mut dyn UnitOfWork,
    voter: UserId,
    target: Target,
    kind: VoteKind,
) -> Result<(VoteOutcome, String), EngineError> {
    let content = uow
        .find_content(target)
        .await?
        .ok_or_else(|| EngineError::not_found(target.kind.label()))?;
    let existing = uow.find_vote(voter, target).await?;
    let transition = VoteTransition::plan(existing.map(|vote| vote.kind), kind);

    match transition {
        VoteTransition::Create(kind) => uow.insert_vote(&Vote::new(voter, target, kind)).await?,
        VoteTransition::Retract(_) => uow.delete_vote(voter, target).await?,
        VoteTransition::Switch { to, .. } => uow.update_vote_kind(voter, target, to).await?,
    }

    let (mut upvotes, mut downvotes) = (content.upvotes, content.downvotes);
    for (counter, delta) in transition.counter_deltas() {
        let value = uow.adjust_counter(target, counter, delta).await?;
        match counter {
            VoteKind::Up => upvotes = value,
            VoteKind::Down => downvotes = value,
        }
    }

    apply_points(uow, transition.points(), voter, content.author).await?;

    let outcome = VoteOutcome {
        transition,
        status: transition.resulting_kind().into(),
        upvotes,
        downvotes,
    };
    Ok((outcome, content.canonical_path()))
}
