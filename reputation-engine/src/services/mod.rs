//! Reputation-bearing operations.
//!
//! Each service method runs its reads and writes through the
//! [`TransactionCoordinator`], then enqueues its interaction record and
//! revalidates the affected pages once the unit has committed.
mod bookmarks;
mod content;
mod votes;

pub use bookmarks::{BookmarkOutcome, BookmarkService};
pub use content::ContentService;
pub use votes::{VoteOutcome, VoteService};

use crate::config::EngineConfig;
use crate::coordinator::TransactionCoordinator;
use crate::errors::EngineError;
use crate::hooks::RevalidateHook;
use crate::recorder::{InteractionRecorder, InteractionWorker};
use reputation_repository::{InteractionRepository, ReputationStore, UnitOfWork};
use reputation_shared::types::{PointDelta, UserId};
use std::sync::Arc;

/// Collaborators shared by every service.
#[derive(Clone)]
pub struct EngineContext {
    pub coordinator: Arc<TransactionCoordinator>,
    pub store: Arc<dyn ReputationStore>,
    pub recorder: InteractionRecorder,
    pub revalidator: Arc<dyn RevalidateHook>,
}

impl EngineContext {
    /// Wires a context around a store and an interaction log.
    ///
    /// # Arguments
    ///
    /// * `store` - Transactional store for votes, counters and reputation
    /// * `interactions` - Append-only interaction log
    /// * `revalidator` - Page invalidation hook called after commits
    /// * `config` - Engine limits
    ///
    /// # Returns
    ///
    /// The context and the interaction worker, which the caller must spawn.
    pub fn new(
        store: Arc<dyn ReputationStore>,
        interactions: Arc<dyn InteractionRepository>,
        revalidator: Arc<dyn RevalidateHook>,
        config: &EngineConfig,
    ) -> (Self, InteractionWorker) {
        let coordinator = Arc::new(TransactionCoordinator::new(store.clone(), config));
        let (recorder, worker) = InteractionRecorder::channel(interactions, config);
        let context = Self {
            coordinator,
            store,
            recorder,
            revalidator,
        };
        (context, worker)
    }
}

/// Applies `points` to the performer and the author of an action.
///
/// When both are the same account only the performer side is applied.
pub(crate) async fn apply_points(
    uow: &mut dyn UnitOfWork,
    points: PointDelta,
    performer: UserId,
    author: UserId,
) -> Result<(), EngineError> {
    for delta in points.attribute(performer, author) {
        uow.apply_reputation(delta.user, delta.points).await?;
    }
    Ok(())
}
