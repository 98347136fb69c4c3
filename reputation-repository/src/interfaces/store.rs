//! This module defines the `ReputationStore` and `UnitOfWork` traits, which
//! abstract the transactional data store behind votes, counters, reputation,
//! bookmarks and content.
use crate::errors::RepositoryError;
use reputation_shared::types::{
    Bookmark, ContentId, ContentRemoval, CounterDrift, Target, UserId, VotableContent, Vote,
    VoteKind,
};

/// An open atomic unit of work.
///
/// Every read and write issued through a unit is either committed together by
/// [`UnitOfWork::commit`] or discarded together by [`UnitOfWork::rollback`].
/// Dropping a unit without committing discards its writes.
#[async_trait::async_trait]
pub trait UnitOfWork: Send {
    /// Looks up a question or answer, including its current counters.
    async fn find_content(
        &mut self,
        target: Target,
    ) -> Result<Option<VotableContent>, RepositoryError>;

    /// Looks up the vote of `voter` on `target`.
    ///
    /// The row is locked until the unit ends, so concurrent units on the same
    /// (voter, target) pair observe each other's committed state.
    async fn find_vote(
        &mut self,
        voter: UserId,
        target: Target,
    ) -> Result<Option<Vote>, RepositoryError>;

    /// Inserts a vote. Fails with a transient conflict if another unit won the
    /// race for the same (voter, target) pair.
    async fn insert_vote(&mut self, vote: &Vote) -> Result<(), RepositoryError>;

    async fn update_vote_kind(
        &mut self,
        voter: UserId,
        target: Target,
        kind: VoteKind,
    ) -> Result<(), RepositoryError>;

    async fn delete_vote(&mut self, voter: UserId, target: Target) -> Result<(), RepositoryError>;

    /// Atomically adds `delta` to the `kind` counter of `target`.
    ///
    /// # Returns
    ///
    /// * `Ok(i64)` - The counter value after the increment
    /// * `Err(RepositoryError::NotFound)` - The target no longer exists
    async fn adjust_counter(
        &mut self,
        target: Target,
        kind: VoteKind,
        delta: i64,
    ) -> Result<i64, RepositoryError>;

    /// Atomically adds `delta` to the reputation of `user`, returning the new total.
    async fn apply_reputation(&mut self, user: UserId, delta: i64)
    -> Result<i64, RepositoryError>;

    async fn find_bookmark(
        &mut self,
        user: UserId,
        question: ContentId,
    ) -> Result<Option<Bookmark>, RepositoryError>;

    async fn insert_bookmark(&mut self, bookmark: &Bookmark) -> Result<(), RepositoryError>;

    async fn delete_bookmark(
        &mut self,
        user: UserId,
        question: ContentId,
    ) -> Result<(), RepositoryError>;

    async fn insert_content(&mut self, content: &VotableContent) -> Result<(), RepositoryError>;

    /// Atomically adds `delta` to the answer count of a question.
    async fn adjust_answer_count(
        &mut self,
        question: ContentId,
        delta: i64,
    ) -> Result<i64, RepositoryError>;

    /// Removes a question or answer together with every vote cast on it.
    ///
    /// Removing a question also removes its answers, their votes and the
    /// bookmarks pointing at it.
    async fn delete_content(&mut self, target: Target) -> Result<ContentRemoval, RepositoryError>;

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError>;
}

/// A trait that defines the interface for the transactional reputation store.
///
/// Writes only happen through a [`UnitOfWork`] obtained from
/// [`ReputationStore::begin`]; the remaining methods are committed-state reads.
#[async_trait::async_trait]
pub trait ReputationStore: Send + Sync {
    /// Opens a new atomic unit of work.
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepositoryError>;

    async fn find_content(&self, target: Target)
    -> Result<Option<VotableContent>, RepositoryError>;

    async fn find_vote(&self, voter: UserId, target: Target)
    -> Result<Option<Vote>, RepositoryError>;

    async fn find_bookmark(
        &self,
        user: UserId,
        question: ContentId,
    ) -> Result<Option<Bookmark>, RepositoryError>;

    /// Current reputation of `user`, `None` for unknown users.
    async fn reputation_of(&self, user: UserId) -> Result<Option<i64>, RepositoryError>;

    /// Recounts the ledger and reports every target whose cached counters drift.
    ///
    /// Full scan; meant for offline audits, never for the request path.
    async fn audit_counters(&self) -> Result<Vec<CounterDrift>, RepositoryError>;
}
