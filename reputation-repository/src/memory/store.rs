use super::{Fault, FaultPoint};
use crate::{RepositoryError, ReputationStore, UnitOfWork};
use async_trait::async_trait;
use reputation_shared::types::{
    Bookmark, ContentId, ContentRemoval, CounterDrift, Target, TargetKind, UserId, VotableContent,
    Vote, VoteKind,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OwnedMutexGuard;

#[derive(Debug, Clone, Default)]
struct MemoryState {
    users: HashMap<UserId, i64>,
    contents: HashMap<Target, VotableContent>,
    votes: HashMap<(UserId, Target), Vote>,
    bookmarks: HashMap<(UserId, ContentId), Bookmark>,
}

type FaultQueue = Arc<Mutex<Vec<(FaultPoint, Fault)>>>;

fn take_fault(faults: &FaultQueue, point: FaultPoint) -> Option<Fault> {
    let mut faults = faults.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let index = faults.iter().position(|(p, _)| *p == point)?;
    Some(faults.remove(index).1)
}

/// Reputation store kept entirely in process memory.
///
/// Units are serialized through one store-wide lock: a unit holds it from
/// `begin` until commit or rollback. Row-level contention, lost updates and
/// racing inserts therefore never occur here; those paths are covered by the
/// PostgreSQL tests.
#[derive(Clone, Default)]
pub struct InMemoryReputationStore {
    state: Arc<tokio::sync::Mutex<MemoryState>>,
    faults: FaultQueue,
}

impl InMemoryReputationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a one-shot fault for the next unit operation at `point`.
    pub fn inject_fault(&self, point: FaultPoint, fault: Fault) {
        self.faults
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((point, fault));
    }

    pub async fn register_user(&self, user: UserId, reputation: i64) {
        self.state.lock().await.users.insert(user, reputation);
    }

    /// Seeds content directly, bypassing reputation bookkeeping.
    pub async fn seed_content(&self, content: VotableContent) {
        self.state
            .lock()
            .await
            .contents
            .insert(content.target, content);
    }

    pub async fn votes(&self) -> Vec<Vote> {
        self.state.lock().await.votes.values().cloned().collect()
    }

    pub async fn bookmarks(&self) -> Vec<Bookmark> {
        self.state.lock().await.bookmarks.values().cloned().collect()
    }
}

#[async_trait]
impl ReputationStore for InMemoryReputationStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepositoryError> {
        let shared = self.state.clone().lock_owned().await;
        let working = shared.clone();
        Ok(Box::new(InMemoryUnitOfWork {
            shared,
            working,
            faults: self.faults.clone(),
        }))
    }

    async fn find_content(
        &self,
        target: Target,
    ) -> Result<Option<VotableContent>, RepositoryError> {
        Ok(self.state.lock().await.contents.get(&target).cloned())
    }

    async fn find_vote(
        &self,
        voter: UserId,
        target: Target,
    ) -> Result<Option<Vote>, RepositoryError> {
        Ok(self.state.lock().await.votes.get(&(voter, target)).cloned())
    }

    async fn find_bookmark(
        &self,
        user: UserId,
        question: ContentId,
    ) -> Result<Option<Bookmark>, RepositoryError> {
        Ok(self.state.lock().await.bookmarks.get(&(user, question)).cloned())
    }

    async fn reputation_of(&self, user: UserId) -> Result<Option<i64>, RepositoryError> {
        Ok(self.state.lock().await.users.get(&user).copied())
    }

    async fn audit_counters(&self) -> Result<Vec<CounterDrift>, RepositoryError> {
        let state = self.state.lock().await;
        let mut tally: HashMap<Target, (i64, i64)> = HashMap::new();
        for vote in state.votes.values() {
            let entry = tally.entry(vote.target).or_default();
            match vote.kind {
                VoteKind::Up => entry.0 += 1,
                VoteKind::Down => entry.1 += 1,
            }
        }

        let mut drifts: Vec<CounterDrift> = state
            .contents
            .values()
            .filter_map(|content| {
                let (ups, downs) = tally.get(&content.target).copied().unwrap_or_default();
                (content.upvotes != ups || content.downvotes != downs).then(|| CounterDrift {
                    target: content.target,
                    cached_upvotes: content.upvotes,
                    cached_downvotes: content.downvotes,
                    ledger_upvotes: ups,
                    ledger_downvotes: downs,
                })
            })
            .collect();
        drifts.sort_by_key(|drift| drift.target);
        Ok(drifts)
    }
}

struct InMemoryUnitOfWork {
    shared: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
    faults: FaultQueue,
}

impl InMemoryUnitOfWork {
    async fn check(&self, point: FaultPoint) -> Result<(), RepositoryError> {
        match take_fault(&self.faults, point) {
            Some(Fault::Fail(error)) => Err(error),
            Some(Fault::Stall(duration)) => {
                tokio::time::sleep(duration).await;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn content_mut(&mut self, target: Target) -> Result<&mut VotableContent, RepositoryError> {
        self.working
            .contents
            .get_mut(&target)
            .ok_or_else(|| RepositoryError::not_found(target.kind.label()))
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn find_content(
        &mut self,
        target: Target,
    ) -> Result<Option<VotableContent>, RepositoryError> {
        self.check(FaultPoint::FindContent).await?;
        Ok(self.working.contents.get(&target).cloned())
    }

    async fn find_vote(
        &mut self,
        voter: UserId,
        target: Target,
    ) -> Result<Option<Vote>, RepositoryError> {
        self.check(FaultPoint::FindVote).await?;
        Ok(self.working.votes.get(&(voter, target)).cloned())
    }

    async fn insert_vote(&mut self, vote: &Vote) -> Result<(), RepositoryError> {
        self.check(FaultPoint::InsertVote).await?;
        let key = (vote.voter, vote.target);
        if self.working.votes.contains_key(&key) {
            return Err(RepositoryError::Conflict(format!(
                "vote of {} on {} already exists",
                vote.voter, vote.target
            )));
        }
        self.working.votes.insert(key, vote.clone());
        Ok(())
    }

    async fn update_vote_kind(
        &mut self,
        voter: UserId,
        target: Target,
        kind: VoteKind,
    ) -> Result<(), RepositoryError> {
        self.check(FaultPoint::UpdateVote).await?;
        let vote = self
            .working
            .votes
            .get_mut(&(voter, target))
            .ok_or_else(|| RepositoryError::not_found("Vote"))?;
        vote.kind = kind;
        Ok(())
    }

    async fn delete_vote(&mut self, voter: UserId, target: Target) -> Result<(), RepositoryError> {
        self.check(FaultPoint::DeleteVote).await?;
        self.working
            .votes
            .remove(&(voter, target))
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found("Vote"))
    }

    async fn adjust_counter(
        &mut self,
        target: Target,
        kind: VoteKind,
        delta: i64,
    ) -> Result<i64, RepositoryError> {
        self.check(FaultPoint::AdjustCounter).await?;
        let content = self.content_mut(target)?;
        let counter = match kind {
            VoteKind::Up => &mut content.upvotes,
            VoteKind::Down => &mut content.downvotes,
        };
        let next = *counter + delta;
        if next < 0 {
            return Err(RepositoryError::CounterUnderflow(target.to_string()));
        }
        *counter = next;
        Ok(next)
    }

    async fn apply_reputation(
        &mut self,
        user: UserId,
        delta: i64,
    ) -> Result<i64, RepositoryError> {
        self.check(FaultPoint::ApplyReputation).await?;
        let reputation = self
            .working
            .users
            .get_mut(&user)
            .ok_or_else(|| RepositoryError::not_found("User"))?;
        *reputation += delta;
        Ok(*reputation)
    }

    async fn find_bookmark(
        &mut self,
        user: UserId,
        question: ContentId,
    ) -> Result<Option<Bookmark>, RepositoryError> {
        Ok(self.working.bookmarks.get(&(user, question)).cloned())
    }

    async fn insert_bookmark(&mut self, bookmark: &Bookmark) -> Result<(), RepositoryError> {
        let key = (bookmark.user, bookmark.question_id);
        if self.working.bookmarks.contains_key(&key) {
            return Err(RepositoryError::Conflict(format!(
                "bookmark of {} on question {} already exists",
                bookmark.user, bookmark.question_id
            )));
        }
        self.working.bookmarks.insert(key, bookmark.clone());
        Ok(())
    }

    async fn delete_bookmark(
        &mut self,
        user: UserId,
        question: ContentId,
    ) -> Result<(), RepositoryError> {
        self.working
            .bookmarks
            .remove(&(user, question))
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found("Bookmark"))
    }

    async fn insert_content(&mut self, content: &VotableContent) -> Result<(), RepositoryError> {
        if self.working.contents.contains_key(&content.target) {
            return Err(RepositoryError::Conflict(format!(
                "{} already exists",
                content.target
            )));
        }
        self.working.contents.insert(content.target, content.clone());
        Ok(())
    }

    async fn adjust_answer_count(
        &mut self,
        question: ContentId,
        delta: i64,
    ) -> Result<i64, RepositoryError> {
        let target = Target::question(question);
        let content = self.content_mut(target)?;
        let next = content.answers + delta;
        if next < 0 {
            return Err(RepositoryError::CounterUnderflow(target.to_string()));
        }
        content.answers = next;
        Ok(next)
    }

    async fn delete_content(&mut self, target: Target) -> Result<ContentRemoval, RepositoryError> {
        if !self.working.contents.contains_key(&target) {
            return Err(RepositoryError::not_found(target.kind.label()));
        }

        let mut removed_targets = vec![target];
        let mut removal = ContentRemoval::default();
        if target.kind == TargetKind::Question {
            let answers: Vec<Target> = self
                .working
                .contents
                .values()
                .filter(|c| c.target.kind == TargetKind::Answer && c.question_id == target.id)
                .map(|c| c.target)
                .collect();
            removal.answers = answers.len() as u64;
            removed_targets.extend(answers);

            let before = self.working.bookmarks.len();
            self.working
                .bookmarks
                .retain(|(_, question), _| *question != target.id);
            removal.bookmarks = (before - self.working.bookmarks.len()) as u64;
        }

        let before = self.working.votes.len();
        self.working
            .votes
            .retain(|(_, voted), _| !removed_targets.contains(voted));
        removal.votes = (before - self.working.votes.len()) as u64;

        for removed in &removed_targets {
            self.working.contents.remove(removed);
        }
        Ok(removal)
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let late_ack = match take_fault(&self.faults, FaultPoint::Commit) {
            Some(Fault::Fail(error)) => return Err(error),
            Some(Fault::Stall(duration)) => Some(duration),
            None => None,
        };
        let InMemoryUnitOfWork {
            mut shared,
            working,
            ..
        } = *self;
        *shared = working;
        drop(shared);
        if let Some(duration) = late_ack {
            tokio::time::sleep(duration).await;
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
        Ok(())
    }
}
