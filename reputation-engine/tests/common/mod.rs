//! Shared fixture for the engine integration tests.
//!
//! Wires the real services over the in-memory store and interaction log.
#![allow(dead_code)]

use reputation_engine::{
    BookmarkService, ContentService, EngineConfig, EngineContext, ForumActions, RevalidateHook,
    StaticIdentity, VoteService,
};
use reputation_repository::{InMemoryInteractionRepository, InMemoryReputationStore, ReputationStore};
use reputation_shared::types::{ContentId, InteractionRecord, Target, UserId, VotableContent};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Revalidation hook that remembers every path it was asked to refresh.
#[derive(Default)]
pub struct RecordingRevalidator {
    paths: Mutex<Vec<String>>,
}

impl RecordingRevalidator {
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

impl RevalidateHook for RecordingRevalidator {
    fn revalidate(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}

pub fn test_config() -> EngineConfig {
    EngineConfig {
        transaction_timeout: Duration::from_millis(500),
        retry_base_delay: Duration::from_millis(1),
        ..EngineConfig::default()
    }
}

pub struct Harness {
    pub store: InMemoryReputationStore,
    pub interactions: InMemoryInteractionRepository,
    pub revalidator: Arc<RecordingRevalidator>,
    pub context: EngineContext,
    pub votes: Arc<VoteService>,
    pub bookmarks: Arc<BookmarkService>,
    pub posts: Arc<ContentService>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let store = InMemoryReputationStore::new();
        let interactions = InMemoryInteractionRepository::new();
        let revalidator = Arc::new(RecordingRevalidator::default());
        let (context, worker) = EngineContext::new(
            Arc::new(store.clone()),
            Arc::new(interactions.clone()),
            revalidator.clone(),
            &config,
        );
        worker.spawn();

        Self {
            votes: Arc::new(VoteService::new(context.clone())),
            bookmarks: Arc::new(BookmarkService::new(context.clone())),
            posts: Arc::new(ContentService::new(context.clone())),
            store,
            interactions,
            revalidator,
            context,
        }
    }

    /// Registers a new account with zero reputation.
    pub async fn user(&self) -> UserId {
        let user = UserId::new_v4();
        self.store.register_user(user, 0).await;
        user
    }

    /// Seeds a question without moving any reputation.
    pub async fn question_by(&self, author: UserId) -> Target {
        let question = VotableContent::new_question(author);
        let target = question.target;
        self.store.seed_content(question).await;
        target
    }

    /// Seeds an answer without moving any reputation.
    pub async fn answer_by(&self, author: UserId, question: ContentId) -> Target {
        let answer = VotableContent::new_answer(author, question);
        let target = answer.target;
        self.store.seed_content(answer).await;
        target
    }

    pub async fn reputation(&self, user: UserId) -> i64 {
        self.store.reputation_of(user).await.unwrap().unwrap()
    }

    /// Current (upvotes, downvotes) of a target.
    pub async fn counters(&self, target: Target) -> (i64, i64) {
        let content = self.store.find_content(target).await.unwrap().unwrap();
        (content.upvotes, content.downvotes)
    }

    /// Interaction records written so far, after draining the queue.
    pub async fn recorded(&self) -> Vec<InteractionRecord> {
        self.context.recorder.flush().await;
        self.interactions.records()
    }

    pub fn actions_for(&self, caller: Option<UserId>) -> ForumActions {
        let identity = match caller {
            Some(user) => StaticIdentity::new(user),
            None => StaticIdentity::anonymous(),
        };
        ForumActions::new(Arc::new(identity), self.votes.clone(), self.bookmarks.clone())
    }

    /// Asserts that every cached counter matches a recount of the ledger.
    pub async fn assert_counters_match_ledger(&self) {
        let drifts = self.store.audit_counters().await.unwrap();
        assert!(drifts.is_empty(), "counter drift: {drifts:?}");
    }
}
