//! Integration tests for the PostgreSQL reputation store.
//!
//! These tests require a real PostgreSQL database and use SQLx test macros
//! to ensure proper test isolation and cleanup.
//!
//! Run with: `cargo test --test postgres_integration -- --ignored`

use reputation_repository::{
    InteractionRepository, PostgresInteractionRepository, PostgresReputationStore,
    RepositoryError, ReputationStore,
};
use reputation_shared::types::{
    Bookmark, InteractionRecord, InteractionVerb, Target, UserId, VotableContent, Vote, VoteKind,
};
use sqlx::Row;

/// Registers an author and commits a question written by them.
async fn seed_question(store: &PostgresReputationStore) -> (UserId, VotableContent) {
    let author = UserId::new_v4();
    store.register_user(author).await.unwrap();
    let question = VotableContent::new_question(author);
    let mut uow = store.begin().await.unwrap();
    uow.insert_content(&question).await.unwrap();
    uow.commit().await.unwrap();
    (author, question)
}

// ============================================================================
// Units of work
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
async fn test_commit_applies_vote_and_counter(pool: sqlx::PgPool) {
    let store = PostgresReputationStore::new(pool.clone()).await.unwrap();
    let (author, question) = seed_question(&store).await;
    let voter = UserId::new_v4();
    store.register_user(voter).await.unwrap();

    let mut uow = store.begin().await.unwrap();
    uow.insert_vote(&Vote::new(voter, question.target, VoteKind::Up))
        .await
        .unwrap();
    let upvotes = uow
        .adjust_counter(question.target, VoteKind::Up, 1)
        .await
        .unwrap();
    uow.apply_reputation(author, 10).await.unwrap();
    uow.commit().await.unwrap();

    assert_eq!(upvotes, 1);
    let vote = store.find_vote(voter, question.target).await.unwrap().unwrap();
    assert_eq!(vote.kind, VoteKind::Up);
    assert_eq!(store.reputation_of(author).await.unwrap(), Some(10));
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
async fn test_rollback_discards_every_write(pool: sqlx::PgPool) {
    let store = PostgresReputationStore::new(pool.clone()).await.unwrap();
    let (author, question) = seed_question(&store).await;

    let mut uow = store.begin().await.unwrap();
    uow.insert_vote(&Vote::new(author, question.target, VoteKind::Down))
        .await
        .unwrap();
    uow.adjust_counter(question.target, VoteKind::Down, 1)
        .await
        .unwrap();
    uow.rollback().await.unwrap();

    let content = store.find_content(question.target).await.unwrap().unwrap();
    assert_eq!(content.downvotes, 0);
    assert!(store.find_vote(author, question.target).await.unwrap().is_none());
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
async fn test_counter_underflow_is_rejected(pool: sqlx::PgPool) {
    let store = PostgresReputationStore::new(pool.clone()).await.unwrap();
    let (_, question) = seed_question(&store).await;

    let mut uow = store.begin().await.unwrap();
    let err = uow
        .adjust_counter(question.target, VoteKind::Up, -1)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::CounterUnderflow(_)));
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
async fn test_adjust_counter_on_missing_answer(pool: sqlx::PgPool) {
    let store = PostgresReputationStore::new(pool.clone()).await.unwrap();
    let mut uow = store.begin().await.unwrap();
    let missing = Target::answer(reputation_shared::types::ContentId::new_v4());
    let err = uow
        .adjust_counter(missing, VoteKind::Up, 1)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(ref what) if what == "Answer"));
}

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
async fn test_apply_reputation_to_unknown_user(pool: sqlx::PgPool) {
    let store = PostgresReputationStore::new(pool.clone()).await.unwrap();
    let mut uow = store.begin().await.unwrap();
    let err = uow
        .apply_reputation(UserId::new_v4(), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound(ref what) if what == "User"));
}

// ============================================================================
// Content
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
async fn test_delete_question_cascades(pool: sqlx::PgPool) {
    let store = PostgresReputationStore::new(pool.clone()).await.unwrap();
    let (author, question) = seed_question(&store).await;
    let other = UserId::new_v4();
    store.register_user(other).await.unwrap();
    let answer = VotableContent::new_answer(other, question.target.id);

    let mut uow = store.begin().await.unwrap();
    uow.insert_content(&answer).await.unwrap();
    uow.adjust_answer_count(question.target.id, 1).await.unwrap();
    uow.insert_vote(&Vote::new(other, question.target, VoteKind::Up))
        .await
        .unwrap();
    uow.insert_vote(&Vote::new(author, answer.target, VoteKind::Down))
        .await
        .unwrap();
    uow.insert_bookmark(&Bookmark::new(other, question.target.id))
        .await
        .unwrap();
    uow.commit().await.unwrap();

    let mut uow = store.begin().await.unwrap();
    let removal = uow.delete_content(question.target).await.unwrap();
    uow.commit().await.unwrap();

    assert_eq!(removal.votes, 2);
    assert_eq!(removal.answers, 1);
    assert_eq!(removal.bookmarks, 1);
    assert!(store.find_content(answer.target).await.unwrap().is_none());
    let votes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM votes")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(votes, 0);
}

// ============================================================================
// Audit
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
async fn test_audit_reports_drift(pool: sqlx::PgPool) {
    let store = PostgresReputationStore::new(pool.clone()).await.unwrap();
    let (author, question) = seed_question(&store).await;

    let mut uow = store.begin().await.unwrap();
    uow.insert_vote(&Vote::new(author, question.target, VoteKind::Up))
        .await
        .unwrap();
    uow.commit().await.unwrap();
    assert_eq!(store.audit_counters().await.unwrap().len(), 1);

    sqlx::query("UPDATE questions SET upvotes = 1 WHERE id = $1")
        .bind(question.target.id.as_uuid())
        .execute(&pool)
        .await
        .unwrap();
    assert!(store.audit_counters().await.unwrap().is_empty());
}

// ============================================================================
// Interactions
// ============================================================================

#[sqlx::test(migrations = "src/postgres/migrations")]
#[ignore = "requires a running PostgreSQL instance (DATABASE_URL)"]
async fn test_append_interaction(pool: sqlx::PgPool) {
    let repository = PostgresInteractionRepository::new(pool.clone()).await.unwrap();
    let record = InteractionRecord::new(
        UserId::new_v4(),
        InteractionVerb::Upvote,
        Target::question(reputation_shared::types::ContentId::new_v4()),
    );

    repository.append(&record).await.unwrap();

    let rows = sqlx::query("SELECT verb FROM interactions")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get::<String, _>("verb"), "upvote");
}
