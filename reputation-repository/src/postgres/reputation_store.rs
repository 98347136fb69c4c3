//! PostgreSQL implementation of the reputation store.
//!
//! Provides a PostgreSQL backend for the `ReputationStore` trait with
//! connection pooling and one database transaction per unit of work.
//!
//! ## Key Features
//!
//! - Connection pooling with `sqlx::PgPool`
//! - ACID transactions; dropping an uncommitted unit rolls it back
//! - `SELECT ... FOR UPDATE` on the vote row to serialize writers of a pair
//! - Counter and reputation changes as single `UPDATE ... SET x = x + $1`
//!   statements, never read-modify-write in the application
use super::{target_kind_from_i16, target_kind_to_i16, vote_kind_from_i16, vote_kind_to_i16};
use crate::{RepositoryError, ReputationStore, UnitOfWork};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reputation_shared::types::{
    Bookmark, ContentId, ContentRemoval, CounterDrift, Target, TargetKind, UserId, VotableContent,
    Vote, VoteKind,
};
use tracing::debug;
use uuid::Uuid;

const CHECK_VIOLATION: &str = "23514";

#[derive(sqlx::FromRow)]
struct ContentRow {
    id: Uuid,
    question_id: Uuid,
    author_id: Uuid,
    upvotes: i64,
    downvotes: i64,
    answers: i64,
    created_at: DateTime<Utc>,
}

impl ContentRow {
    fn into_content(self, kind: TargetKind) -> VotableContent {
        VotableContent {
            target: Target::new(ContentId(self.id), kind),
            author: UserId(self.author_id),
            question_id: ContentId(self.question_id),
            upvotes: self.upvotes,
            downvotes: self.downvotes,
            answers: self.answers,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct VoteRow {
    voter_id: Uuid,
    target_id: Uuid,
    target_kind: i16,
    vote_kind: i16,
    created_at: DateTime<Utc>,
}

impl TryFrom<VoteRow> for Vote {
    type Error = RepositoryError;

    fn try_from(row: VoteRow) -> Result<Self, Self::Error> {
        Ok(Vote {
            voter: UserId(row.voter_id),
            target: Target::new(ContentId(row.target_id), target_kind_from_i16(row.target_kind)?),
            kind: vote_kind_from_i16(row.vote_kind)?,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct BookmarkRow {
    user_id: Uuid,
    question_id: Uuid,
    created_at: DateTime<Utc>,
}

impl From<BookmarkRow> for Bookmark {
    fn from(row: BookmarkRow) -> Self {
        Bookmark {
            user: UserId(row.user_id),
            question_id: ContentId(row.question_id),
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct DriftRow {
    id: Uuid,
    kind: i16,
    upvotes: i64,
    downvotes: i64,
    ledger_upvotes: i64,
    ledger_downvotes: i64,
}

fn content_table(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::Question => "questions",
        TargetKind::Answer => "answers",
    }
}

fn counter_column(kind: VoteKind) -> &'static str {
    match kind {
        VoteKind::Up => "upvotes",
        VoteKind::Down => "downvotes",
    }
}

/// Maps a failed non-negativity check to a domain error.
fn counter_error(error: sqlx::Error, what: impl Into<String>) -> RepositoryError {
    match &error {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(CHECK_VIOLATION) => {
            RepositoryError::CounterUnderflow(what.into())
        }
        _ => RepositoryError::DatabaseError(error),
    }
}

async fn fetch_content<'e, E>(
    executor: E,
    target: Target,
) -> Result<Option<VotableContent>, RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    let sql = match target.kind {
        TargetKind::Question => {
            "SELECT id, id AS question_id, author_id, upvotes, downvotes, answers, created_at FROM questions WHERE id = $1"
        }
        TargetKind::Answer => {
            "SELECT id, question_id, author_id, upvotes, downvotes, 0::BIGINT AS answers, created_at FROM answers WHERE id = $1"
        }
    };
    let row = sqlx::query_as::<_, ContentRow>(sql)
        .bind(target.id.as_uuid())
        .fetch_optional(executor)
        .await?;
    Ok(row.map(|row| row.into_content(target.kind)))
}

async fn fetch_vote<'e, E>(
    executor: E,
    voter: UserId,
    target: Target,
    for_update: bool,
) -> Result<Option<Vote>, RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    let sql = format!(
        "SELECT voter_id, target_id, target_kind, vote_kind, created_at FROM votes WHERE voter_id = $1 AND target_id = $2 AND target_kind = $3{}",
        if for_update { " FOR UPDATE" } else { "" }
    );
    let row = sqlx::query_as::<_, VoteRow>(&sql)
        .bind(voter.as_uuid())
        .bind(target.id.as_uuid())
        .bind(target_kind_to_i16(target.kind))
        .fetch_optional(executor)
        .await?;
    row.map(Vote::try_from).transpose()
}

async fn fetch_bookmark<'e, E>(
    executor: E,
    user: UserId,
    question: ContentId,
    for_update: bool,
) -> Result<Option<Bookmark>, RepositoryError>
where
    E: sqlx::PgExecutor<'e>,
{
    let sql = format!(
        "SELECT user_id, question_id, created_at FROM bookmarks WHERE user_id = $1 AND question_id = $2{}",
        if for_update { " FOR UPDATE" } else { "" }
    );
    let row = sqlx::query_as::<_, BookmarkRow>(&sql)
        .bind(user.as_uuid())
        .bind(question.as_uuid())
        .fetch_optional(executor)
        .await?;
    Ok(row.map(Bookmark::from))
}

/// PostgreSQL implementation of the reputation store.
pub struct PostgresReputationStore {
    pool: sqlx::PgPool,
}

impl PostgresReputationStore {
    /// Creates a new PostgreSQL store instance.
    ///
    /// # Arguments
    ///
    /// * `pool` - Configured PostgreSQL connection pool with the migrated schema
    pub async fn new(pool: sqlx::PgPool) -> Result<Self, RepositoryError> {
        Ok(Self { pool })
    }

    /// Creates the reputation row of a user if it does not exist yet.
    pub async fn register_user(&self, user: UserId) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO users (id) VALUES ($1) ON CONFLICT (id) DO NOTHING")
            .bind(user.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ReputationStore for PostgresReputationStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepositoryError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PostgresUnitOfWork { tx }))
    }

    async fn find_content(
        &self,
        target: Target,
    ) -> Result<Option<VotableContent>, RepositoryError> {
        fetch_content(&self.pool, target).await
    }

    async fn find_vote(
        &self,
        voter: UserId,
        target: Target,
    ) -> Result<Option<Vote>, RepositoryError> {
        fetch_vote(&self.pool, voter, target, false).await
    }

    async fn find_bookmark(
        &self,
        user: UserId,
        question: ContentId,
    ) -> Result<Option<Bookmark>, RepositoryError> {
        fetch_bookmark(&self.pool, user, question, false).await
    }

    async fn reputation_of(&self, user: UserId) -> Result<Option<i64>, RepositoryError> {
        let reputation = sqlx::query_scalar::<_, i64>("SELECT reputation FROM users WHERE id = $1")
            .bind(user.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        Ok(reputation)
    }

    async fn audit_counters(&self) -> Result<Vec<CounterDrift>, RepositoryError> {
        let rows = sqlx::query_as::<_, DriftRow>(
            r#"
            SELECT c.id, c.kind, c.upvotes, c.downvotes,
                   COALESCE(v.ups, 0) AS ledger_upvotes,
                   COALESCE(v.downs, 0) AS ledger_downvotes
            FROM (
                SELECT id, 0::SMALLINT AS kind, upvotes, downvotes FROM questions
                UNION ALL
                SELECT id, 1::SMALLINT AS kind, upvotes, downvotes FROM answers
            ) c
            LEFT JOIN (
                SELECT target_id, target_kind,
                       COUNT(*) FILTER (WHERE vote_kind = 0) AS ups,
                       COUNT(*) FILTER (WHERE vote_kind = 1) AS downs
                FROM votes
                GROUP BY target_id, target_kind
            ) v ON v.target_id = c.id AND v.target_kind = c.kind
            WHERE c.upvotes <> COALESCE(v.ups, 0) OR c.downvotes <> COALESCE(v.downs, 0)
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut drifts = Vec::with_capacity(rows.len());
        for row in rows {
            drifts.push(CounterDrift {
                target: Target::new(ContentId(row.id), target_kind_from_i16(row.kind)?),
                cached_upvotes: row.upvotes,
                cached_downvotes: row.downvotes,
                ledger_upvotes: row.ledger_upvotes,
                ledger_downvotes: row.ledger_downvotes,
            });
        }
        Ok(drifts)
    }
}

/// A unit of work backed by one PostgreSQL transaction.
pub struct PostgresUnitOfWork {
    tx: sqlx::Transaction<'static, sqlx::Postgres>,
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    async fn find_content(
        &mut self,
        target: Target,
    ) -> Result<Option<VotableContent>, RepositoryError> {
        fetch_content(&mut *self.tx, target).await
    }

    async fn find_vote(
        &mut self,
        voter: UserId,
        target: Target,
    ) -> Result<Option<Vote>, RepositoryError> {
        fetch_vote(&mut *self.tx, voter, target, true).await
    }

    async fn insert_vote(&mut self, vote: &Vote) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO votes (voter_id, target_id, target_kind, vote_kind, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(vote.voter.as_uuid())
        .bind(vote.target.id.as_uuid())
        .bind(target_kind_to_i16(vote.target.kind))
        .bind(vote_kind_to_i16(vote.kind))
        .bind(vote.created_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn update_vote_kind(
        &mut self,
        voter: UserId,
        target: Target,
        kind: VoteKind,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE votes SET vote_kind = $4 WHERE voter_id = $1 AND target_id = $2 AND target_kind = $3",
        )
        .bind(voter.as_uuid())
        .bind(target.id.as_uuid())
        .bind(target_kind_to_i16(target.kind))
        .bind(vote_kind_to_i16(kind))
        .execute(&mut *self.tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("Vote"));
        }
        Ok(())
    }

    async fn delete_vote(&mut self, voter: UserId, target: Target) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "DELETE FROM votes WHERE voter_id = $1 AND target_id = $2 AND target_kind = $3",
        )
        .bind(voter.as_uuid())
        .bind(target.id.as_uuid())
        .bind(target_kind_to_i16(target.kind))
        .execute(&mut *self.tx)
        .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("Vote"));
        }
        Ok(())
    }

    async fn adjust_counter(
        &mut self,
        target: Target,
        kind: VoteKind,
        delta: i64,
    ) -> Result<i64, RepositoryError> {
        let table = content_table(target.kind);
        let column = counter_column(kind);
        let sql =
            format!("UPDATE {table} SET {column} = {column} + $1 WHERE id = $2 RETURNING {column}");
        let value = sqlx::query_scalar::<_, i64>(&sql)
            .bind(delta)
            .bind(target.id.as_uuid())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| counter_error(e, target.to_string()))?;
        value.ok_or_else(|| RepositoryError::not_found(target.kind.label()))
    }

    async fn apply_reputation(
        &mut self,
        user: UserId,
        delta: i64,
    ) -> Result<i64, RepositoryError> {
        let value = sqlx::query_scalar::<_, i64>(
            "UPDATE users SET reputation = reputation + $1 WHERE id = $2 RETURNING reputation",
        )
        .bind(delta)
        .bind(user.as_uuid())
        .fetch_optional(&mut *self.tx)
        .await?;
        value.ok_or_else(|| RepositoryError::not_found("User"))
    }

    async fn find_bookmark(
        &mut self,
        user: UserId,
        question: ContentId,
    ) -> Result<Option<Bookmark>, RepositoryError> {
        fetch_bookmark(&mut *self.tx, user, question, true).await
    }

    async fn insert_bookmark(&mut self, bookmark: &Bookmark) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO bookmarks (user_id, question_id, created_at) VALUES ($1, $2, $3)")
            .bind(bookmark.user.as_uuid())
            .bind(bookmark.question_id.as_uuid())
            .bind(bookmark.created_at)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn delete_bookmark(
        &mut self,
        user: UserId,
        question: ContentId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE user_id = $1 AND question_id = $2")
            .bind(user.as_uuid())
            .bind(question.as_uuid())
            .execute(&mut *self.tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::not_found("Bookmark"));
        }
        Ok(())
    }

    async fn insert_content(&mut self, content: &VotableContent) -> Result<(), RepositoryError> {
        match content.target.kind {
            TargetKind::Question => {
                sqlx::query(
                    "INSERT INTO questions (id, author_id, upvotes, downvotes, answers, created_at) VALUES ($1, $2, $3, $4, $5, $6)",
                )
                .bind(content.target.id.as_uuid())
                .bind(content.author.as_uuid())
                .bind(content.upvotes)
                .bind(content.downvotes)
                .bind(content.answers)
                .bind(content.created_at)
                .execute(&mut *self.tx)
                .await?;
            }
            TargetKind::Answer => {
                sqlx::query(
                    "INSERT INTO answers (id, question_id, author_id, upvotes, downvotes, created_at) VALUES ($1, $2, $3, $4, $5, $6)",
                )
                .bind(content.target.id.as_uuid())
                .bind(content.question_id.as_uuid())
                .bind(content.author.as_uuid())
                .bind(content.upvotes)
                .bind(content.downvotes)
                .bind(content.created_at)
                .execute(&mut *self.tx)
                .await?;
            }
        }
        Ok(())
    }

    async fn adjust_answer_count(
        &mut self,
        question: ContentId,
        delta: i64,
    ) -> Result<i64, RepositoryError> {
        let value = sqlx::query_scalar::<_, i64>(
            "UPDATE questions SET answers = answers + $1 WHERE id = $2 RETURNING answers",
        )
        .bind(delta)
        .bind(question.as_uuid())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| counter_error(e, format!("question {question}")))?;
        value.ok_or_else(|| RepositoryError::not_found("Question"))
    }

    async fn delete_content(&mut self, target: Target) -> Result<ContentRemoval, RepositoryError> {
        let id = target.id.as_uuid();
        let mut removal = ContentRemoval::default();

        if target.kind == TargetKind::Question {
            removal.votes += sqlx::query(
                "DELETE FROM votes WHERE target_kind = $2 AND target_id IN (SELECT id FROM answers WHERE question_id = $1)",
            )
            .bind(id)
            .bind(target_kind_to_i16(TargetKind::Answer))
            .execute(&mut *self.tx)
            .await?
            .rows_affected();
            removal.bookmarks = sqlx::query("DELETE FROM bookmarks WHERE question_id = $1")
                .bind(id)
                .execute(&mut *self.tx)
                .await?
                .rows_affected();
            removal.answers = sqlx::query("DELETE FROM answers WHERE question_id = $1")
                .bind(id)
                .execute(&mut *self.tx)
                .await?
                .rows_affected();
        }

        removal.votes += sqlx::query("DELETE FROM votes WHERE target_id = $1 AND target_kind = $2")
            .bind(id)
            .bind(target_kind_to_i16(target.kind))
            .execute(&mut *self.tx)
            .await?
            .rows_affected();

        let sql = format!("DELETE FROM {} WHERE id = $1", content_table(target.kind));
        let deleted = sqlx::query(&sql)
            .bind(id)
            .execute(&mut *self.tx)
            .await?
            .rows_affected();
        if deleted == 0 {
            return Err(RepositoryError::not_found(target.kind.label()));
        }

        debug!(
            content = %target,
            votes = removal.votes,
            answers = removal.answers,
            bookmarks = removal.bookmarks,
            "Content removed"
        );
        Ok(removal)
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepositoryError> {
        self.tx.rollback().await?;
        Ok(())
    }
}
