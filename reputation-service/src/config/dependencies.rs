use crate::config::ServiceSettings;
use crate::errors::ServiceError;
use reputation_engine::{
    BookmarkService, ContentService, EngineContext, ForumActions, StaticIdentity,
    TracingRevalidator, VoteService,
};
use reputation_repository::{PostgresInteractionRepository, PostgresReputationStore, run_migrations};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// `Dependencies` holds the wired services of the reputation core.
///
/// The interaction worker runs for as long as any service handle is alive;
/// [`Dependencies::shutdown`] drops them and waits for the queue to drain.
pub struct Dependencies {
    pub pool: sqlx::PgPool,
    pub store: Arc<PostgresReputationStore>,
    pub context: EngineContext,
    pub votes: Arc<VoteService>,
    pub bookmarks: Arc<BookmarkService>,
    pub content: Arc<ContentService>,
    /// Facade acting for no one; callers bind a caller with `with_identity`.
    pub actions: ForumActions,
    worker: JoinHandle<()>,
}

impl Dependencies {
    /// Connects to PostgreSQL, applies migrations and wires every service.
    ///
    /// # Arguments
    ///
    /// * `settings` - Connection string, pool size and engine limits
    ///
    /// # Returns
    ///
    /// A `Result` which is `Ok(Self)` once the pool is up and the schema is
    /// current, or a `ServiceError` if any step fails.
    pub async fn new(settings: &ServiceSettings) -> Result<Self, ServiceError> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .connect(&settings.database_url)
            .await?;
        info!(max_connections = settings.max_connections, "Database pool ready");

        run_migrations(&pool).await?;
        info!("Migrations applied");

        let store = Arc::new(PostgresReputationStore::new(pool.clone()).await?);
        let interactions = Arc::new(PostgresInteractionRepository::new(pool.clone()).await?);

        let (context, worker) = EngineContext::new(
            store.clone(),
            interactions,
            Arc::new(TracingRevalidator),
            &settings.engine,
        );
        let worker = worker.spawn();

        let votes = Arc::new(VoteService::new(context.clone()));
        let bookmarks = Arc::new(BookmarkService::new(context.clone()));
        let content = Arc::new(ContentService::new(context.clone()));
        let actions = ForumActions::new(
            Arc::new(StaticIdentity::anonymous()),
            votes.clone(),
            bookmarks.clone(),
        );

        Ok(Self {
            pool,
            store,
            context,
            votes,
            bookmarks,
            content,
            actions,
            worker,
        })
    }

    /// Flushes pending interaction records, stops the worker and closes the pool.
    pub async fn shutdown(self) -> Result<(), ServiceError> {
        let Self {
            pool,
            store,
            context,
            votes,
            bookmarks,
            content,
            actions,
            worker,
        } = self;

        context.recorder.flush().await;
        drop((actions, votes, bookmarks, content, context));
        worker.await?;

        drop(store);
        pool.close().await;
        info!("Reputation service stopped");
        Ok(())
    }
}
