use super::{EngineContext, apply_points};
use crate::errors::EngineError;
use futures::FutureExt;
use reputation_repository::UnitOfWork;
use reputation_shared::paths;
use reputation_shared::types::{Bookmark, ContentId, InteractionVerb, ReputationEvent, Target, UserId};
use serde::Serialize;
use tracing::info;

/// Whether the question is in the caller's collection after a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookmarkOutcome {
    pub saved: bool,
}

/// Saves questions to and removes them from users' collections.
pub struct BookmarkService {
    context: EngineContext,
}

impl BookmarkService {
    pub fn new(context: EngineContext) -> Self {
        Self { context }
    }

    /// Saves `question` for `user`, or removes it when it is already saved.
    ///
    /// Saving credits the user and the question's author, removing reverses
    /// the credit.
    pub async fn toggle_bookmark(
        &self,
        user: UserId,
        question: ContentId,
    ) -> Result<BookmarkOutcome, EngineError> {
        let outcome = self
            .context
            .coordinator
            .run_atomic("toggle_bookmark", move |uow| apply_toggle(uow, user, question).boxed())
            .await?;

        info!(
            user = %user,
            question = %question,
            saved = outcome.saved,
            "Bookmark toggled"
        );

        let verb = if outcome.saved {
            InteractionVerb::Bookmark
        } else {
            InteractionVerb::Unbookmark
        };
        self.context.recorder.record(user, verb, Target::question(question));
        self.context.revalidator.revalidate(&paths::question(question));
        Ok(outcome)
    }

    pub async fn is_bookmarked(
        &self,
        user: UserId,
        question: ContentId,
    ) -> Result<bool, EngineError> {
        let bookmark = self.context.store.find_bookmark(user, question).await?;
        Ok(bookmark.is_some())
    }
}

async fn apply_toggle(
    uow: &mut dyn UnitOfWork,
    user: UserId,
    question: ContentId,
) -> Result<BookmarkOutcome, EngineError> {
    let content = uow
        .find_content(Target::question(question))
        .await?
        .ok_or_else(|| EngineError::not_found("Question"))?;

    let (event, saved) = match uow.find_bookmark(user, question).await? {
        Some(_) => {
            uow.delete_bookmark(user, question).await?;
            (ReputationEvent::Unbookmark, false)
        }
        None => {
            uow.insert_bookmark(&Bookmark::new(user, question)).await?;
            (ReputationEvent::Bookmark, true)
        }
    };

    apply_points(uow, event.points(), user, content.author).await?;
    Ok(BookmarkOutcome { saved })
}
