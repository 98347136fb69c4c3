use super::{EngineContext, apply_points};
use crate::errors::EngineError;
use futures::FutureExt;
use reputation_repository::UnitOfWork;
use reputation_shared::paths;
use reputation_shared::types::{
    ContentId, ContentRemoval, InteractionVerb, ReputationEvent, Target, TargetKind, UserId,
    VotableContent,
};
use tracing::info;

/// Posting and deleting questions and answers, and the reputation they move.
pub struct ContentService {
    context: EngineContext,
}

impl ContentService {
    pub fn new(context: EngineContext) -> Self {
        Self { context }
    }

    /// Publishes a new question written by `author`.
    pub async fn post_question(&self, author: UserId) -> Result<VotableContent, EngineError> {
        let question = VotableContent::new_question(author);
        let content = self.post(question).await?;
        self.context.revalidator.revalidate(&content.canonical_path());
        Ok(content)
    }

    /// Publishes an answer to `question` written by `author`.
    ///
    /// # Returns
    ///
    /// * `Ok(VotableContent)` - The stored answer
    /// * `Err(EngineError::NotFound)` - The question does not exist
    pub async fn post_answer(
        &self,
        author: UserId,
        question: ContentId,
    ) -> Result<VotableContent, EngineError> {
        let answer = VotableContent::new_answer(author, question);
        let content = self.post(answer).await?;
        self.context.revalidator.revalidate(&content.canonical_path());
        Ok(content)
    }

    async fn post(&self, content: VotableContent) -> Result<VotableContent, EngineError> {
        let stored = self
            .context
            .coordinator
            .run_atomic("post_content", move |uow| insert_content(uow, content.clone()).boxed())
            .await?;

        info!(author = %stored.author, content = %stored.target, "Content posted");
        self.context.recorder.record(stored.author, InteractionVerb::Post, stored.target);
        Ok(stored)
    }

    /// Deletes a question or answer on behalf of its author.
    ///
    /// Votes on the content go with it. Deleting a question also deletes its
    /// answers and the bookmarks pointing at it.
    ///
    /// # Returns
    ///
    /// * `Ok(ContentRemoval)` - What was removed alongside the content
    /// * `Err(EngineError::NotFound)` - The content does not exist
    /// * `Err(EngineError::Forbidden)` - `caller` is not the author
    pub async fn delete_content(
        &self,
        caller: UserId,
        target: Target,
    ) -> Result<ContentRemoval, EngineError> {
        let (removal, question_path) = self
            .context
            .coordinator
            .run_atomic("delete_content", move |uow| remove_content(uow, caller, target).boxed())
            .await?;

        info!(
            author = %caller,
            content = %target,
            votes = removal.votes,
            answers = removal.answers,
            bookmarks = removal.bookmarks,
            "Content deleted"
        );
        self.context.recorder.record(caller, InteractionVerb::Delete, target);
        if let Some(path) = question_path {
            self.context.revalidator.revalidate(&path);
        }
        self.context.revalidator.revalidate(&paths::profile(caller));
        Ok(removal)
    }

    pub async fn find_content(
        &self,
        target: Target,
    ) -> Result<Option<VotableContent>, EngineError> {
        Ok(self.context.store.find_content(target).await?)
    }

    pub async fn reputation_of(&self, user: UserId) -> Result<Option<i64>, EngineError> {
        Ok(self.context.store.reputation_of(user).await?)
    }
}

async fn insert_content(
    uow: &mut dyn UnitOfWork,
    content: VotableContent,
) -> Result<VotableContent, EngineError> {
    if content.target.kind == TargetKind::Answer {
        uow.find_content(Target::question(content.question_id))
            .await?
            .ok_or_else(|| EngineError::not_found("Question"))?;
        uow.insert_content(&content).await?;
        uow.adjust_answer_count(content.question_id, 1).await?;
    } else {
        uow.insert_content(&content).await?;
    }

    let points = ReputationEvent::Post(content.target.kind).points();
    apply_points(uow, points, content.author, content.author).await?;
    Ok(content)
}

/// Returns what was removed and, for an answer, the page of its question.
async fn remove_content(
    uow: &mut dyn UnitOfWork,
    caller: UserId,
    target: Target,
) -> Result<(ContentRemoval, Option<String>), EngineError> {
    let content = uow
        .find_content(target)
        .await?
        .ok_or_else(|| EngineError::not_found(target.kind.label()))?;
    if content.author != caller {
        return Err(EngineError::Forbidden(format!(
            "Only the author can delete this {}",
            target.kind
        )));
    }

    let removal = uow.delete_content(target).await?;
    let question_path = if content.is_question() {
        None
    } else {
        uow.adjust_answer_count(content.question_id, -1).await?;
        Some(content.canonical_path())
    };

    let points = ReputationEvent::Delete(target.kind).points();
    apply_points(uow, points, caller, content.author).await?;
    Ok((removal, question_path))
}
