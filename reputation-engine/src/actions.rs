//! String-typed entry points for the outer layer.
//!
//! Raw inputs are validated and resolved into typed values before anything
//! else happens, then the caller's identity is checked, and only then is a
//! service invoked. Every outcome is folded into an [`ActionResponse`].
use crate::errors::{EngineError, FieldErrors};
use crate::hooks::IdentityProvider;
use crate::response::ActionResponse;
use crate::services::{BookmarkOutcome, BookmarkService, VoteService};
use reputation_shared::types::{ContentId, Target, TargetKind, UserId, VoteKind, VoteStatus};
use std::sync::Arc;
use tracing::{debug, error};

/// Facade over the vote and bookmark services.
#[derive(Clone)]
pub struct ForumActions {
    identity: Arc<dyn IdentityProvider>,
    votes: Arc<VoteService>,
    bookmarks: Arc<BookmarkService>,
}

impl ForumActions {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        votes: Arc<VoteService>,
        bookmarks: Arc<BookmarkService>,
    ) -> Self {
        Self {
            identity,
            votes,
            bookmarks,
        }
    }

    /// The same facade acting for another caller.
    pub fn with_identity(&self, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            identity,
            ..self.clone()
        }
    }

    /// Casts, switches or retracts the caller's vote.
    ///
    /// # Arguments
    ///
    /// * `action_id` - Id of the question or answer
    /// * `action_type` - `"question"` or `"answer"`
    /// * `vote_type` - `"upvote"` or `"downvote"`
    pub async fn cast_vote(
        &self,
        action_id: &str,
        action_type: &str,
        vote_type: &str,
    ) -> ActionResponse {
        let result = async {
            let mut fields = FieldErrors::new();
            let target = parse_target(action_id, action_type, &mut fields);
            let kind =
                parse_field::<VoteKind>("voteType", vote_type, "Invalid vote type.", &mut fields);
            let (Some(target), Some(kind)) = (target, kind) else {
                return Err(EngineError::validation(fields));
            };
            let voter = self.caller().await?;
            self.votes.cast_vote(voter, target, kind).await
        }
        .await;
        match result {
            Ok(_) => ActionResponse::done(),
            Err(e) => reject("cast_vote", e),
        }
    }

    /// Reports whether the caller has up- or downvoted a target.
    pub async fn get_vote(
        &self,
        action_id: &str,
        action_type: &str,
    ) -> ActionResponse<VoteStatus> {
        let result = async {
            let mut fields = FieldErrors::new();
            let Some(target) = parse_target(action_id, action_type, &mut fields) else {
                return Err(EngineError::validation(fields));
            };
            let voter = self.caller().await?;
            self.votes.get_vote(voter, target).await
        }
        .await;
        respond("get_vote", result)
    }

    /// Saves a question to the caller's collection, or removes it.
    pub async fn toggle_save_question(
        &self,
        question_id: &str,
    ) -> ActionResponse<BookmarkOutcome> {
        let result = async {
            let question = parse_question_id(question_id)?;
            let user = self.caller().await?;
            self.bookmarks.toggle_bookmark(user, question).await
        }
        .await;
        respond("toggle_save_question", result)
    }

    /// Reports whether the caller has saved a question.
    pub async fn get_saved_question(
        &self,
        question_id: &str,
    ) -> ActionResponse<BookmarkOutcome> {
        let result = async {
            let question = parse_question_id(question_id)?;
            let user = self.caller().await?;
            let saved = self.bookmarks.is_bookmarked(user, question).await?;
            Ok::<_, EngineError>(BookmarkOutcome { saved })
        }
        .await;
        respond("get_saved_question", result)
    }

    async fn caller(&self) -> Result<UserId, EngineError> {
        self.identity
            .current_caller()
            .await
            .ok_or(EngineError::Unauthorized)
    }
}

fn respond<T>(action: &'static str, result: Result<T, EngineError>) -> ActionResponse<T> {
    match result {
        Ok(data) => ActionResponse::ok(data),
        Err(e) => reject(action, e),
    }
}

fn reject<T>(action: &'static str, e: EngineError) -> ActionResponse<T> {
    let status = e.status_code();
    if status >= 500 {
        error!(action, status, error = %e, "Action failed");
    } else {
        debug!(action, status, error = %e, "Action rejected");
    }
    ActionResponse::failure(&e)
}

fn parse_target(action_id: &str, action_type: &str, fields: &mut FieldErrors) -> Option<Target> {
    let id = parse_id("actionId", "Action ID", action_id, fields);
    let kind =
        parse_field::<TargetKind>("actionType", action_type, "Invalid action type.", fields);
    Some(Target::new(id?, kind?))
}

fn parse_question_id(question_id: &str) -> Result<ContentId, EngineError> {
    let mut fields = FieldErrors::new();
    parse_id("questionId", "Question ID", question_id, &mut fields)
        .ok_or_else(|| EngineError::validation(fields))
}

fn parse_id(field: &str, label: &str, value: &str, fields: &mut FieldErrors) -> Option<ContentId> {
    if value.trim().is_empty() {
        push(fields, field, format!("{label} is required."));
        return None;
    }
    match value.parse() {
        Ok(id) => Some(id),
        Err(_) => {
            push(fields, field, format!("{label} is invalid."));
            None
        }
    }
}

fn parse_field<T: std::str::FromStr>(
    field: &str,
    value: &str,
    message: &str,
    fields: &mut FieldErrors,
) -> Option<T> {
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            push(fields, field, message.to_string());
            None
        }
    }
}

fn push(fields: &mut FieldErrors, field: &str, message: String) {
    fields.entry(field.to_string()).or_default().push(message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_target_collects_every_field() {
        let mut fields = FieldErrors::new();
        assert!(parse_target("", "comment", &mut fields).is_none());
        assert_eq!(fields["actionId"], vec!["Action ID is required."]);
        assert_eq!(fields["actionType"], vec!["Invalid action type."]);
    }

    #[test]
    fn test_parse_target_rejects_malformed_id() {
        let mut fields = FieldErrors::new();
        assert!(parse_target("not-a-uuid", "answer", &mut fields).is_none());
        assert_eq!(fields["actionId"], vec!["Action ID is invalid."]);
        assert!(!fields.contains_key("actionType"));
    }

    #[test]
    fn test_parse_target_resolves_kind() {
        let mut fields = FieldErrors::new();
        let id = ContentId::new_v4();
        let target = parse_target(&id.to_string(), "answer", &mut fields).unwrap();
        assert_eq!(target, Target::answer(id));
        assert!(fields.is_empty());
    }

    #[test]
    fn test_rejection_carries_public_message() {
        let response: ActionResponse = reject("cast_vote", EngineError::Unauthorized);
        assert!(!response.success);
        assert!(response.data.is_none());
        assert_eq!(response.error.unwrap().message, "Unauthorized");
    }

    #[test]
    fn test_question_id_is_required() {
        let err = parse_question_id("  ").unwrap_err();
        assert_eq!(err.to_string(), "Question ID is required.");
    }
}
