//! The string-typed facade and its JSON responses.

mod common;

use common::Harness;
use reputation_engine::StaticIdentity;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_cast_vote_success_response() {
    let h = Harness::new();
    let author = h.user().await;
    let voter = h.user().await;
    let question = h.question_by(author).await;
    let actions = h.actions_for(Some(voter));

    let response = actions
        .cast_vote(&question.id.to_string(), "question", "upvote")
        .await;

    assert_eq!(response.to_json().unwrap(), json!({ "success": true }));
    assert_eq!(h.counters(question).await, (1, 0));

    let status = actions.get_vote(&question.id.to_string(), "question").await;
    assert_eq!(
        status.to_json().unwrap(),
        json!({ "success": true, "data": { "upvoted": true, "downvoted": false } })
    );
}

#[tokio::test]
async fn test_invalid_input_reports_every_field() {
    let h = Harness::new();
    let voter = h.user().await;
    let actions = h.actions_for(Some(voter));

    let response = actions.cast_vote("", "comment", "sideways").await;

    assert_eq!(
        response.to_json().unwrap(),
        json!({
            "success": false,
            "error": {
                "message": "Action ID is required., Invalid action type., Invalid vote type.",
                "details": {
                    "actionId": ["Action ID is required."],
                    "actionType": ["Invalid action type."],
                    "voteType": ["Invalid vote type."]
                }
            }
        })
    );
}

#[tokio::test]
async fn test_anonymous_caller_is_rejected_before_any_write() {
    let h = Harness::new();
    let author = h.user().await;
    let question = h.question_by(author).await;
    let actions = h.actions_for(None);

    let response = actions
        .cast_vote(&question.id.to_string(), "question", "downvote")
        .await;

    assert_eq!(
        response.to_json().unwrap(),
        json!({ "success": false, "error": { "message": "Unauthorized" } })
    );
    assert_eq!(h.counters(question).await, (0, 0));
    assert!(h.store.votes().await.is_empty());
}

#[tokio::test]
async fn test_validation_precedes_identity_check() {
    let h = Harness::new();
    let actions = h.actions_for(None);

    let response = actions.cast_vote("not-an-id", "answer", "upvote").await;

    let error = response.error.unwrap();
    assert_eq!(error.message, "Action ID is invalid.");
    assert!(error.details.unwrap().contains_key("actionId"));
}

#[tokio::test]
async fn test_vote_on_missing_content_response() {
    let h = Harness::new();
    let voter = h.user().await;
    let actions = h.actions_for(Some(voter));

    let response = actions
        .cast_vote(&uuid::Uuid::new_v4().to_string(), "answer", "upvote")
        .await;

    assert_eq!(
        response.to_json().unwrap(),
        json!({ "success": false, "error": { "message": "Answer not found" } })
    );
}

#[tokio::test]
async fn test_toggle_save_question_responses() {
    let h = Harness::new();
    let author = h.user().await;
    let reader = h.user().await;
    let question = h.question_by(author).await;
    let actions = h.actions_for(Some(reader));
    let id = question.id.to_string();

    let saved = actions.toggle_save_question(&id).await;
    assert_eq!(
        saved.to_json().unwrap(),
        json!({ "success": true, "data": { "saved": true } })
    );
    assert!(actions.get_saved_question(&id).await.data.unwrap().saved);

    let removed = actions.toggle_save_question(&id).await;
    assert!(!removed.data.unwrap().saved);
    assert!(!actions.get_saved_question(&id).await.data.unwrap().saved);
}

#[tokio::test]
async fn test_with_identity_switches_caller() {
    let h = Harness::new();
    let author = h.user().await;
    let first = h.user().await;
    let second = h.user().await;
    let question = h.question_by(author).await;
    let id = question.id.to_string();

    let actions = h.actions_for(Some(first));
    actions.cast_vote(&id, "question", "upvote").await;
    let other = actions.with_identity(Arc::new(StaticIdentity::new(second)));
    other.cast_vote(&id, "question", "upvote").await;

    assert_eq!(h.counters(question).await, (2, 0));
    assert_eq!(h.reputation(author).await, 20);
}
