//! The response envelope returned across the outer-layer boundary.
use crate::errors::{EngineError, FieldErrors};
use serde::Serialize;

/// Error part of an [`ActionResponse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<FieldErrors>,
}

/// Outcome of an action as seen by the outer layer.
///
/// Serializes to `{"success": bool, "data"?: T, "error"?: {"message", "details"?}}`
/// with absent parts omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResponse<T = ()> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl ActionResponse<()> {
    pub fn done() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }
}

impl<T> ActionResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: &EngineError) -> Self {
        let details = match error {
            EngineError::Validation { details, .. } => Some(details.clone()),
            _ => None,
        };
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody {
                message: error.public_message(),
                details,
            }),
        }
    }
}

impl<T: Serialize> ActionResponse<T> {
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_omits_absent_parts() {
        let json = ActionResponse::done().to_json().unwrap();
        assert_eq!(json, json!({ "success": true }));
    }

    #[test]
    fn test_validation_failure_carries_details() {
        let mut details = FieldErrors::new();
        details.insert("actionType".into(), vec!["Invalid action type.".into()]);
        let response = ActionResponse::<()>::failure(&EngineError::validation(details));
        assert_eq!(
            response.to_json().unwrap(),
            json!({
                "success": false,
                "error": {
                    "message": "Invalid action type.",
                    "details": { "actionType": ["Invalid action type."] }
                }
            })
        );
    }

    #[test]
    fn test_failure_without_details() {
        let response = ActionResponse::<()>::failure(&EngineError::not_found("Question"));
        assert_eq!(
            response.to_json().unwrap(),
            json!({ "success": false, "error": { "message": "Question not found" } })
        );
    }
}
