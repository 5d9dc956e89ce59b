//! Domain DTOs for the items API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently.
//! Integration tests catch any schema drift between the two crates.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// A single content entry returned by `GET /users/{id}/items`.
///
/// Fields the service sends beyond these three are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub likes_count: u64,
}

/// Classified result of a user-items response.
///
/// Every status the client distinguishes has its own case, so matching on
/// this forces each one to be handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemsOutcome {
    Items(Vec<Item>),
    InvalidParameters,
    UserNotFound(String),
    UnexpectedStatus(u16),
}

impl ItemsOutcome {
    pub fn into_result(self) -> Result<Vec<Item>, ApiError> {
        match self {
            ItemsOutcome::Items(items) => Ok(items),
            ItemsOutcome::InvalidParameters => Err(ApiError::InvalidParameters),
            ItemsOutcome::UserNotFound(user_id) => Err(ApiError::UserNotFound { user_id }),
            ItemsOutcome::UnexpectedStatus(status) => Err(ApiError::UnexpectedStatus { status }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_ignores_unknown_fields() {
        let item: Item = serde_json::from_str(
            r#"{"id":"abc","title":"タイトル","likes_count":4,"private":false}"#,
        )
        .unwrap();
        assert_eq!(item.title, "タイトル");
        assert_eq!(item.likes_count, 4);
    }

    #[test]
    fn item_rejects_negative_likes() {
        let result: Result<Item, _> =
            serde_json::from_str(r#"{"id":"abc","title":"t","likes_count":-1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn outcome_into_result_maps_each_case() {
        assert!(ItemsOutcome::Items(Vec::new()).into_result().unwrap().is_empty());
        assert!(matches!(
            ItemsOutcome::InvalidParameters.into_result(),
            Err(ApiError::InvalidParameters)
        ));
        assert!(matches!(
            ItemsOutcome::UserNotFound("ghost".to_string()).into_result(),
            Err(ApiError::UserNotFound { user_id }) if user_id == "ghost"
        ));
        assert!(matches!(
            ItemsOutcome::UnexpectedStatus(502).into_result(),
            Err(ApiError::UnexpectedStatus { status: 502 })
        ));
    }
}
