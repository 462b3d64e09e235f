// src/models/comment.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A comment attached to a photo
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub photo_id: Uuid,
    /// Owning user (assigned by the service from the authenticated identity)
    pub user_name: String,
    pub subject: String,
    pub body: String,
    /// Set at creation and refreshed whenever the comment is edited
    pub submitted_on: DateTime<Utc>,
}

/// Request to attach a new comment to a photo
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCommentRequest {
    pub photo_id: Uuid,

    #[validate(length(min = 1, max = 250))]
    pub subject: String,

    #[validate(length(min = 1))]
    pub body: String,
}

/// Request to edit an existing comment
/// Only subject and body are mutable
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateCommentRequest {
    pub id: Uuid,

    #[validate(length(min = 1, max = 250))]
    pub subject: String,

    #[validate(length(min = 1))]
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateCommentRequest {
        CreateCommentRequest {
            photo_id: Uuid::new_v4(),
            subject: "Nice shot".to_string(),
            body: "Where was this taken?".to_string(),
        }
    }

    #[test]
    fn accepts_valid_comment_request() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn rejects_empty_subject() {
        let mut req = valid_request();
        req.subject = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_subject_over_250_chars() {
        let mut req = valid_request();
        req.subject = "y".repeat(251);
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_empty_body() {
        let mut req = valid_request();
        req.body = String::new();
        assert!(req.validate().is_err());
    }
}
