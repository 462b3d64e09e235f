// src/services/comments_service.rs
// DOCUMENTATION: Business logic for comments
// PURPOSE: Shared by the REST handlers and the Commenter gRPC service

use crate::db::CommentsRepository;
use crate::errors::PhotoShareError;
use crate::models::{Comment, CreateCommentRequest, CurrentUser, UpdateCommentRequest};
use crate::services::authorization;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub struct CommentsService {
    repository: Arc<dyn CommentsRepository>,
}

impl CommentsService {
    pub fn new(repository: Arc<dyn CommentsRepository>) -> Self {
        Self { repository }
    }

    /// Attach a new comment to a photo
    pub async fn create(
        &self,
        user: Option<&CurrentUser>,
        req: CreateCommentRequest,
    ) -> Result<Comment, PhotoShareError> {
        let user = authorization::require_authenticated(user)?;
        req.validate()?;

        let comment = Comment {
            id: Uuid::new_v4(),
            photo_id: req.photo_id,
            user_name: user.name.clone(),
            subject: req.subject,
            body: req.body,
            submitted_on: Utc::now(),
        };

        self.repository.create(&comment).await
    }

    pub async fn find(&self, id: Uuid) -> Result<Comment, PhotoShareError> {
        self.repository
            .find(id)
            .await?
            .ok_or_else(|| PhotoShareError::NotFound(format!("Comment {}", id)))
    }

    /// Comments for a photo, newest first
    pub async fn get_comments_for_photo(
        &self,
        photo_id: Uuid,
    ) -> Result<Vec<Comment>, PhotoShareError> {
        self.repository.get_comments_for_photo(photo_id).await
    }

    /// Edit a comment's subject and body
    /// DOCUMENTATION: Authorization is checked against the stored record's
    /// owner; the submission date is refreshed on every edit
    pub async fn update(
        &self,
        user: Option<&CurrentUser>,
        req: UpdateCommentRequest,
    ) -> Result<Comment, PhotoShareError> {
        let user = authorization::require_authenticated(user)?;
        let stored = self.find(req.id).await?;

        if !authorization::item_may_be_updated(user, &stored.user_name) {
            return Err(PhotoShareError::UnauthorizedEdit(format!(
                "Comment {}",
                stored.id
            )));
        }

        req.validate()?;

        let updated = Comment {
            subject: req.subject,
            body: req.body,
            submitted_on: Utc::now(),
            ..stored
        };
        self.repository.update(&updated).await
    }

    /// Remove a comment, returning the removed record
    pub async fn remove(
        &self,
        user: Option<&CurrentUser>,
        id: Uuid,
    ) -> Result<Comment, PhotoShareError> {
        let user = authorization::require_authenticated(user)?;
        let stored = self.find(id).await?;

        if !authorization::item_may_be_deleted(user, &stored.user_name) {
            return Err(PhotoShareError::UnauthorizedDelete(format!(
                "Comment {}",
                stored.id
            )));
        }

        self.repository
            .remove(id)
            .await?
            .ok_or_else(|| PhotoShareError::NotFound(format!("Comment {}", id)))
    }
}
