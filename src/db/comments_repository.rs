// src/db/comments_repository.rs
// DOCUMENTATION: Comment persistence - all SQL queries for comments
// PURPOSE: Abstract comment storage from business logic

use crate::errors::PhotoShareError;
use crate::models::Comment;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// Storage abstraction for comments
#[async_trait]
pub trait CommentsRepository: Send + Sync {
    async fn create(&self, comment: &Comment) -> Result<Comment, PhotoShareError>;

    async fn find(&self, id: Uuid) -> Result<Option<Comment>, PhotoShareError>;

    /// Comments for a photo ordered by submission date descending
    async fn get_comments_for_photo(
        &self,
        photo_id: Uuid,
    ) -> Result<Vec<Comment>, PhotoShareError>;

    async fn update(&self, comment: &Comment) -> Result<Comment, PhotoShareError>;

    /// Remove a comment, returning the removed record (None when unknown)
    async fn remove(&self, id: Uuid) -> Result<Option<Comment>, PhotoShareError>;
}

/// PostgreSQL-backed comment store
pub struct PostgresCommentsRepository {
    pool: PgPool,
}

impl PostgresCommentsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentsRepository for PostgresCommentsRepository {
    async fn create(&self, comment: &Comment) -> Result<Comment, PhotoShareError> {
        let created = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, photo_id, user_name, subject, body, submitted_on)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, photo_id, user_name, subject, body, submitted_on
            "#,
        )
        .bind(comment.id)
        .bind(comment.photo_id)
        .bind(&comment.user_name)
        .bind(&comment.subject)
        .bind(&comment.body)
        .bind(comment.submitted_on)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create comment: {}", e);
            PhotoShareError::DatabaseError(e.to_string())
        })?;

        log::info!(
            "Created comment {} on photo {}",
            created.id,
            created.photo_id
        );
        Ok(created)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Comment>, PhotoShareError> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, photo_id, user_name, subject, body, submitted_on
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Database error fetching comment {}: {}", id, e);
            PhotoShareError::DatabaseError(e.to_string())
        })
    }

    async fn get_comments_for_photo(
        &self,
        photo_id: Uuid,
    ) -> Result<Vec<Comment>, PhotoShareError> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, photo_id, user_name, subject, body, submitted_on
            FROM comments
            WHERE photo_id = $1
            ORDER BY submitted_on DESC
            "#,
        )
        .bind(photo_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Database error fetching comments for photo {}: {}", photo_id, e);
            PhotoShareError::DatabaseError(e.to_string())
        })
    }

    async fn update(&self, comment: &Comment) -> Result<Comment, PhotoShareError> {
        let updated = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET subject = $1,
                body = $2,
                submitted_on = $3
            WHERE id = $4
            RETURNING id, photo_id, user_name, subject, body, submitted_on
            "#,
        )
        .bind(&comment.subject)
        .bind(&comment.body)
        .bind(comment.submitted_on)
        .bind(comment.id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Update failed for comment {}: {}", comment.id, e);
            PhotoShareError::DatabaseError(e.to_string())
        })?;

        log::info!("Updated comment: {}", comment.id);
        Ok(updated)
    }

    async fn remove(&self, id: Uuid) -> Result<Option<Comment>, PhotoShareError> {
        let removed = sqlx::query_as::<_, Comment>(
            r#"
            DELETE FROM comments
            WHERE id = $1
            RETURNING id, photo_id, user_name, subject, body, submitted_on
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Delete failed for comment {}: {}", id, e);
            PhotoShareError::DatabaseError(e.to_string())
        })?;

        if removed.is_some() {
            log::info!("Deleted comment: {}", id);
        }
        Ok(removed)
    }
}
