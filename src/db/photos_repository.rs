// src/db/photos_repository.rs
// DOCUMENTATION: Photo persistence - all SQL queries for photos
// PURPOSE: Abstract photo storage from business logic

use crate::errors::PhotoShareError;
use crate::models::{Photo, PhotoImage};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Storage abstraction for photos
/// DOCUMENTATION: Implemented by the Postgres store and by the in-memory
/// demo store; services only ever see this trait
#[async_trait]
pub trait PhotosRepository: Send + Sync {
    async fn create(&self, photo: &Photo, image: &PhotoImage) -> Result<Photo, PhotoShareError>;

    async fn find(&self, id: Uuid) -> Result<Option<Photo>, PhotoShareError>;

    async fn find_with_image(
        &self,
        id: Uuid,
    ) -> Result<Option<(Photo, PhotoImage)>, PhotoShareError>;

    async fn get_image(&self, id: Uuid) -> Result<Option<PhotoImage>, PhotoShareError>;

    /// Page of photos ordered by creation date descending
    async fn get_photos(&self, start_index: i64, amount: i64)
        -> Result<Vec<Photo>, PhotoShareError>;

    async fn count(&self) -> Result<i64, PhotoShareError>;

    async fn update(&self, photo: &Photo) -> Result<Photo, PhotoShareError>;

    /// Remove a photo, returning the removed record (None when unknown)
    async fn remove(&self, id: Uuid) -> Result<Option<Photo>, PhotoShareError>;
}

/// Internal struct for mapping joined photo + image rows
#[derive(Debug, FromRow)]
struct PhotoWithImageRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_date: DateTime<Utc>,
    pub user_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image: Vec<u8>,
    pub image_mime_type: String,
}

impl PhotoWithImageRow {
    fn split(self) -> (Photo, PhotoImage) {
        (
            Photo {
                id: self.id,
                title: self.title,
                description: self.description,
                created_date: self.created_date,
                user_name: self.user_name,
                latitude: self.latitude,
                longitude: self.longitude,
            },
            PhotoImage {
                id: self.id,
                image: self.image,
                image_mime_type: self.image_mime_type,
            },
        )
    }
}

/// PostgreSQL-backed photo store
/// DOCUMENTATION: Uses query_as for type-safe SQL queries
/// Image bytes are written in the same transaction as the metadata
pub struct PostgresPhotosRepository {
    pool: PgPool,
}

impl PostgresPhotosRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PhotosRepository for PostgresPhotosRepository {
    async fn create(&self, photo: &Photo, image: &PhotoImage) -> Result<Photo, PhotoShareError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            log::error!("Failed to open transaction: {}", e);
            PhotoShareError::DatabaseError(e.to_string())
        })?;

        sqlx::query(
            r#"
            INSERT INTO photos (id, title, description, created_date, user_name, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(photo.id)
        .bind(&photo.title)
        .bind(&photo.description)
        .bind(photo.created_date)
        .bind(&photo.user_name)
        .bind(photo.latitude)
        .bind(photo.longitude)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            log::error!("Failed to create photo: {}", e);
            PhotoShareError::DatabaseError(e.to_string())
        })?;

        sqlx::query(
            r#"
            INSERT INTO photo_images (id, image, image_mime_type)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(image.id)
        .bind(&image.image)
        .bind(&image.image_mime_type)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            log::error!("Failed to store image for photo {}: {}", photo.id, e);
            PhotoShareError::DatabaseError(e.to_string())
        })?;

        tx.commit().await.map_err(|e| {
            log::error!("Failed to commit photo {}: {}", photo.id, e);
            PhotoShareError::DatabaseError(e.to_string())
        })?;

        log::info!("Created photo with id: {}", photo.id);
        Ok(photo.clone())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Photo>, PhotoShareError> {
        sqlx::query_as::<_, Photo>(
            r#"
            SELECT id, title, description, created_date, user_name, latitude, longitude
            FROM photos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Database error fetching photo {}: {}", id, e);
            PhotoShareError::DatabaseError(e.to_string())
        })
    }

    async fn find_with_image(
        &self,
        id: Uuid,
    ) -> Result<Option<(Photo, PhotoImage)>, PhotoShareError> {
        let row = sqlx::query_as::<_, PhotoWithImageRow>(
            r#"
            SELECT p.id, p.title, p.description, p.created_date, p.user_name,
                   p.latitude, p.longitude,
                   i.image, i.image_mime_type
            FROM photos p
            JOIN photo_images i ON i.id = p.id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Database error fetching photo {} with image: {}", id, e);
            PhotoShareError::DatabaseError(e.to_string())
        })?;

        Ok(row.map(PhotoWithImageRow::split))
    }

    async fn get_image(&self, id: Uuid) -> Result<Option<PhotoImage>, PhotoShareError> {
        sqlx::query_as::<_, PhotoImage>(
            r#"
            SELECT id, image, image_mime_type
            FROM photo_images
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Database error fetching image {}: {}", id, e);
            PhotoShareError::DatabaseError(e.to_string())
        })
    }

    async fn get_photos(
        &self,
        start_index: i64,
        amount: i64,
    ) -> Result<Vec<Photo>, PhotoShareError> {
        sqlx::query_as::<_, Photo>(
            r#"
            SELECT id, title, description, created_date, user_name, latitude, longitude
            FROM photos
            ORDER BY created_date DESC
            OFFSET $1 LIMIT $2
            "#,
        )
        .bind(start_index)
        .bind(amount)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Database error listing photos: {}", e);
            PhotoShareError::DatabaseError(e.to_string())
        })
    }

    async fn count(&self) -> Result<i64, PhotoShareError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM photos")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                log::error!("Database error counting photos: {}", e);
                PhotoShareError::DatabaseError(e.to_string())
            })?;

        Ok(count.0)
    }

    async fn update(&self, photo: &Photo) -> Result<Photo, PhotoShareError> {
        let updated = sqlx::query_as::<_, Photo>(
            r#"
            UPDATE photos
            SET title = $1,
                description = $2,
                latitude = $3,
                longitude = $4
            WHERE id = $5
            RETURNING id, title, description, created_date, user_name, latitude, longitude
            "#,
        )
        .bind(&photo.title)
        .bind(&photo.description)
        .bind(photo.latitude)
        .bind(photo.longitude)
        .bind(photo.id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Update failed for photo {}: {}", photo.id, e);
            PhotoShareError::DatabaseError(e.to_string())
        })?;

        log::info!("Updated photo: {}", photo.id);
        Ok(updated)
    }

    async fn remove(&self, id: Uuid) -> Result<Option<Photo>, PhotoShareError> {
        // Image and comment rows go with the photo via ON DELETE CASCADE
        let removed = sqlx::query_as::<_, Photo>(
            r#"
            DELETE FROM photos
            WHERE id = $1
            RETURNING id, title, description, created_date, user_name, latitude, longitude
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            log::error!("Delete failed for photo {}: {}", id, e);
            PhotoShareError::DatabaseError(e.to_string())
        })?;

        if removed.is_some() {
            log::info!("Deleted photo: {}", id);
        }
        Ok(removed)
    }
}
