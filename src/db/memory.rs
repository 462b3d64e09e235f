// src/db/memory.rs
// DOCUMENTATION: In-memory repository implementations
// PURPOSE: Database-free stores for demos and service-level tests

use crate::db::{CommentsRepository, PhotosRepository};
use crate::errors::PhotoShareError;
use crate::models::{Comment, Photo, PhotoImage};
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory photo store
/// DOCUMENTATION: Single-process only; mirrors the observable semantics of
/// the Postgres store, including ordering and cascade on remove
#[derive(Default)]
pub struct MemoryPhotosRepository {
    photos: RwLock<Vec<(Photo, PhotoImage)>>,
}

impl MemoryPhotosRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PhotosRepository for MemoryPhotosRepository {
    async fn create(&self, photo: &Photo, image: &PhotoImage) -> Result<Photo, PhotoShareError> {
        let mut photos = self.photos.write().await;
        photos.push((photo.clone(), image.clone()));
        Ok(photo.clone())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Photo>, PhotoShareError> {
        let photos = self.photos.read().await;
        Ok(photos.iter().find(|(p, _)| p.id == id).map(|(p, _)| p.clone()))
    }

    async fn find_with_image(
        &self,
        id: Uuid,
    ) -> Result<Option<(Photo, PhotoImage)>, PhotoShareError> {
        let photos = self.photos.read().await;
        Ok(photos.iter().find(|(p, _)| p.id == id).cloned())
    }

    async fn get_image(&self, id: Uuid) -> Result<Option<PhotoImage>, PhotoShareError> {
        let photos = self.photos.read().await;
        Ok(photos.iter().find(|(p, _)| p.id == id).map(|(_, i)| i.clone()))
    }

    async fn get_photos(
        &self,
        start_index: i64,
        amount: i64,
    ) -> Result<Vec<Photo>, PhotoShareError> {
        let photos = self.photos.read().await;
        let mut all: Vec<Photo> = photos.iter().map(|(p, _)| p.clone()).collect();
        all.sort_by(|a, b| b.created_date.cmp(&a.created_date));
        Ok(all
            .into_iter()
            .skip(start_index.max(0) as usize)
            .take(amount.max(0) as usize)
            .collect())
    }

    async fn count(&self) -> Result<i64, PhotoShareError> {
        let photos = self.photos.read().await;
        Ok(photos.len() as i64)
    }

    async fn update(&self, photo: &Photo) -> Result<Photo, PhotoShareError> {
        let mut photos = self.photos.write().await;
        match photos.iter_mut().find(|(p, _)| p.id == photo.id) {
            Some((stored, _)) => {
                stored.title = photo.title.clone();
                stored.description = photo.description.clone();
                stored.latitude = photo.latitude;
                stored.longitude = photo.longitude;
                Ok(stored.clone())
            }
            None => Err(PhotoShareError::NotFound(format!("Photo {}", photo.id))),
        }
    }

    async fn remove(&self, id: Uuid) -> Result<Option<Photo>, PhotoShareError> {
        let mut photos = self.photos.write().await;
        match photos.iter().position(|(p, _)| p.id == id) {
            Some(index) => {
                let (photo, _) = photos.remove(index);
                Ok(Some(photo))
            }
            None => Ok(None),
        }
    }
}

/// In-memory comment store
#[derive(Default)]
pub struct MemoryCommentsRepository {
    comments: RwLock<Vec<Comment>>,
}

impl MemoryCommentsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CommentsRepository for MemoryCommentsRepository {
    async fn create(&self, comment: &Comment) -> Result<Comment, PhotoShareError> {
        let mut comments = self.comments.write().await;
        comments.push(comment.clone());
        Ok(comment.clone())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Comment>, PhotoShareError> {
        let comments = self.comments.read().await;
        Ok(comments.iter().find(|c| c.id == id).cloned())
    }

    async fn get_comments_for_photo(
        &self,
        photo_id: Uuid,
    ) -> Result<Vec<Comment>, PhotoShareError> {
        let comments = self.comments.read().await;
        let mut found: Vec<Comment> = comments
            .iter()
            .filter(|c| c.photo_id == photo_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.submitted_on.cmp(&a.submitted_on));
        Ok(found)
    }

    async fn update(&self, comment: &Comment) -> Result<Comment, PhotoShareError> {
        let mut comments = self.comments.write().await;
        match comments.iter_mut().find(|c| c.id == comment.id) {
            Some(stored) => {
                stored.subject = comment.subject.clone();
                stored.body = comment.body.clone();
                stored.submitted_on = comment.submitted_on;
                Ok(stored.clone())
            }
            None => Err(PhotoShareError::NotFound(format!("Comment {}", comment.id))),
        }
    }

    async fn remove(&self, id: Uuid) -> Result<Option<Comment>, PhotoShareError> {
        let mut comments = self.comments.write().await;
        match comments.iter().position(|c| c.id == id) {
            Some(index) => Ok(Some(comments.remove(index))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn photo(title: &str, age_minutes: i64) -> (Photo, PhotoImage) {
        let id = Uuid::new_v4();
        (
            Photo {
                id,
                title: title.to_string(),
                description: None,
                created_date: Utc::now() - Duration::minutes(age_minutes),
                user_name: "alice".to_string(),
                latitude: None,
                longitude: None,
            },
            PhotoImage {
                id,
                image: vec![1, 2, 3],
                image_mime_type: "image/png".to_string(),
            },
        )
    }

    fn comment(photo_id: Uuid, subject: &str, age_minutes: i64) -> Comment {
        Comment {
            id: Uuid::new_v4(),
            photo_id,
            user_name: "bob".to_string(),
            subject: subject.to_string(),
            body: "a body".to_string(),
            submitted_on: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[tokio::test]
    async fn photos_are_listed_newest_first() {
        let repo = MemoryPhotosRepository::new();
        let (old, old_image) = photo("old", 60);
        let (new, new_image) = photo("new", 1);
        repo.create(&old, &old_image).await.unwrap();
        repo.create(&new, &new_image).await.unwrap();

        let listed = repo.get_photos(0, 10).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title, "new");
        assert_eq!(listed[1].title, "old");
    }

    #[tokio::test]
    async fn paging_skips_and_limits() {
        let repo = MemoryPhotosRepository::new();
        for age in [10, 20, 30] {
            let (p, i) = photo(&format!("photo-{}", age), age);
            repo.create(&p, &i).await.unwrap();
        }

        let page = repo.get_photos(1, 1).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].title, "photo-20");
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn find_and_remove_unknown_id_yield_none() {
        let repo = MemoryPhotosRepository::new();
        assert!(repo.find(Uuid::new_v4()).await.unwrap().is_none());
        assert!(repo.remove(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn image_is_stored_and_retrievable() {
        let repo = MemoryPhotosRepository::new();
        let (p, i) = photo("with image", 0);
        repo.create(&p, &i).await.unwrap();

        let image = repo.get_image(p.id).await.unwrap().unwrap();
        assert_eq!(image.image, vec![1, 2, 3]);
        assert_eq!(image.image_mime_type, "image/png");

        let (found, found_image) = repo.find_with_image(p.id).await.unwrap().unwrap();
        assert_eq!(found.id, p.id);
        assert_eq!(found_image.id, p.id);
    }

    #[tokio::test]
    async fn comments_for_photo_are_newest_first_and_scoped() {
        let repo = MemoryCommentsRepository::new();
        let photo_id = Uuid::new_v4();
        repo.create(&comment(photo_id, "older", 30)).await.unwrap();
        repo.create(&comment(photo_id, "newer", 5)).await.unwrap();
        repo.create(&comment(Uuid::new_v4(), "other photo", 1))
            .await
            .unwrap();

        let listed = repo.get_comments_for_photo(photo_id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].subject, "newer");
        assert_eq!(listed[1].subject, "older");
    }

    #[tokio::test]
    async fn update_unknown_comment_is_not_found() {
        let repo = MemoryCommentsRepository::new();
        let result = repo.update(&comment(Uuid::new_v4(), "ghost", 0)).await;
        assert!(matches!(result, Err(PhotoShareError::NotFound(_))));
    }
}
