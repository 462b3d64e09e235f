// src/services/photos_service.rs
// DOCUMENTATION: Business logic for photos
// PURPOSE: Intermediary between handlers and repository, applies
// authorization and validation before touching storage

use crate::db::PhotosRepository;
use crate::errors::PhotoShareError;
use crate::models::{
    CurrentUser, Photo, PhotoImage, UpdatePhotoRequest, UploadPhotoRequest,
};
use crate::services::authorization;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

pub struct PhotosService {
    repository: Arc<dyn PhotosRepository>,
}

impl PhotosService {
    pub fn new(repository: Arc<dyn PhotosRepository>) -> Self {
        Self { repository }
    }

    /// Upload a new photo
    /// DOCUMENTATION: Owner and creation date come from the authenticated
    /// identity and the clock, never from the request body
    pub async fn upload(
        &self,
        user: Option<&CurrentUser>,
        req: UploadPhotoRequest,
    ) -> Result<Photo, PhotoShareError> {
        let user = authorization::require_authenticated(user)?;
        req.validate()?;
        let image_mime_type = resolve_image_mime_type(&req)?;

        let id = Uuid::new_v4();
        let photo = Photo {
            id,
            title: req.title,
            description: req.description,
            created_date: Utc::now(),
            user_name: user.name.clone(),
            latitude: req.latitude,
            longitude: req.longitude,
        };
        let image = PhotoImage {
            id,
            image: req.image,
            image_mime_type,
        };

        self.repository.create(&photo, &image).await
    }

    pub async fn find(&self, id: Uuid) -> Result<Photo, PhotoShareError> {
        self.repository
            .find(id)
            .await?
            .ok_or_else(|| PhotoShareError::NotFound(format!("Photo {}", id)))
    }

    pub async fn find_with_image(
        &self,
        id: Uuid,
    ) -> Result<(Photo, PhotoImage), PhotoShareError> {
        self.repository
            .find_with_image(id)
            .await?
            .ok_or_else(|| PhotoShareError::NotFound(format!("Photo {}", id)))
    }

    pub async fn get_image(&self, id: Uuid) -> Result<PhotoImage, PhotoShareError> {
        self.repository
            .get_image(id)
            .await?
            .ok_or_else(|| PhotoShareError::NotFound(format!("Image for photo {}", id)))
    }

    /// Page of photos, newest first
    pub async fn get_photos(
        &self,
        start_index: Option<i64>,
        amount: Option<i64>,
    ) -> Result<Vec<Photo>, PhotoShareError> {
        let start_index = start_index.unwrap_or(0).max(0);
        let amount = amount
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        self.repository.get_photos(start_index, amount).await
    }

    pub async fn count(&self) -> Result<i64, PhotoShareError> {
        self.repository.count().await
    }

    /// Update a photo's mutable fields
    /// DOCUMENTATION: Authorization is checked against the STORED record's
    /// owner, not against anything the caller sent
    pub async fn update(
        &self,
        user: Option<&CurrentUser>,
        req: UpdatePhotoRequest,
    ) -> Result<Photo, PhotoShareError> {
        let user = authorization::require_authenticated(user)?;
        let stored = self.find(req.id).await?;

        if !authorization::item_may_be_updated(user, &stored.user_name) {
            return Err(PhotoShareError::UnauthorizedEdit(format!(
                "Photo {}",
                stored.id
            )));
        }

        req.validate()?;

        let updated = Photo {
            title: req.title,
            description: req.description,
            latitude: req.latitude,
            longitude: req.longitude,
            ..stored
        };
        self.repository.update(&updated).await
    }

    /// Remove a photo, returning the removed record
    pub async fn remove(
        &self,
        user: Option<&CurrentUser>,
        id: Uuid,
    ) -> Result<Photo, PhotoShareError> {
        let user = authorization::require_authenticated(user)?;
        let stored = self.find(id).await?;

        if !authorization::item_may_be_deleted(user, &stored.user_name) {
            return Err(PhotoShareError::UnauthorizedDelete(format!(
                "Photo {}",
                stored.id
            )));
        }

        self.repository
            .remove(id)
            .await?
            .ok_or_else(|| PhotoShareError::NotFound(format!("Photo {}", id)))
    }
}

/// Determine the MIME type of an upload
/// DOCUMENTATION: An explicit type wins; otherwise it is guessed from the
/// file name. Anything that is not an image type is rejected
fn resolve_image_mime_type(req: &UploadPhotoRequest) -> Result<String, PhotoShareError> {
    let mime = match &req.image_mime_type {
        Some(mime) => mime.clone(),
        None => req
            .file_name
            .as_deref()
            .and_then(|name| mime_guess::from_path(name).first_raw())
            .map(|mime| mime.to_string())
            .ok_or_else(|| {
                PhotoShareError::ValidationError(
                    "image MIME type is missing and could not be guessed".to_string(),
                )
            })?,
    };

    if mime.starts_with("image/") {
        Ok(mime)
    } else {
        Err(PhotoShareError::ValidationError(format!(
            "'{}' is not an image MIME type",
            mime
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryPhotosRepository;

    fn service() -> PhotosService {
        PhotosService::new(Arc::new(MemoryPhotosRepository::new()))
    }

    fn upload_request(title: &str) -> UploadPhotoRequest {
        UploadPhotoRequest {
            title: title.to_string(),
            description: Some("taken at dusk".to_string()),
            image: vec![0xFF, 0xD8],
            image_mime_type: Some("image/jpeg".to_string()),
            file_name: None,
            latitude: None,
            longitude: None,
        }
    }

    #[tokio::test]
    async fn upload_stamps_owner_and_creation_date() {
        let service = service();
        let alice = CurrentUser::new("alice");
        let before = Utc::now();

        let photo = service
            .upload(Some(&alice), upload_request("Harbor"))
            .await
            .unwrap();

        assert_eq!(photo.user_name, "alice");
        assert!(photo.created_date >= before);
        assert!(photo.created_date <= Utc::now());
    }

    #[tokio::test]
    async fn anonymous_upload_is_rejected() {
        let service = service();
        let result = service.upload(None, upload_request("Harbor")).await;
        assert!(matches!(result, Err(PhotoShareError::Unauthorized)));
    }

    #[tokio::test]
    async fn upload_with_empty_title_fails_validation() {
        let service = service();
        let alice = CurrentUser::new("alice");
        let result = service.upload(Some(&alice), upload_request("")).await;
        assert!(matches!(result, Err(PhotoShareError::ValidationError(_))));
    }

    #[tokio::test]
    async fn mime_type_is_guessed_from_file_name() {
        let service = service();
        let alice = CurrentUser::new("alice");
        let mut req = upload_request("Harbor");
        req.image_mime_type = None;
        req.file_name = Some("harbor.png".to_string());

        let photo = service.upload(Some(&alice), req).await.unwrap();
        let image = service.get_image(photo.id).await.unwrap();
        assert_eq!(image.image_mime_type, "image/png");
    }

    #[tokio::test]
    async fn non_image_mime_type_is_rejected() {
        let service = service();
        let alice = CurrentUser::new("alice");
        let mut req = upload_request("Harbor");
        req.image_mime_type = Some("application/pdf".to_string());

        let result = service.upload(Some(&alice), req).await;
        assert!(matches!(result, Err(PhotoShareError::ValidationError(_))));
    }

    #[tokio::test]
    async fn non_owner_cannot_update() {
        let service = service();
        let alice = CurrentUser::new("alice");
        let bob = CurrentUser::new("bob");

        let photo = service
            .upload(Some(&alice), upload_request("Harbor"))
            .await
            .unwrap();

        let result = service
            .update(
                Some(&bob),
                UpdatePhotoRequest {
                    id: photo.id,
                    title: "Defaced".to_string(),
                    description: None,
                    latitude: None,
                    longitude: None,
                },
            )
            .await;

        assert!(matches!(result, Err(PhotoShareError::UnauthorizedEdit(_))));
    }

    #[tokio::test]
    async fn owner_can_update_title_but_not_ownership() {
        let service = service();
        let alice = CurrentUser::new("alice");

        let photo = service
            .upload(Some(&alice), upload_request("Harbor"))
            .await
            .unwrap();

        let updated = service
            .update(
                Some(&alice),
                UpdatePhotoRequest {
                    id: photo.id,
                    title: "Harbor at night".to_string(),
                    description: photo.description.clone(),
                    latitude: Some(43.3),
                    longitude: Some(-2.0),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Harbor at night");
        assert_eq!(updated.user_name, "alice");
        assert_eq!(updated.created_date, photo.created_date);
    }

    #[tokio::test]
    async fn non_owner_cannot_delete() {
        let service = service();
        let alice = CurrentUser::new("alice");
        let bob = CurrentUser::new("bob");

        let photo = service
            .upload(Some(&alice), upload_request("Harbor"))
            .await
            .unwrap();

        let result = service.remove(Some(&bob), photo.id).await;
        assert!(matches!(
            result,
            Err(PhotoShareError::UnauthorizedDelete(_))
        ));

        // Still there for its owner
        assert!(service.find(photo.id).await.is_ok());
    }

    #[tokio::test]
    async fn owner_delete_returns_the_removed_photo() {
        let service = service();
        let alice = CurrentUser::new("alice");

        let photo = service
            .upload(Some(&alice), upload_request("Harbor"))
            .await
            .unwrap();

        let removed = service.remove(Some(&alice), photo.id).await.unwrap();
        assert_eq!(removed.id, photo.id);
        assert!(matches!(
            service.find(photo.id).await,
            Err(PhotoShareError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn operations_on_unknown_ids_are_not_found() {
        let service = service();
        let alice = CurrentUser::new("alice");
        let missing = Uuid::new_v4();

        assert!(matches!(
            service.find(missing).await,
            Err(PhotoShareError::NotFound(_))
        ));
        assert!(matches!(
            service.remove(Some(&alice), missing).await,
            Err(PhotoShareError::NotFound(_))
        ));
        assert!(matches!(
            service.get_image(missing).await,
            Err(PhotoShareError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn page_size_is_clamped() {
        let service = service();
        let alice = CurrentUser::new("alice");
        for i in 0..3 {
            service
                .upload(Some(&alice), upload_request(&format!("photo {}", i)))
                .await
                .unwrap();
        }

        let photos = service.get_photos(None, Some(1000)).await.unwrap();
        assert_eq!(photos.len(), 3);
        assert_eq!(service.count().await.unwrap(), 3);
    }
}
