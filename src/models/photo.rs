// src/models/photo.rs
// DOCUMENTATION: Core data structures for photos
// PURPOSE: Defines all serialization/deserialization models for API and database

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A shared photo, without its image payload
/// DOCUMENTATION: Maps directly to the photos table
/// Image bytes live in a separate PhotoImage record keyed by the same id
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Photo {
    /// Unique identifier (UUID v4)
    pub id: Uuid,

    /// Photo title - required field
    pub title: String,

    /// Optional detailed description
    pub description: Option<String>,

    /// When the photo was uploaded (assigned by the service)
    pub created_date: DateTime<Utc>,

    /// Owning user (assigned by the service from the authenticated identity)
    pub user_name: String,

    /// Optional geographic coordinates of where the photo was taken
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Image payload for a photo, stored separately from the metadata
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PhotoImage {
    /// Same id as the owning Photo
    pub id: Uuid,

    /// Raw image bytes
    pub image: Vec<u8>,

    /// MIME type of the image (e.g. "image/jpeg")
    pub image_mime_type: String,
}

/// Request DTO for uploading a new photo
/// DOCUMENTATION: Data transfer object for POST /photos
/// The owner and creation date are never taken from this body
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UploadPhotoRequest {
    /// Photo title (required)
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Image bytes (required, non-empty)
    #[validate(length(min = 1, message = "image must not be empty"))]
    pub image: Vec<u8>,

    /// MIME type of the uploaded image; guessed from file_name when absent
    pub image_mime_type: Option<String>,

    /// Original file name, used to guess the MIME type when none is given
    #[serde(default)]
    pub file_name: Option<String>,

    /// Optional geographic coordinates
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Request DTO for updating an existing photo
/// DOCUMENTATION: Only the mutable fields - owner, creation date and image
/// are fixed at upload time
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdatePhotoRequest {
    pub id: Uuid,

    #[validate(length(min = 1, max = 255))]
    pub title: String,

    pub description: Option<String>,

    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

/// Response DTO for API responses
/// DOCUMENTATION: Photo metadata with a link to the image instead of the bytes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoResponse {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_date: DateTime<Utc>,
    pub user_name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    /// URL where the image bytes can be fetched
    pub image_url: String,
}

/// Response DTO with the image embedded
/// DOCUMENTATION: Used by GET /photos/withimage/{id}
#[derive(Debug, Serialize)]
pub struct PhotoWithImageResponse {
    #[serde(flatten)]
    pub photo: PhotoResponse,
    pub image: Vec<u8>,
    pub image_mime_type: String,
}

/// Reverse-geocoded location of a photo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoLocationResponse {
    pub id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl Photo {
    /// Convert Photo to PhotoResponse for the API
    pub fn to_response(&self) -> PhotoResponse {
        PhotoResponse {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            created_date: self.created_date,
            user_name: self.user_name.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            image_url: format!("/api/photos/image/{}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> UploadPhotoRequest {
        UploadPhotoRequest {
            title: "Sunset over the bay".to_string(),
            description: None,
            image: vec![0xFF, 0xD8, 0xFF],
            image_mime_type: Some("image/jpeg".to_string()),
            file_name: None,
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn accepts_valid_upload_request() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn rejects_empty_title() {
        let mut req = valid_request();
        req.title = String::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_title_over_255_chars() {
        let mut req = valid_request();
        req.title = "x".repeat(256);
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_empty_image() {
        let mut req = valid_request();
        req.image = Vec::new();
        assert!(req.validate().is_err());
    }

    #[test]
    fn response_links_to_image_endpoint() {
        let photo = Photo {
            id: Uuid::new_v4(),
            title: "Pier".to_string(),
            description: None,
            created_date: Utc::now(),
            user_name: "alice".to_string(),
            latitude: None,
            longitude: None,
        };
        let response = photo.to_response();
        assert_eq!(response.image_url, format!("/api/photos/image/{}", photo.id));
    }
}
