// src/handlers/photos.rs
// DOCUMENTATION: HTTP handlers for photo operations
// PURPOSE: Parse requests, call services, return responses

use crate::auth::AuthUser;
use crate::errors::PhotoShareError;
use crate::models::{
    PhotoLocationResponse, PhotoResponse, PhotoWithImageResponse, UpdatePhotoRequest,
    UploadPhotoRequest,
};
use crate::services::{GeocodingClient, PhotosService};
use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;
use uuid::Uuid;

/// Paging parameters for GET /photos
#[derive(Debug, Deserialize)]
pub struct PhotosQuery {
    pub start_index: Option<i64>,
    pub amount: Option<i64>,
}

/// GET /api/photos
/// Page of photos ordered by upload date descending
pub async fn get_photos(
    service: web::Data<PhotosService>,
    query: web::Query<PhotosQuery>,
) -> Result<impl Responder, PhotoShareError> {
    let photos = service
        .get_photos(query.start_index, query.amount)
        .await?;
    let responses: Vec<PhotoResponse> = photos.iter().map(|p| p.to_response()).collect();
    Ok(HttpResponse::Ok().json(responses))
}

/// GET /api/photos/count
pub async fn get_photos_count(
    service: web::Data<PhotosService>,
) -> Result<impl Responder, PhotoShareError> {
    let count = service.count().await?;
    Ok(HttpResponse::Ok().json(count))
}

/// GET /api/photos/{id}
pub async fn find_photo(
    service: web::Data<PhotosService>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, PhotoShareError> {
    let photo = service.find(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(photo.to_response()))
}

/// GET /api/photos/withimage/{id}
/// Photo metadata with the image bytes embedded
pub async fn find_photo_with_image(
    service: web::Data<PhotosService>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, PhotoShareError> {
    let (photo, image) = service.find_with_image(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PhotoWithImageResponse {
        photo: photo.to_response(),
        image: image.image,
        image_mime_type: image.image_mime_type,
    }))
}

/// GET /api/photos/image/{id}
/// Raw image bytes with the stored MIME type
pub async fn get_photo_image(
    service: web::Data<PhotosService>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, PhotoShareError> {
    let image = service.get_image(path.into_inner()).await?;
    Ok(HttpResponse::Ok()
        .content_type(image.image_mime_type)
        .body(image.image))
}

/// GET /api/photos/{id}/location
/// Reverse-geocoded place label for the photo's coordinates
pub async fn get_photo_location(
    service: web::Data<PhotosService>,
    geocoder: web::Data<GeocodingClient>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, PhotoShareError> {
    let id = path.into_inner();
    let photo = service.find(id).await?;

    let (latitude, longitude) = match (photo.latitude, photo.longitude) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => {
            return Err(PhotoShareError::NotFound(format!(
                "Coordinates for photo {}",
                id
            )))
        }
    };

    let location = geocoder.reverse(latitude, longitude).await?;
    Ok(HttpResponse::Ok().json(PhotoLocationResponse {
        id,
        latitude,
        longitude,
        display_name: location.display_name,
        city: location.city,
        country: location.country,
    }))
}

/// POST /api/photos
/// Upload a new photo (authenticated)
pub async fn upload_photo(
    service: web::Data<PhotosService>,
    user: AuthUser,
    req: web::Json<UploadPhotoRequest>,
) -> Result<impl Responder, PhotoShareError> {
    let photo = service.upload(Some(&user.0), req.into_inner()).await?;
    Ok(HttpResponse::Created().json(photo.to_response()))
}

/// PUT /api/photos/{id}
/// Update a photo (owner only)
pub async fn update_photo(
    service: web::Data<PhotosService>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdatePhotoRequest>,
) -> Result<impl Responder, PhotoShareError> {
    let id = path.into_inner();
    if id != req.id {
        return Err(PhotoShareError::InvalidInput(format!(
            "Path id {} does not match body id {}",
            id, req.id
        )));
    }

    let photo = service.update(Some(&user.0), req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(photo.to_response()))
}

/// DELETE /api/photos/{id}
/// Remove a photo (owner only), returning the removed record
pub async fn delete_photo(
    service: web::Data<PhotosService>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, PhotoShareError> {
    let photo = service.remove(Some(&user.0), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(photo.to_response()))
}

/// Configuration for photo routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/photos")
            .route("", web::get().to(get_photos))
            .route("", web::post().to(upload_photo))
            .route("/count", web::get().to(get_photos_count))
            .route("/withimage/{id}", web::get().to(find_photo_with_image))
            .route("/image/{id}", web::get().to(get_photo_image))
            .route("/{id}/location", web::get().to(get_photo_location))
            .route("/{id}", web::get().to(find_photo))
            .route("/{id}", web::put().to(update_photo))
            .route("/{id}", web::delete().to(delete_photo)),
    );
}
