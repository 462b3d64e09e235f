// src/handlers/comments.rs
// DOCUMENTATION: HTTP handlers for comment operations
// PURPOSE: Parse requests, call services, return responses

use crate::auth::AuthUser;
use crate::errors::PhotoShareError;
use crate::models::{CreateCommentRequest, UpdateCommentRequest};
use crate::services::CommentsService;
use actix_web::{web, HttpResponse, Responder};
use uuid::Uuid;

/// GET /api/comments/photo/{photo_id}
/// Comments for a photo ordered by submission date descending
pub async fn get_comments_for_photo(
    service: web::Data<CommentsService>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, PhotoShareError> {
    let comments = service.get_comments_for_photo(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(comments))
}

/// GET /api/comments/{id}
pub async fn find_comment(
    service: web::Data<CommentsService>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, PhotoShareError> {
    let comment = service.find(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(comment))
}

/// POST /api/comments
/// Attach a comment to a photo (authenticated)
pub async fn create_comment(
    service: web::Data<CommentsService>,
    user: AuthUser,
    req: web::Json<CreateCommentRequest>,
) -> Result<impl Responder, PhotoShareError> {
    let comment = service.create(Some(&user.0), req.into_inner()).await?;
    Ok(HttpResponse::Created().json(comment))
}

/// PUT /api/comments/{id}
/// Edit a comment (owner only)
pub async fn update_comment(
    service: web::Data<CommentsService>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdateCommentRequest>,
) -> Result<impl Responder, PhotoShareError> {
    let id = path.into_inner();
    if id != req.id {
        return Err(PhotoShareError::InvalidInput(format!(
            "Path id {} does not match body id {}",
            id, req.id
        )));
    }

    let comment = service.update(Some(&user.0), req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(comment))
}

/// DELETE /api/comments/{id}
/// Remove a comment (owner only), returning the removed record
pub async fn delete_comment(
    service: web::Data<CommentsService>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, PhotoShareError> {
    let comment = service.remove(Some(&user.0), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(comment))
}

/// Configuration for comment routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/comments")
            .route("", web::post().to(create_comment))
            .route("/photo/{photo_id}", web::get().to(get_comments_for_photo))
            .route("/{id}", web::get().to(find_comment))
            .route("/{id}", web::put().to(update_comment))
            .route("/{id}", web::delete().to(delete_comment)),
    );
}
