// src/bin/gateway.rs
// DOCUMENTATION: Backend-for-frontend reverse proxy
// PURPOSE: Single public entry point. Photo traffic is forwarded verbatim to
// the REST upstream; comment traffic is re-expressed as Commenter gRPC calls.
// The caller's bearer token travels with both.

mod commenter {
    tonic::include_proto!("commenter");
}

use actix_web::http::header::{AUTHORIZATION, CONTENT_TYPE};
use actix_web::{
    error::ResponseError, http::StatusCode, middleware::Logger, web, App, HttpRequest,
    HttpResponse, HttpServer, Responder,
};
use anyhow::Context;
use commenter::commenter_client::CommenterClient;
use commenter::{
    CreateRequest, FindRequest, GetCommentsForPhotoRequest, RemoveRequest, UpdateRequest,
};
use dotenv::dotenv;
use serde::Deserialize;
use serde_json::json;
use std::env;
use thiserror::Error;
use tonic::metadata::MetadataValue;
use tonic::transport::{Channel, Endpoint};

/// Gateway configuration loaded from environment variables
#[derive(Debug, Clone)]
struct GatewayConfig {
    address: String,
    port: u16,
    photos_upstream: String,
    comments_upstream: String,
}

impl GatewayConfig {
    fn from_env() -> Self {
        dotenv().ok();

        GatewayConfig {
            address: env::var("GATEWAY_ADDRESS").unwrap_or_else(|_| "127.0.0.1".to_string()),

            port: env::var("GATEWAY_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),

            photos_upstream: env::var("PHOTOS_UPSTREAM")
                .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string()),

            comments_upstream: env::var("COMMENTS_GRPC_UPSTREAM")
                .unwrap_or_else(|_| "http://127.0.0.1:50051".to_string()),
        }
    }
}

/// Gateway error types
/// DOCUMENTATION: gRPC status codes from the comments upstream are mapped
/// back to the HTTP codes the REST API would have produced
#[derive(Error, Debug)]
enum GatewayError {
    #[error("Upstream request failed: {0}")]
    Upstream(String),

    #[error("{0}")]
    Remote(#[from] tonic::Status),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl ResponseError for GatewayError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "error": {
                "code": self.status_code().as_u16(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Upstream(_) => StatusCode::BAD_GATEWAY,
            GatewayError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GatewayError::Remote(status) => match status.code() {
                tonic::Code::NotFound => StatusCode::NOT_FOUND,
                tonic::Code::PermissionDenied => StatusCode::FORBIDDEN,
                tonic::Code::Unauthenticated => StatusCode::UNAUTHORIZED,
                tonic::Code::InvalidArgument => StatusCode::BAD_REQUEST,
                _ => StatusCode::BAD_GATEWAY,
            },
        }
    }
}

/// Shared gateway state
#[derive(Clone)]
struct GatewayState {
    http: reqwest::Client,
    comments: CommenterClient<Channel>,
    photos_upstream: String,
}

/// Forward a photo request verbatim to the REST upstream
/// DOCUMENTATION: Method, query string, body, Authorization and Content-Type
/// are relayed; the upstream's status and body come back unchanged
async fn proxy_photos(
    state: web::Data<GatewayState>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, GatewayError> {
    let mut url = format!("{}{}", state.photos_upstream, req.uri().path());
    if let Some(query) = req.uri().query() {
        url.push('?');
        url.push_str(query);
    }

    let method = reqwest::Method::from_bytes(req.method().as_str().as_bytes())
        .map_err(|e| GatewayError::InvalidInput(e.to_string()))?;

    log::debug!("Forwarding {} {}", method, url);

    let mut upstream = state.http.request(method, &url);
    if let Some(auth) = req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        upstream = upstream.header(reqwest::header::AUTHORIZATION, auth);
    }
    if let Some(content_type) = req.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
        upstream = upstream.header(reqwest::header::CONTENT_TYPE, content_type);
    }

    let response = upstream
        .body(body.to_vec())
        .send()
        .await
        .map_err(|e| GatewayError::Upstream(e.to_string()))?;

    let status =
        StatusCode::from_u16(response.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = response
        .bytes()
        .await
        .map_err(|e| GatewayError::Upstream(e.to_string()))?;

    let mut builder = HttpResponse::build(status);
    if let Some(content_type) = content_type {
        builder.content_type(content_type);
    }
    Ok(builder.body(bytes.to_vec()))
}

/// Copy the caller's bearer token into gRPC metadata
fn attach_token<T>(request: &mut tonic::Request<T>, req: &HttpRequest) -> Result<(), GatewayError> {
    if let Some(value) = req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        let meta = MetadataValue::try_from(value)
            .map_err(|e| GatewayError::InvalidInput(e.to_string()))?;
        request.metadata_mut().insert("authorization", meta);
    }
    Ok(())
}

/// Render a CommentReply as the JSON shape the REST API uses
fn reply_to_json(reply: commenter::CommentReply) -> serde_json::Value {
    let submitted_on = reply.submitted_on.and_then(|ts| {
        chrono::DateTime::from_timestamp(ts.seconds, ts.nanos.max(0) as u32)
            .map(|dt| dt.to_rfc3339())
    });

    json!({
        "id": reply.id,
        "photo_id": reply.photo_id,
        "user_name": reply.user_name,
        "subject": reply.subject,
        "body": reply.body,
        "submitted_on": submitted_on,
    })
}

#[derive(Debug, Deserialize)]
struct CreateCommentBody {
    photo_id: String,
    subject: String,
    body: String,
}

#[derive(Debug, Deserialize)]
struct UpdateCommentBody {
    id: String,
    subject: String,
    body: String,
}

/// GET /api/comments/photo/{photo_id}
async fn comments_for_photo(
    state: web::Data<GatewayState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, GatewayError> {
    let mut request = tonic::Request::new(GetCommentsForPhotoRequest {
        photo_id: path.into_inner(),
    });
    attach_token(&mut request, &req)?;

    let reply = state
        .comments
        .clone()
        .get_comments_for_photo(request)
        .await?
        .into_inner();

    let comments: Vec<serde_json::Value> = reply.comments.into_iter().map(reply_to_json).collect();
    Ok(HttpResponse::Ok().json(comments))
}

/// GET /api/comments/{id}
async fn find_comment(
    state: web::Data<GatewayState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, GatewayError> {
    let mut request = tonic::Request::new(FindRequest {
        id: path.into_inner(),
    });
    attach_token(&mut request, &req)?;

    let reply = state.comments.clone().find(request).await?.into_inner();
    Ok(HttpResponse::Ok().json(reply_to_json(reply)))
}

/// POST /api/comments
async fn create_comment(
    state: web::Data<GatewayState>,
    req: HttpRequest,
    body: web::Json<CreateCommentBody>,
) -> Result<HttpResponse, GatewayError> {
    let body = body.into_inner();
    let mut request = tonic::Request::new(CreateRequest {
        photo_id: body.photo_id,
        subject: body.subject,
        body: body.body,
    });
    attach_token(&mut request, &req)?;

    let reply = state.comments.clone().create(request).await?.into_inner();
    Ok(HttpResponse::Created().json(reply_to_json(reply)))
}

/// PUT /api/comments/{id}
async fn update_comment(
    state: web::Data<GatewayState>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<UpdateCommentBody>,
) -> Result<HttpResponse, GatewayError> {
    let id = path.into_inner();
    let body = body.into_inner();
    if id != body.id {
        return Err(GatewayError::InvalidInput(format!(
            "Path id {} does not match body id {}",
            id, body.id
        )));
    }

    let mut request = tonic::Request::new(UpdateRequest {
        id: body.id,
        subject: body.subject,
        body: body.body,
    });
    attach_token(&mut request, &req)?;

    let reply = state.comments.clone().update(request).await?.into_inner();
    Ok(HttpResponse::Ok().json(reply_to_json(reply)))
}

/// DELETE /api/comments/{id}
async fn delete_comment(
    state: web::Data<GatewayState>,
    req: HttpRequest,
    path: web::Path<String>,
) -> Result<HttpResponse, GatewayError> {
    let mut request = tonic::Request::new(RemoveRequest {
        id: path.into_inner(),
    });
    attach_token(&mut request, &req)?;

    let reply = state.comments.clone().remove(request).await?.into_inner();
    Ok(HttpResponse::Ok().json(reply_to_json(reply)))
}

async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "photoshare-gateway",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = GatewayConfig::from_env();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info,actix_web=info");
    }
    env_logger::init();

    log::info!("Starting photoshare gateway...");
    log::info!("Photos upstream: {}", config.photos_upstream);
    log::info!("Comments upstream: {}", config.comments_upstream);

    // The channel connects lazily; the gateway starts even when the
    // comments service is still coming up
    let channel = Endpoint::from_shared(config.comments_upstream.clone())
        .context("COMMENTS_GRPC_UPSTREAM is not a valid URI")?
        .connect_lazy();

    let state = GatewayState {
        http: reqwest::Client::new(),
        comments: CommenterClient::new(channel),
        photos_upstream: config.photos_upstream.clone(),
    };

    let server_addr = format!("{}:{}", config.address, config.port);
    log::info!("Gateway listening on {}", server_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .route("/health", web::get().to(health_check))
            .service(
                web::scope("/api/comments")
                    .route("", web::post().to(create_comment))
                    .route("/photo/{photo_id}", web::get().to(comments_for_photo))
                    .route("/{id}", web::get().to(find_comment))
                    .route("/{id}", web::put().to(update_comment))
                    .route("/{id}", web::delete().to(delete_comment)),
            )
            .service(web::scope("/api/photos").default_service(web::route().to(proxy_photos)))
    })
    .bind(&server_addr)?
    .run()
    .await?;

    Ok(())
}
