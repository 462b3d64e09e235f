// src/grpc/comments.rs
// DOCUMENTATION: Commenter gRPC service
// PURPOSE: Expose the comments service over gRPC; the same business rules
// as REST apply since both fronts delegate to CommentsService

use crate::auth;
use crate::config::Config;
use crate::grpc::commenter::commenter_server::{Commenter, CommenterServer};
use crate::grpc::commenter::{
    CommentReply, CreateRequest, FindRequest, GetCommentsForPhotoReply,
    GetCommentsForPhotoRequest, RemoveRequest, UpdateRequest,
};
use crate::models::{Comment, CreateCommentRequest, UpdateCommentRequest};
use crate::services::CommentsService;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tonic::{Request, Response, Status};
use uuid::Uuid;

pub struct CommenterGrpcService {
    service: Arc<CommentsService>,
    config: Config,
}

impl CommenterGrpcService {
    pub fn new(service: Arc<CommentsService>, config: Config) -> Self {
        Self { service, config }
    }

    /// Wrap into the generated tonic server type
    pub fn into_server(self) -> CommenterServer<Self> {
        CommenterServer::new(self)
    }
}

fn timestamp_from(value: DateTime<Utc>) -> prost_types::Timestamp {
    prost_types::Timestamp {
        seconds: value.timestamp(),
        nanos: value.timestamp_subsec_nanos() as i32,
    }
}

fn to_reply(comment: Comment) -> CommentReply {
    CommentReply {
        id: comment.id.to_string(),
        photo_id: comment.photo_id.to_string(),
        user_name: comment.user_name,
        subject: comment.subject,
        body: comment.body,
        submitted_on: Some(timestamp_from(comment.submitted_on)),
    }
}

fn parse_uuid(value: &str, field: &str) -> Result<Uuid, Status> {
    Uuid::parse_str(value)
        .map_err(|_| Status::invalid_argument(format!("{} is not a valid UUID", field)))
}

#[tonic::async_trait]
impl Commenter for CommenterGrpcService {
    async fn create(
        &self,
        request: Request<CreateRequest>,
    ) -> Result<Response<CommentReply>, Status> {
        let user = auth::user_from_metadata(request.metadata(), &self.config)?;
        let message = request.into_inner();
        let photo_id = parse_uuid(&message.photo_id, "photo_id")?;

        let comment = self
            .service
            .create(
                user.as_ref(),
                CreateCommentRequest {
                    photo_id,
                    subject: message.subject,
                    body: message.body,
                },
            )
            .await?;

        Ok(Response::new(to_reply(comment)))
    }

    async fn find(&self, request: Request<FindRequest>) -> Result<Response<CommentReply>, Status> {
        let id = parse_uuid(&request.into_inner().id, "id")?;
        let comment = self.service.find(id).await?;
        Ok(Response::new(to_reply(comment)))
    }

    async fn get_comments_for_photo(
        &self,
        request: Request<GetCommentsForPhotoRequest>,
    ) -> Result<Response<GetCommentsForPhotoReply>, Status> {
        let photo_id = parse_uuid(&request.into_inner().photo_id, "photo_id")?;
        let comments = self.service.get_comments_for_photo(photo_id).await?;

        Ok(Response::new(GetCommentsForPhotoReply {
            comments: comments.into_iter().map(to_reply).collect(),
        }))
    }

    async fn update(
        &self,
        request: Request<UpdateRequest>,
    ) -> Result<Response<CommentReply>, Status> {
        let user = auth::user_from_metadata(request.metadata(), &self.config)?;
        let message = request.into_inner();
        let id = parse_uuid(&message.id, "id")?;

        let comment = self
            .service
            .update(
                user.as_ref(),
                UpdateCommentRequest {
                    id,
                    subject: message.subject,
                    body: message.body,
                },
            )
            .await?;

        Ok(Response::new(to_reply(comment)))
    }

    async fn remove(
        &self,
        request: Request<RemoveRequest>,
    ) -> Result<Response<CommentReply>, Status> {
        let user = auth::user_from_metadata(request.metadata(), &self.config)?;
        let id = parse_uuid(&request.into_inner().id, "id")?;

        let comment = self.service.remove(user.as_ref(), id).await?;
        Ok(Response::new(to_reply(comment)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryCommentsRepository;

    fn test_config() -> Config {
        let mut config = Config::from_env();
        config.jwt_secret = "grpc-test-secret".to_string();
        config.jwt_issuer = "photoshare-tests".to_string();
        config
    }

    fn grpc_service() -> CommenterGrpcService {
        let service = Arc::new(CommentsService::new(Arc::new(
            MemoryCommentsRepository::new(),
        )));
        CommenterGrpcService::new(service, test_config())
    }

    fn authed_request<T>(message: T, config: &Config, user: &str) -> Request<T> {
        let token = auth::issue_token(config, user, 3600).unwrap();
        let mut request = Request::new(message);
        request.metadata_mut().insert(
            "authorization",
            format!("Bearer {}", token).parse().unwrap(),
        );
        request
    }

    #[test]
    fn timestamps_preserve_seconds_and_nanos() {
        let now = Utc::now();
        let ts = timestamp_from(now);
        assert_eq!(ts.seconds, now.timestamp());
        assert_eq!(ts.nanos as u32, now.timestamp_subsec_nanos());
    }

    #[test]
    fn invalid_uuid_is_invalid_argument() {
        let status = parse_uuid("not-a-uuid", "id").unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
    }

    #[tokio::test]
    async fn create_without_token_is_unauthenticated() {
        let grpc = grpc_service();
        let request = Request::new(CreateRequest {
            photo_id: Uuid::new_v4().to_string(),
            subject: "hi".to_string(),
            body: "there".to_string(),
        });

        let status = grpc.create(request).await.unwrap_err();
        assert_eq!(status.code(), tonic::Code::Unauthenticated);
    }

    #[tokio::test]
    async fn create_stamps_the_token_subject_as_owner() {
        let grpc = grpc_service();
        let config = test_config();

        let request = authed_request(
            CreateRequest {
                photo_id: Uuid::new_v4().to_string(),
                subject: "hi".to_string(),
                body: "there".to_string(),
            },
            &config,
            "carol",
        );

        let reply = grpc.create(request).await.unwrap().into_inner();
        assert_eq!(reply.user_name, "carol");
        assert!(reply.submitted_on.is_some());
    }

    #[tokio::test]
    async fn remove_by_non_owner_is_permission_denied() {
        let grpc = grpc_service();
        let config = test_config();
        let photo_id = Uuid::new_v4().to_string();

        let created = grpc
            .create(authed_request(
                CreateRequest {
                    photo_id,
                    subject: "mine".to_string(),
                    body: "hands off".to_string(),
                },
                &config,
                "carol",
            ))
            .await
            .unwrap()
            .into_inner();

        let status = grpc
            .remove(authed_request(
                RemoveRequest { id: created.id },
                &config,
                "mallory",
            ))
            .await
            .unwrap_err();

        assert_eq!(status.code(), tonic::Code::PermissionDenied);
    }

    #[tokio::test]
    async fn find_unknown_comment_is_not_found() {
        let grpc = grpc_service();
        let request = Request::new(FindRequest {
            id: Uuid::new_v4().to_string(),
        });

        let status = grpc.find(request).await.unwrap_err();
        assert_eq!(status.code(), tonic::Code::NotFound);
    }
}
