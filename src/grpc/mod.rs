// src/grpc/mod.rs
// DOCUMENTATION: gRPC module organization
// PURPOSE: Generated protobuf types and the Commenter service implementation

pub mod comments;

/// Generated types for the commenter package (see proto/comments.proto)
pub mod commenter {
    tonic::include_proto!("commenter");
}

pub use comments::CommenterGrpcService;
