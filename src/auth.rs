// src/auth.rs
// DOCUMENTATION: Bearer token authentication
// PURPOSE: Validate JWTs and expose the acting identity to handlers and gRPC

use crate::config::Config;
use crate::errors::PhotoShareError;
use crate::models::CurrentUser;
use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};

/// JWT claims carried by access tokens
/// DOCUMENTATION: The `sub` claim is the username recorded as owner of
/// created photos and comments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issue a signed access token for a user
/// DOCUMENTATION: Used by tests and local demos; production tokens come from
/// the external identity provider sharing the same secret and issuer
pub fn issue_token(
    config: &Config,
    username: &str,
    ttl_seconds: i64,
) -> Result<String, PhotoShareError> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: username.to_string(),
        iss: config.jwt_issuer.clone(),
        iat: now,
        exp: now + ttl_seconds,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| PhotoShareError::InvalidInput(format!("Failed to issue token: {}", e)))
}

/// Validate a token and return its claims
pub fn decode_token(config: &Config, token: &str) -> Result<Claims, PhotoShareError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.jwt_issuer]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        log::debug!("Rejected bearer token: {}", e);
        PhotoShareError::Unauthorized
    })
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value.strip_prefix("Bearer ")
}

fn user_from_request(req: &HttpRequest) -> Result<Option<CurrentUser>, PhotoShareError> {
    let header = match req.headers().get(AUTHORIZATION) {
        Some(value) => value,
        None => return Ok(None),
    };

    let token = header
        .to_str()
        .ok()
        .and_then(bearer_token)
        .ok_or(PhotoShareError::Unauthorized)?;

    let config = req
        .app_data::<web::Data<Config>>()
        .ok_or(PhotoShareError::Unauthorized)?;

    let claims = decode_token(config, token)?;
    Ok(Some(CurrentUser::new(claims.sub)))
}

/// Extractor requiring an authenticated user
/// DOCUMENTATION: Responds 401 when the Authorization header is missing,
/// malformed or carries an invalid token
#[derive(Debug, Clone)]
pub struct AuthUser(pub CurrentUser);

impl FromRequest for AuthUser {
    type Error = PhotoShareError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            user_from_request(req)
                .and_then(|user| user.ok_or(PhotoShareError::Unauthorized))
                .map(AuthUser),
        )
    }
}

/// Extractor tolerating anonymous callers
/// DOCUMENTATION: A missing header yields None; a present but invalid token
/// is still rejected with 401
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<CurrentUser>);

impl FromRequest for MaybeAuthUser {
    type Error = PhotoShareError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(user_from_request(req).map(MaybeAuthUser))
    }
}

/// Resolve the acting user from gRPC request metadata
/// DOCUMENTATION: Same bearer scheme as the REST API, read from the
/// "authorization" metadata key
pub fn user_from_metadata(
    metadata: &tonic::metadata::MetadataMap,
    config: &Config,
) -> Result<Option<CurrentUser>, PhotoShareError> {
    let header = match metadata.get("authorization") {
        Some(value) => value,
        None => return Ok(None),
    };

    let token = header
        .to_str()
        .ok()
        .and_then(bearer_token)
        .ok_or(PhotoShareError::Unauthorized)?;

    let claims = decode_token(config, token)?;
    Ok(Some(CurrentUser::new(claims.sub)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        let mut config = Config::from_env();
        config.jwt_secret = "unit-test-secret".to_string();
        config.jwt_issuer = "photoshare-tests".to_string();
        config
    }

    #[test]
    fn issued_token_round_trips() {
        let config = test_config();
        let token = issue_token(&config, "alice", 3600).unwrap();
        let claims = decode_token(&config, &token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.iss, "photoshare-tests");
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let config = test_config();
        let mut other = test_config();
        other.jwt_secret = "someone-elses-secret".to_string();

        let token = issue_token(&other, "mallory", 3600).unwrap();
        assert!(matches!(
            decode_token(&config, &token),
            Err(PhotoShareError::Unauthorized)
        ));
    }

    #[test]
    fn token_from_other_issuer_is_rejected() {
        let config = test_config();
        let mut other = test_config();
        other.jwt_issuer = "somewhere-else".to_string();

        let token = issue_token(&other, "alice", 3600).unwrap();
        assert!(decode_token(&config, &token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = test_config();
        let token = issue_token(&config, "alice", -3600).unwrap();
        assert!(decode_token(&config, &token).is_err());
    }

    #[test]
    fn bearer_prefix_is_required() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("Basic abc"), None);
    }

    #[test]
    fn metadata_without_authorization_yields_anonymous() {
        let config = test_config();
        let metadata = tonic::metadata::MetadataMap::new();
        assert_eq!(user_from_metadata(&metadata, &config).unwrap(), None);
    }

    #[test]
    fn metadata_with_valid_token_yields_user() {
        let config = test_config();
        let token = issue_token(&config, "bob", 3600).unwrap();

        let mut metadata = tonic::metadata::MetadataMap::new();
        metadata.insert(
            "authorization",
            format!("Bearer {}", token).parse().unwrap(),
        );

        let user = user_from_metadata(&metadata, &config).unwrap();
        assert_eq!(user, Some(CurrentUser::new("bob")));
    }
}
