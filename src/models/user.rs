// src/models/user.rs

use serde::{Deserialize, Serialize};

/// The authenticated identity acting on a request
/// DOCUMENTATION: Produced by the auth extractors (REST) and from gRPC
/// metadata; the name is the `sub` claim of the validated bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub name: String,
}

impl CurrentUser {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
