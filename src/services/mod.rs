// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod authorization;
pub mod cache;
pub mod comments_service;
pub mod geocoder;
pub mod photos_service;

pub use cache::*;
pub use comments_service::*;
pub use geocoder::*;
pub use photos_service::*;
