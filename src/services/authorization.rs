// src/services/authorization.rs
// DOCUMENTATION: Ownership-based authorization policy
// PURPOSE: Decide whether the acting user may create, edit or delete an item

use crate::errors::PhotoShareError;
use crate::models::CurrentUser;

/// Creation requires any authenticated user
pub fn require_authenticated(
    user: Option<&CurrentUser>,
) -> Result<&CurrentUser, PhotoShareError> {
    user.ok_or(PhotoShareError::Unauthorized)
}

/// Editing requires the acting user to be the recorded owner
pub fn item_may_be_updated(user: &CurrentUser, owner: &str) -> bool {
    user.name == owner
}

/// Deletion requires the acting user to be the recorded owner
pub fn item_may_be_deleted(user: &CurrentUser, owner: &str) -> bool {
    user.name == owner
}
