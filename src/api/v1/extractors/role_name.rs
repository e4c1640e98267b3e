use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::services::auth::RoleName;

/// Handler で、validate_role_name middleware が解決した RoleName を受け取る extractor
pub struct RoleNameExtractor(pub RoleName);

impl<S> FromRequestParts<S> for RoleNameExtractor
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Missing means the route was wired without the middleware: a server bug, not bad input.
        parts
            .extensions
            .get::<RoleName>()
            .cloned()
            .map(RoleNameExtractor)
            .ok_or(AppError::Internal("role name middleware not applied"))
    }
}
