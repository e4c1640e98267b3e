//! role による認可 guard (`only(role_name)`)
//!
//! restricted が extensions に入れた AuthCtx を読むだけで、token の再検証はしない。
//! そのため restricted より内側 (先に apply) に掛けること。

use std::sync::Arc;

use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::{AppError, AuthError};
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct RequiredRole(Arc<str>);

impl RequiredRole {
    pub fn new(role_name: &str) -> Self {
        Self(Arc::from(role_name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Router 配下の全 route を `role_name` を持つ token のみに制限する。
pub fn apply(router: Router<AppState>, role_name: &str) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(
        RequiredRole::new(role_name),
        only,
    ))
}

async fn only(
    State(required): State<RequiredRole>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    check_role(req.extensions().get::<AuthCtx>(), required.as_str())?;
    Ok(next.run(req).await)
}

/// Exact, case-sensitive comparison of the token's role with the required one.
pub fn check_role(ctx: Option<&AuthCtx>, required: &str) -> Result<(), AuthError> {
    match ctx.and_then(AuthCtx::role_name) {
        Some(role_name) if role_name == required => Ok(()),
        other => {
            tracing::debug!(required, role_name = ?other, "role check failed");
            Err(AuthError::Forbidden)
        }
    }
}
