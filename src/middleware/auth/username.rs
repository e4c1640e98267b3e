//! body の `username` がユーザーストアに存在するかの guard (`check_username_exists`)
//!
//! 見つからない理由 (username 無し / 該当なし) に関わらず同じ 401 "Invalid credentials" を返す。
//! ストアの故障は 401 にせず AppError::Repo として上に流す。

use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
};

use crate::error::{AppError, AuthError};
use crate::middleware::auth::body::{buffer_json, string_field};
use crate::repos::UserStore;
use crate::state::AppState;

pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, check_username_exists))
}

pub async fn check_username_exists(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (req, fields) = buffer_json(req, state.body_limit_bytes).await?;

    ensure_username_exists(state.users.as_ref(), string_field(&fields, "username")).await?;

    Ok(next.run(req).await)
}

/// One exact-match lookup for a present username; no lookup at all without one.
pub async fn ensure_username_exists(
    users: &dyn UserStore,
    username: Option<&str>,
) -> Result<(), AppError> {
    let Some(username) = username else {
        tracing::warn!("credential check without username");
        return Err(AuthError::InvalidCredentials.into());
    };

    match users.find_by_username(username).await? {
        Some(_) => Ok(()),
        None => {
            tracing::warn!("credential check for unknown username");
            Err(AuthError::InvalidCredentials.into())
        }
    }
}
