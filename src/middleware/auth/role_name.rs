//! body の `role_name` を正規化する guard (`validate_role_name`)
//!
//! 成功時は解決済みの RoleName (trim 済み、空なら "student") を extensions に入れて続行する。
//! 文字列以外の `role_name` は未指定と同じ扱い。

use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::middleware::auth::body::{buffer_json, string_field};
use crate::services::auth::RoleName;
use crate::state::AppState;

pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(state, validate_role_name))
}

pub async fn validate_role_name(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut req, fields) = buffer_json(req, state.body_limit_bytes).await?;

    let role_name = RoleName::resolve(string_field(&fields, "role_name")).inspect_err(|err| {
        tracing::debug!(error = %err, "role name rejected");
    })?;

    req.extensions_mut().insert(role_name);

    Ok(next.run(req).await)
}
