/*
 * Responsibility
 * - /users 系 handler
 * - 認証/認可/入力検証は route に掛けた guard が済ませている前提
 *   (AuthCtx / RoleName は extractor で受け取る)
 */
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use crate::{
    api::v1::dto::users::{LookupRequest, LookupResponse, UserResponse},
    api::v1::extractors::{AuthCtxExtractor, RoleNameExtractor},
    error::AppError,
    state::AppState,
};

pub async fn list_users(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    tracing::debug!(requested_by = ?ctx.username(), "listing users");

    let rows = state.users.list().await?;
    Ok(Json(rows.into_iter().map(UserResponse::from).collect()))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let row = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::not_found("user"))?;

    Ok(Json(row.into()))
}

pub async fn assign_role(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    RoleNameExtractor(role_name): RoleNameExtractor,
) -> Result<Json<UserResponse>, AppError> {
    let row = state
        .users
        .assign_role(user_id, role_name.as_str())
        .await?
        .ok_or(AppError::not_found("user"))?;

    tracing::info!(%user_id, role_name = %role_name, "role assigned");
    Ok(Json(row.into()))
}

// Reached only when check_username_exists let the request through.
pub async fn lookup_user(Json(req): Json<LookupRequest>) -> Json<LookupResponse> {
    Json(LookupResponse {
        username: req.username,
        exists: true,
    })
}
