/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - どの route にどの guard を掛けるかもここで決める
 *
 * Notes
 * - guard は route_layer で掛ける。後から apply したものほど外側 (先に実行) になるので、
 *   内側の guard から順に apply する: validate_role_name → only("admin") → restricted
 */
use axum::{
    Router,
    routing::{get, post, put},
};

use crate::api::v1::handlers::{
    health::health,
    users::{assign_role, get_user, list_users, lookup_user},
};
use crate::middleware::auth::{only, restricted, role_name, username};
use crate::services::auth::role_name::RESERVED_ROLE_NAME;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let role_assignment = role_name::apply(
        Router::new().route("/users/{user_id}/role", put(assign_role)),
        state.clone(),
    );

    let admin_only = only::apply(
        Router::new()
            .route("/users/{user_id}", get(get_user))
            .merge(role_assignment),
        RESERVED_ROLE_NAME,
    );

    let authenticated = restricted::apply(
        Router::new()
            .route("/users", get(list_users))
            .merge(admin_only),
        state.clone(),
    );

    let lookup = username::apply(
        Router::new().route("/users/lookup", post(lookup_user)),
        state,
    );

    Router::new()
        .route("/health", get(health))
        .merge(authenticated)
        .merge(lookup)
}
