//! bearer token 検証 → AuthCtx を extensions に入れる
//!
//! - `Authorization` ヘッダが無い / 空 → 401 "Token required"
//! - 署名 / exp の検証に失敗 → 401 "Token invalid"
//! - verifier 側の故障 (鍵が使えない等) は 401 にせず AppError::Internal として上に流す
//!
//! `Bearer ` prefix は任意 (素の token もそのまま受け付ける)。

use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::{AppError, AuthError};
use crate::services::auth::{Claims, TokenError, TokenVerifier};
use crate::state::AppState;

/// Router 配下の全 route に token 検証を掛ける。
///
/// 例：
/// ```ignore
/// let protected = Router::new().route("/users", get(list_users));
/// let protected = middleware::auth::restricted::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // route_layer: 存在しない path は 401 ではなく 404 のまま返す
    router.route_layer(middleware::from_fn_with_state(state, restricted))
}

pub async fn restricted(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = verify_authorization(req.headers(), &state.verifier)?;

    tracing::debug!(
        role_name = ?claims.role_name,
        expires_at = ?claims.expires_at(),
        "access token verified"
    );

    // middleware → 後段 guard / extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::new(claims));

    Ok(next.run(req).await)
}

const BEARER: &str = "bearer";

/// Extract the token from the `Authorization` header.
///
/// Accepts `Bearer <token>` (scheme is case-insensitive) or a bare token.
/// Returns `None` when the header is missing, not visible ASCII, or blank.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();

    // `value` is already trimmed, so a bare "Bearer" has no trailing space left to split on.
    let token = match value.get(..BEARER.len()) {
        Some(scheme)
            if scheme.eq_ignore_ascii_case(BEARER)
                && value[BEARER.len()..]
                    .chars()
                    .next()
                    .is_none_or(char::is_whitespace) =>
        {
            value[BEARER.len()..].trim()
        }
        _ => value,
    };

    (!token.is_empty()).then_some(token)
}

/// Decide the outcome of the token check for one request.
pub fn verify_authorization(
    headers: &HeaderMap,
    verifier: &TokenVerifier,
) -> Result<Claims, AppError> {
    let token = bearer_token(headers).ok_or(AuthError::TokenRequired)?;

    match verifier.verify(token) {
        Ok(claims) => Ok(claims),
        Err(TokenError::Rejected(err)) => {
            tracing::warn!(error = %err, "access token verification failed");
            Err(AuthError::TokenInvalid.into())
        }
        Err(err) => {
            tracing::error!(error = %err, "token verifier is not usable");
            Err(AppError::Internal("token verifier failure"))
        }
    }
}
