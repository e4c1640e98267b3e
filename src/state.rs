/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - verifier: 設定から組み立てた TokenVerifier (secret は起動時に明示的に渡す)
 *   - users: UserStore (PostgreSQL / in-memory)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::repos::UserStore;
use crate::services::auth::TokenVerifier;

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<TokenVerifier>,
    pub users: Arc<dyn UserStore>,
    pub body_limit_bytes: usize,
}

impl AppState {
    pub fn new(
        verifier: Arc<TokenVerifier>,
        users: Arc<dyn UserStore>,
        body_limit_bytes: usize,
    ) -> Self {
        Self {
            verifier,
            users,
            body_limit_bytes,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("verifier", &self.verifier)
            .field("body_limit_bytes", &self.body_limit_bytes)
            .finish_non_exhaustive()
    }
}
