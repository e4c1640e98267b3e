/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - restricted middleware が token を検証して request extensions に格納し、
 *   後段の guard (only) と handler はこの型だけを読む (token の再検証はしない)
 */

use crate::services::auth::Claims;

/// 検証済み token の claims を保持するコンテキスト
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub claims: Claims,
}

impl AuthCtx {
    pub fn new(claims: Claims) -> Self {
        Self { claims }
    }

    pub fn role_name(&self) -> Option<&str> {
        self.claims.role_name.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.claims.username.as_deref()
    }
}
