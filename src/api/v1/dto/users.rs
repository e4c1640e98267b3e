/*
 * Responsibility
 * - Users の request/response DTO
 * - role_name / username の検証は middleware 側 (ここでは形だけ)
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::UserRow;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserResponse {
    pub user_id: Uuid,
    pub username: String,
    pub role_name: String,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: row.user_id,
            username: row.username,
            role_name: row.role_name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LookupResponse {
    pub username: String,
    pub exists: bool,
}
