//! In-process user store.
//!
//! Used when `DATABASE_URL` is not configured and as the store double in tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::repos::error::RepoResult;
use crate::repos::user_repo::{UserRow, UserStore};

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<Uuid, UserRow>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user and return its generated id.
    pub fn insert(&self, username: impl Into<String>, role_name: impl Into<String>) -> Uuid {
        let user_id = Uuid::new_v4();
        let row = UserRow {
            user_id,
            username: username.into(),
            role_name: role_name.into(),
        };
        self.write().insert(user_id, row);
        user_id
    }

    // A poisoned lock only means another thread panicked mid-write; the map itself is still usable.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<Uuid, UserRow>> {
        self.users.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<Uuid, UserRow>> {
        self.users.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<UserRow>> {
        Ok(self
            .read()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_id(&self, user_id: Uuid) -> RepoResult<Option<UserRow>> {
        Ok(self.read().get(&user_id).cloned())
    }

    async fn list(&self) -> RepoResult<Vec<UserRow>> {
        let mut rows: Vec<UserRow> = self.read().values().cloned().collect();
        rows.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(rows)
    }

    async fn assign_role(&self, user_id: Uuid, role_name: &str) -> RepoResult<Option<UserRow>> {
        Ok(self.write().get_mut(&user_id).map(|row| {
            row.role_name = role_name.to_string();
            row.clone()
        }))
    }
}
