/*
 * Responsibility
 * - users / roles テーブル向け SQLx 操作
 * - guard と handler は UserStore trait 越しにだけ触る (テストでは in-memory 実装に差し替え)
 * - DB エラーは RepoError として返し、HTTP への変換は AppError 側で行う
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserRow {
    pub user_id: Uuid,
    pub username: String,
    pub role_name: String,
}

/// User lookup capability needed by the guards and the user routes.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<UserRow>>;

    async fn find_by_id(&self, user_id: Uuid) -> RepoResult<Option<UserRow>>;

    async fn list(&self) -> RepoResult<Vec<UserRow>>;

    /// Point the user at `role_name`, creating the role if it does not exist yet.
    /// Returns `None` when the user does not exist.
    async fn assign_role(&self, user_id: Uuid, role_name: &str) -> RepoResult<Option<UserRow>>;
}

#[derive(Clone, Debug)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_username(&self, username: &str) -> RepoResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.user_id, u.username, r.role_name
            FROM users u
            JOIN roles r ON r.role_id = u.role_id
            WHERE u.username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn find_by_id(&self, user_id: Uuid) -> RepoResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.user_id, u.username, r.role_name
            FROM users u
            JOIN roles r ON r.role_id = u.role_id
            WHERE u.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list(&self) -> RepoResult<Vec<UserRow>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.user_id, u.username, r.role_name
            FROM users u
            JOIN roles r ON r.role_id = u.role_id
            ORDER BY u.username
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn assign_role(&self, user_id: Uuid, role_name: &str) -> RepoResult<Option<UserRow>> {
        let mut tx = self.pool.begin().await.map_err(RepoError::Db)?;

        // DO UPDATE (instead of DO NOTHING) so RETURNING yields the existing row too.
        let role_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO roles (role_name)
            VALUES ($1)
            ON CONFLICT (role_name) DO UPDATE SET role_name = EXCLUDED.role_name
            RETURNING role_id
            "#,
        )
        .bind(role_name)
        .fetch_one(&mut *tx)
        .await?;

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users u
            SET role_id = $2
            FROM roles r
            WHERE u.user_id = $1 AND r.role_id = $2
            RETURNING u.user_id, u.username, r.role_name
            "#,
        )
        .bind(user_id)
        .bind(role_id)
        .fetch_optional(&mut *tx)
        .await?;

        // Unknown user: drop the transaction so a freshly inserted role is rolled back as well.
        if row.is_none() {
            return Ok(None);
        }

        tx.commit().await?;
        Ok(row)
    }
}
