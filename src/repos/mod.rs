/*
 * Responsibility
 * - ユーザーストアの抽象 (UserStore) と実装 (PostgreSQL / in-memory)
 */
pub mod error;
pub mod memory;
pub mod user_repo;

pub use memory::InMemoryUserStore;
pub use user_repo::{PgUserStore, UserRow, UserStore};
