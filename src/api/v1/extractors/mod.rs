/*
 * Responsibility
 * - middleware が request extensions に載せた値を handler に渡す extractor 群
 */
pub mod auth_ctx;
pub mod role_name;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
pub use role_name::RoleNameExtractor;
