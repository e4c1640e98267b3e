pub mod factory;
pub mod role_name;
pub mod token;

pub use factory::build_token_verifier;
pub use role_name::RoleName;
pub use token::{Claims, TokenError, TokenVerifier};
