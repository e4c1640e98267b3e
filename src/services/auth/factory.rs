/// Factory: build `TokenVerifier` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{TokenError, TokenVerifier};

pub fn build_token_verifier(config: &Config) -> Result<Arc<TokenVerifier>, TokenError> {
    let verifier = TokenVerifier::new(
        config.jwt_secret.as_bytes(),
        config.token_leeway_seconds,
    )?;

    Ok(Arc::new(verifier))
}
