use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Errors returned by token verification.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The token itself is bad: signature, expiry, encoding or claim shape.
    #[error("token rejected: {0}")]
    Rejected(#[source] jsonwebtoken::errors::Error),

    /// The verifier cannot work with its key material. Not the caller's fault.
    #[error("verifier key unusable: {0}")]
    Key(#[source] jsonwebtoken::errors::Error),

    #[error("token secret must not be empty")]
    EmptySecret,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidKeyFormat => Self::Key(e),
            _ => Self::Rejected(e),
        }
    }
}

/// Decoded payload of a verified token.
///
/// Only `role_name` is interpreted by the guards. Unknown keys are kept in `extra`
/// so handlers can read whatever the issuer put there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    }
}

/// HS256 token verifier over a shared secret.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(secret: &[u8], leeway_seconds: u64) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::EmptySecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_seconds;

        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// Verify signature and expiry, then decode the claims.
    ///
    /// `jsonwebtoken::Validation` requires and checks `exp`.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        Ok(data.claims)
    }
}
