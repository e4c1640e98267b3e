//! Role names supplied by clients.
//!
//! A [`RoleName`] can only be obtained through [`RoleName::resolve`], so any value
//! that reaches a handler is trimmed, non-empty, at most
//! [`MAX_ROLE_NAME_CHARS`] characters long and never the reserved role.

use std::fmt;

use crate::error::ValidationError;

/// Elevated role that clients can never assign themselves.
pub const RESERVED_ROLE_NAME: &str = "admin";

/// Role used when the client sends nothing (or only whitespace).
pub const DEFAULT_ROLE_NAME: &str = "student";

pub const MAX_ROLE_NAME_CHARS: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleName(String);

impl RoleName {
    /// Trim and validate a raw role name. First matching rule wins:
    /// reserved name, then length, then empty (default role).
    pub fn resolve(raw: Option<&str>) -> Result<Self, ValidationError> {
        let trimmed = raw.unwrap_or_default().trim();

        if trimmed == RESERVED_ROLE_NAME {
            return Err(ValidationError::ReservedRoleName);
        }
        // Counted in chars, not bytes: "é" is one character.
        if trimmed.chars().count() > MAX_ROLE_NAME_CHARS {
            return Err(ValidationError::RoleNameTooLong);
        }
        if trimmed.is_empty() {
            return Ok(Self(DEFAULT_ROLE_NAME.to_string()));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
