//! Domain error model.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// Failures when parsing strongly-typed values out of upstream payloads.
///
/// Pricing itself never fails; missing data falls back to defaults instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed value, such as a currency code that is not three letters.
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        assert_eq!(
            DomainError::invalid_id("BrandId: \"x\"").to_string(),
            "invalid identifier: BrandId: \"x\""
        );
        assert_eq!(DomainError::validation("bad").to_string(), "validation failed: bad");
    }
}
