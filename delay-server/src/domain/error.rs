//! Domain error types.
//!
//! These errors represent validation failures on values entering the
//! domain. They are distinct from storage and HTTP errors.

/// Domain-level validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Delay outside the accepted range
    #[error("delay must be between {min} and {max} minutes, got {value}")]
    InvalidDelay { value: i64, min: u16, max: u16 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::InvalidDelay {
            value: 121,
            min: 0,
            max: 120,
        };
        assert_eq!(
            err.to_string(),
            "delay must be between 0 and 120 minutes, got 121"
        );
    }
}
