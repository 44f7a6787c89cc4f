//! Error types for driver configuration.

use thiserror::Error;

/// Errors raised while configuring a driver.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DriverError {
    /// A target list does not line up with the bound properties.
    #[error("expected {expected} target value(s), got {got}")]
    MismatchedTargets { expected: usize, got: usize },

    /// An easing list is empty or longer than the bound properties.
    #[error("expected 1..={expected} easing value(s), got {got}")]
    MismatchedEasings { expected: usize, got: usize },

    /// The driver was configured before binding any properties.
    #[error("driver has no bound properties")]
    NoProperties,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_counts() {
        let err = DriverError::MismatchedTargets { expected: 3, got: 1 };
        assert_eq!(err.to_string(), "expected 3 target value(s), got 1");
        let err = DriverError::MismatchedEasings { expected: 2, got: 5 };
        assert_eq!(err.to_string(), "expected 1..=2 easing value(s), got 5");
    }
}
