//! Error types for the matching engine
//!
//! This module provides a unified error type for every crate in the
//! workspace. Parse failures are the only recoverable kind: the control loop
//! reports and skips them. Everything else signals a broken invariant inside
//! the trusted matching path and aborts the operation.

use thiserror::Error;

use crate::model::instrument::Instrument;

/// Matching engine error type
#[derive(Debug, Error)]
pub enum Error {
    /// An order was built violating its invariants
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// A trade was built violating its invariants
    #[error("Invalid trade: {0}")]
    InvalidTrade(String),

    /// A raw instruction could not be turned into an order
    #[error("Unable to build an order from: {line}: {cause}")]
    Parse {
        /// The offending instruction text
        line: String,
        /// Underlying failure
        #[source]
        cause: ParseFailure,
    },

    /// An order reached the engine of a different instrument
    #[error("Order for {actual} routed to the {expected} engine")]
    InstrumentMismatch {
        expected: Instrument,
        actual: Instrument,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Reading instructions or writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether the control loop may skip this error and keep going
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Parse { .. })
    }
}

/// Reason an instruction line was rejected
#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error("not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("expected 5 fields, found {0}")]
    FieldCount(usize),

    #[error("unknown side '{0}'")]
    Side(String),

    #[error("invalid quantity: {0}")]
    Quantity(#[from] std::num::ParseIntError),

    #[error("invalid price: {0}")]
    Price(#[from] rust_decimal::Error),

    /// Fields parsed but the order itself is invalid
    #[error("{0}")]
    Rejected(Box<Error>),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_carries_line_and_cause() {
        let err = Error::Parse {
            line: "AAA BUY".to_string(),
            cause: ParseFailure::FieldCount(2),
        };

        assert!(err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "Unable to build an order from: AAA BUY: expected 5 fields, found 2"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_encoding_failure_is_recoverable() {
        let cause = std::str::from_utf8(b"X\xff").unwrap_err();
        let err = Error::Parse {
            line: String::from_utf8_lossy(b"X\xff").into_owned(),
            cause: cause.into(),
        };

        assert!(err.is_recoverable());
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    #[test]
    fn test_invariant_errors_are_not_recoverable() {
        assert!(!Error::InvalidOrder("price".into()).is_recoverable());
        assert!(!Error::InvalidTrade("quantity".into()).is_recoverable());
        let mismatch = Error::InstrumentMismatch {
            expected: Instrument::new("AAA"),
            actual: Instrument::new("BBB"),
        };
        assert!(!mismatch.is_recoverable());
        assert_eq!(mismatch.to_string(), "Order for BBB routed to the AAA engine");
    }
}
