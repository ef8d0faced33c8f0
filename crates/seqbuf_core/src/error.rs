//! Error types for sequence, reader and writer operations.

use thiserror::Error;

/// Result type for sequence operations.
pub type SequenceResult<T> = Result<T, SequenceError>;

/// Errors that can occur while building, slicing, reading or writing sequences.
///
/// Only [`SequenceError::InsufficientData`] is retryable: it means "not enough
/// data yet" and the operation that reported it left all state unchanged.
/// Every other variant signals a caller or producer defect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    /// A negative count, a bad width, or a position that does not belong to
    /// the sequence it was used with.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the rejected argument.
        message: String,
    },

    /// A requested offset or walk exceeds the bounds of the sequence.
    #[error("out of range: requested {requested}, available {available}")]
    OutOfRange {
        /// Number of elements the operation needed to walk.
        requested: usize,
        /// Number of elements actually available.
        available: usize,
    },

    /// A read needs more elements than are currently available.
    #[error("insufficient data: requested {requested}, available {available}")]
    InsufficientData {
        /// Number of elements the read needed.
        requested: usize,
        /// Number of unread elements remaining.
        available: usize,
    },

    /// A segment chain or writer configuration is malformed.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the malformed input.
        message: String,
    },

    /// A writer was advanced past the capacity it last granted.
    #[error("protocol violation: advanced {advanced} elements but only {granted} were granted")]
    ProtocolViolation {
        /// Count passed to `advance`.
        advanced: usize,
        /// Capacity returned by the most recent `get_buffer`.
        granted: usize,
    },
}

impl SequenceError {
    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` if retrying after more data arrives can succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::InsufficientData { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_insufficient_data_is_retryable() {
        let retryable = SequenceError::InsufficientData {
            requested: 4,
            available: 2,
        };
        assert!(retryable.is_retryable());

        assert!(!SequenceError::invalid_argument("negative").is_retryable());
        assert!(!SequenceError::configuration("unreachable").is_retryable());
        assert!(!SequenceError::ProtocolViolation {
            advanced: 10,
            granted: 5
        }
        .is_retryable());
        assert!(!SequenceError::OutOfRange {
            requested: 9,
            available: 3
        }
        .is_retryable());
    }

    #[test]
    fn messages_name_the_counts() {
        let err = SequenceError::ProtocolViolation {
            advanced: 10,
            granted: 5,
        };
        assert_eq!(
            err.to_string(),
            "protocol violation: advanced 10 elements but only 5 were granted"
        );
    }
}
