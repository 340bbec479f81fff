//! Error types for the allocation walk
//!
//! Only initialization can fail. Running out of blocks is not an error; it is
//! reported as [`WalkStep::Exhausted`](super::WalkStep::Exhausted) and the
//! caller decides how to present it.

use std::fmt;

/// Errors raised when a walk cannot be started
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkError {
    /// Empty block list or zero-byte request
    InvalidInput { reason: String },
}

impl fmt::Display for WalkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalkError::InvalidInput { reason } => write!(f, "Invalid walk input: {}", reason),
        }
    }
}

impl std::error::Error for WalkError {}
