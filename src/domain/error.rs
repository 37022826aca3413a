//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent malformed input at the domain boundary.
/// Graph operations themselves never fail.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid node '{spec}': {reason}")]
    InvalidNodeSpec { spec: String, reason: String },
}
