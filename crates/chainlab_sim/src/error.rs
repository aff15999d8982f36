//! Error types for the simulator and harness

use thiserror::Error;

/// Result type for simulator operations
pub type SimResult<T> = std::result::Result<T, SimError>;

/// Simulator and harness errors.
///
/// `Reverted` and `ValueMismatch` are the two expected failure kinds in
/// tests; every other variant signals a harness-level problem (bad test
/// wiring), never an intentional negative path.
#[derive(Debug, Error)]
pub enum SimError {
    /// A guard condition inside contract logic failed; all state changes
    /// from the invocation are rolled back
    #[error("reverted: {0}")]
    Reverted(String),

    /// An assertion comparing expected vs actual values failed
    #[error("value mismatch: expected {expected}, got {actual}")]
    ValueMismatch {
        expected: serde_json::Value,
        actual: serde_json::Value,
    },

    /// No specimen registered under this name
    #[error("specimen not found: {0}")]
    SpecimenNotFound(String),

    /// No deployed instance at this address
    #[error("no instance deployed at {0}")]
    InstanceNotFound(String),

    /// Specimen has no such operation
    #[error("operation not found: {specimen}.{op}")]
    OperationNotFound { specimen: String, op: String },

    /// Argument arity or type does not match the declared parameters
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// Caller cannot fund the attached value
    #[error("insufficient balance: {caller} holds {available}, needs {needed}")]
    InsufficientBalance {
        caller: String,
        needed: u64,
        available: u64,
    },

    /// Payload (de)serialization failed
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl SimError {
    /// Construct a revert with a reason string
    pub fn revert(reason: impl Into<String>) -> Self {
        SimError::Reverted(reason.into())
    }

    /// True if this is an intentional guard failure
    pub fn is_revert(&self) -> bool {
        matches!(self, SimError::Reverted(_))
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Serialization(err.to_string())
    }
}
