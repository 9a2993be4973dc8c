//! Error types for ConnectX
//!
//! All error types use thiserror for clean error handling.
//! SECURITY: Error messages MUST NOT contain passwords or sensitive data.

/// Top-level error type for host directory operations
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// Input failed identifier validation; never reaches a collaborator
    #[error("Validation error: {0}")]
    Validation(String),

    /// A host with this hostname already exists in the registry
    #[error("Host already exists: {0}")]
    Conflict(String),

    /// Operation referenced a hostname the registry does not hold
    #[error("Host not found: {0}")]
    NotFound(String),

    /// An external collaborator failed or was unreachable
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Errors from external collaborators (stores, launcher, scanner)
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Collaborator unreachable: {0}")]
    Unreachable(String),

    #[error("Backend failure: {0}")]
    Backend(String),
}

/// Errors from credential storage operations
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("Credential store error: {0}")]
    Platform(String),

    #[error("Invalid username format: {0}")]
    InvalidUsername(String),

    #[error("Invalid credential format")]
    InvalidFormat,
}

impl From<CredentialError> for DirectoryError {
    fn from(err: CredentialError) -> Self {
        DirectoryError::Transport(TransportError::Backend(err.to_string()))
    }
}
