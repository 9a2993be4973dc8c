//! # Utilities Module
//!
//! Cross-cutting concerns shared throughout the application.
//!
//! Error types are defined in this module to avoid circular dependencies
//! between the `core` and `platform` modules. All domain errors share a common
//! hierarchy so the embedding UI can handle them uniformly at its command
//! boundary.

pub mod errors;

pub use errors::{CredentialError, DirectoryError, TransportError};
