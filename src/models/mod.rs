//! # Domain Models
//!
//! Core data structures representing hosts, credentials, and secure strings.
//!
//! ## Security Design
//!
//! The [`SecureString`] type provides memory-safe credential handling:
//! - Password data is zeroed on drop to prevent leakage via swap/core dumps
//! - Never exposed in `Debug` or `Display` implementations
//!
//! Credentials are stored in the Windows Credential Manager on the host
//! machine, never in plaintext files or logs.
//!
//! ## Credential Resolution
//!
//! ConnectX keeps credentials under two kinds of profile:
//! 1. **Default profile** - the singleton login captured at startup
//! 2. **Host-scoped profiles** - per-server overrides (`ConnectX:Host:<fqdn>`)
//!
//! When connecting to a remote host, profiles are checked in order of
//! specificity: host-scoped → default → none.

pub mod credentials;
pub mod host;

pub use credentials::{CredentialProfile, Credentials, SecureString, Username};
pub use host::{Host, ScanOutcome};
