//! ConnectX - host directory and credential resolution backend
//!
//! Core library exposing platform-agnostic types and traits.

// Public modules
pub mod constants;
pub mod core;
pub mod db;
pub mod logger;
pub mod models;
pub mod scan;
pub mod utils;

// Platform-specific modules
#[cfg(windows)]
pub mod platform;

// Re-export commonly used types
pub use crate::core::{
    Confirm, ConnectionLauncher, CredentialResolver, CredentialStore, DirectoryService,
    DomainScanner, HostRegistry, HostStore, IdentifierMode, NoticeKind, Notifier,
    SearchController, SearchDisplay, SearchHosts, SearchState,
};
pub use db::SqliteHostStore;
pub use models::{CredentialProfile, Credentials, Host, ScanOutcome, SecureString, Username};
pub use scan::LdapScanner;
pub use utils::{CredentialError, DirectoryError, TransportError};
