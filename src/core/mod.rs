//! Core business logic (platform-agnostic)
//!
//! CRITICAL: This module MUST NOT import platform-specific code or UI frameworks.

pub mod credential;
pub mod directory;
pub mod registry;
pub mod search;
pub mod validation;

// Test utilities for mock collaborators (tests only)
#[cfg(test)]
pub mod mock_store;

pub use credential::{CredentialResolver, CredentialStore};
pub use directory::{
    Confirm, ConnectionLauncher, DirectoryService, DomainScanner, NoticeKind, Notifier,
};
pub use registry::{HostRegistry, HostStore};
pub use search::{SearchController, SearchDisplay, SearchHosts, SearchState};
pub use validation::{
    is_valid_domain, is_valid_email_identifier, is_valid_fqdn, is_valid_server_in_domain,
    IdentifierMode,
};
