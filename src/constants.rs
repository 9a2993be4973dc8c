//! # Application-Wide Constants
//!
//! Centralized configuration values and magic numbers used throughout ConnectX.
//!
//! Constants are defined here (rather than scattered across modules) to keep a
//! single source of truth: a grep for a constant name finds the definition and
//! every use, and limits stay consistent between the validator, the registry,
//! and the stores.

use std::time::Duration;

// ============================================================================
// Identity / Storage
// ============================================================================

/// Application name, used for the AppData directory and credential targets
pub const APP_NAME: &str = "ConnectX";

/// SQLite database file name inside the AppData directory
pub const DB_FILE_NAME: &str = "connectx.db";

/// Credential Manager target for the default (singleton) login
pub const DEFAULT_CREDENTIAL_TARGET: &str = "ConnectX:Default";

/// Prefix for host-scoped credential targets (`ConnectX:Host:<fqdn>`)
pub const HOST_CREDENTIAL_PREFIX: &str = "ConnectX:Host:";

/// Prefix mstsc reads single-sign-on credentials from (`TERMSRV/<fqdn>`)
pub const TERMSRV_PREFIX: &str = "TERMSRV/";

// ============================================================================
// Identifier Limits
// ============================================================================

/// Maximum total length of a fully-qualified domain name (RFC 1035)
pub const MAX_FQDN_LENGTH: usize = 253;

/// Maximum length of a single DNS label (RFC 1035)
pub const MAX_LABEL_LENGTH: usize = 63;

/// Maximum total length of an email-style identifier (RFC 5321)
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum username length accepted by the credential model
pub const MAX_USERNAME_LENGTH: usize = 256;

// ============================================================================
// Search
// ============================================================================

/// Debounce window between the last keystroke and a search dispatch.
///
/// Keystrokes arriving inside this window replace the pending query; only the
/// last one is ever sent to the search collaborator.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

// ============================================================================
// Connection Launch
// ============================================================================

/// Default RDP port, used by the generated connection file
pub const DEFAULT_RDP_PORT: u16 = 3389;

/// LDAP port used by the domain scanner
pub const LDAP_PORT: u16 = 389;

/// How long a generated .rdp file stays on disk before cleanup.
///
/// mstsc reads the file once at startup; one second covers process spawn on a
/// loaded machine.
pub const RDP_FILE_LINGER: Duration = Duration::from_secs(1);

/// Windows API flag to create a process without a visible console window
#[cfg(windows)]
pub const CREATE_NO_WINDOW: u32 = 0x08000000;
