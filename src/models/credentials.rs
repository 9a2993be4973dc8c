//! Credential model types for ConnectX
//!
//! SECURITY: Credential types implement Drop to clear sensitive data.

use crate::constants::{
    DEFAULT_CREDENTIAL_TARGET, HOST_CREDENTIAL_PREFIX, MAX_USERNAME_LENGTH, TERMSRV_PREFIX,
};
use crate::utils::CredentialError;
use std::fmt;

/// Windows username in various formats
///
/// Valid formats:
/// - `user` (local user)
/// - `DOMAIN\\user` (domain user)
/// - `user@domain.com` (UPN format)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// Create a new username after validation
    pub fn new(username: impl Into<String>) -> Result<Self, CredentialError> {
        let username = username.into();

        if username.is_empty() {
            return Err(CredentialError::InvalidUsername(
                "Username cannot be empty".to_string(),
            ));
        }

        if username.len() > MAX_USERNAME_LENGTH {
            return Err(CredentialError::InvalidUsername(format!(
                "Username exceeds maximum length ({})",
                MAX_USERNAME_LENGTH
            )));
        }

        Ok(Username(username))
    }

    /// Get the username as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Username {
    type Error = CredentialError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Username::new(value)
    }
}

impl TryFrom<&str> for Username {
    type Error = CredentialError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Username::new(value)
    }
}

/// Password that zeros memory on drop
///
/// SECURITY: This type never implements Display or Debug in a way that
/// reveals the password.
pub struct SecureString(String);

impl Clone for SecureString {
    fn clone(&self) -> Self {
        SecureString(self.0.clone())
    }
}

impl SecureString {
    /// Create a new secure string
    pub fn new(password: impl Into<String>) -> Self {
        SecureString(password.into())
    }

    /// Get the password as a string slice
    ///
    /// Use this sparingly and only when necessary for API calls.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the length of the password
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the password is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Drop for SecureString {
    fn drop(&mut self) {
        // SAFETY: We own this String and are zeroing it before drop
        unsafe {
            let bytes = self.0.as_bytes_mut();
            for byte in bytes {
                std::ptr::write_volatile(byte, 0);
            }
        }
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // SECURITY: Never reveal the password content
        write!(f, "SecureString(*** {} bytes ***)", self.0.len())
    }
}

/// Login credentials for a remote connection
#[derive(Clone, Debug)]
pub struct Credentials {
    username: Username,
    password: SecureString,
}

impl Credentials {
    /// Create new credentials
    pub fn new(username: Username, password: SecureString) -> Self {
        Credentials { username, password }
    }

    /// Get the username
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Get the password
    pub fn password(&self) -> &SecureString {
        &self.password
    }
}

/// Reference to a stored credential entry
///
/// This is just a storage key, not the actual credentials. Three kinds of
/// target exist:
/// - the default (singleton) login, `ConnectX:Default`
/// - a host-scoped override, `ConnectX:Host:<fqdn>`
/// - the mstsc single-sign-on seed, `TERMSRV/<fqdn>`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CredentialProfile(String);

impl CredentialProfile {
    /// Create a profile reference from a raw target name
    pub fn new(name: impl Into<String>) -> Self {
        CredentialProfile(name.into())
    }

    /// Profile holding the host-scoped credentials for `hostname`
    pub fn for_host(hostname: &str) -> Self {
        CredentialProfile(format!("{}{}", HOST_CREDENTIAL_PREFIX, hostname))
    }

    /// Profile mstsc reads when connecting to `hostname`
    pub fn termsrv(hostname: &str) -> Self {
        CredentialProfile(format!("{}{}", TERMSRV_PREFIX, hostname))
    }

    /// Get the profile name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CredentialProfile {
    fn default() -> Self {
        CredentialProfile(DEFAULT_CREDENTIAL_TARGET.to_string())
    }
}

impl fmt::Display for CredentialProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
