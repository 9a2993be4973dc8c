//! Credential storage trait and resolution chain
//!
//! The store trait is platform-agnostic; the Windows Credential Manager
//! implementation lives in `src/platform/`. Resolution walks an ordered chain
//! of profiles and stops at the first hit, so a user can keep one default
//! login and override only the hosts that differ.

use crate::models::{CredentialProfile, Credentials};
use crate::utils::CredentialError;
use async_trait::async_trait;
use std::sync::Arc;

/// Platform-agnostic credential storage
///
/// Implementations handle platform-specific secure storage (Windows
/// Credential Manager, macOS Keychain, Linux Secret Service, etc.)
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Store credentials under a profile name
    ///
    /// # Security
    /// - Credentials MUST be stored encrypted
    /// - MUST use OS-provided secure storage
    /// - MUST NOT log password values
    async fn store(
        &self,
        profile: &CredentialProfile,
        creds: &Credentials,
    ) -> Result<(), CredentialError>;

    /// Retrieve credentials by profile
    ///
    /// # Returns
    /// * `Ok(Some(credentials))` - If credentials exist
    /// * `Ok(None)` - If no credentials stored (not an error)
    /// * `Err(CredentialError)` - If an error occurred during retrieval
    async fn retrieve(
        &self,
        profile: &CredentialProfile,
    ) -> Result<Option<Credentials>, CredentialError>;

    /// Check if a profile exists
    async fn exists(&self, profile: &CredentialProfile) -> Result<bool, CredentialError>;

    /// Delete a profile
    ///
    /// Idempotent: succeeds even if the profile doesn't exist.
    async fn delete(&self, profile: &CredentialProfile) -> Result<(), CredentialError>;
}

/// Resolves the credentials to present for a host.
///
/// Resolution is a chain of profile lookups attempted in order, first hit
/// wins:
/// 1. the host-scoped profile for the hostname
/// 2. the default (singleton) profile
/// 3. none: the caller treats this as "no prefill", not an error
///
/// Credentials are never cached here; every call goes to the store.
pub struct CredentialResolver {
    store: Arc<dyn CredentialStore>,
}

impl CredentialResolver {
    /// Create a resolver over a credential store
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        CredentialResolver { store }
    }

    /// The ordered profile chain consulted for `hostname`
    fn chain(hostname: &str) -> [CredentialProfile; 2] {
        [
            CredentialProfile::for_host(hostname),
            CredentialProfile::default(),
        ]
    }

    /// Resolve the credentials to present for `hostname`
    pub async fn resolve(&self, hostname: &str) -> Result<Option<Credentials>, CredentialError> {
        for profile in Self::chain(hostname) {
            if let Some(creds) = self.store.retrieve(&profile).await? {
                return Ok(Some(creds));
            }
        }
        Ok(None)
    }

    /// Save a host-scoped credential entry.
    ///
    /// Always writes the host-scoped profile; the default tier is never
    /// mutated from here. Last write wins.
    pub async fn save_for_host(
        &self,
        hostname: &str,
        creds: &Credentials,
    ) -> Result<(), CredentialError> {
        self.store
            .store(&CredentialProfile::for_host(hostname), creds)
            .await
    }

    /// Read the default (singleton) credentials, if any
    pub async fn default_credentials(&self) -> Result<Option<Credentials>, CredentialError> {
        self.store.retrieve(&CredentialProfile::default()).await
    }

    /// Save the default (singleton) credentials
    pub async fn save_default(&self, creds: &Credentials) -> Result<(), CredentialError> {
        self.store.store(&CredentialProfile::default(), creds).await
    }

    /// Delete the default (singleton) credentials
    pub async fn delete_default(&self) -> Result<(), CredentialError> {
        self.store.delete(&CredentialProfile::default()).await
    }
}
