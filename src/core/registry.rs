//! Host registry: in-memory directory cache over a persistent store
//!
//! The registry owns a read-through cache of the full host list. Every
//! mutation goes to the store first and is followed by a full reload; the
//! cache is never patched incrementally, so after any successful operation it
//! reflects exactly what the store returned. On a store failure the cache is
//! left at its last successfully reloaded state.

use crate::core::validation::IdentifierMode;
use crate::models::Host;
use crate::utils::{DirectoryError, TransportError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Persistent host storage
///
/// Implementations provide the canonical copy of the directory (SQLite
/// locally, or a remote inventory service). All methods are request/response;
/// no ordering is guaranteed between concurrent mutations.
#[async_trait]
pub trait HostStore: Send + Sync {
    /// Return every host record, in the store's own order
    async fn list_hosts(&self) -> Result<Vec<Host>, TransportError>;

    /// Insert or update a record, keyed by hostname
    async fn save_host(&self, host: &Host) -> Result<(), TransportError>;

    /// Delete the record for `hostname`
    async fn delete_host(&self, hostname: &str) -> Result<(), TransportError>;
}

/// In-memory host directory synchronized with a [`HostStore`]
pub struct HostRegistry {
    store: Arc<dyn HostStore>,
    mode: IdentifierMode,
    cache: RwLock<Vec<Host>>,
}

impl HostRegistry {
    /// Create a registry over `store` using the default FQDN identifier mode.
    ///
    /// The cache starts empty; call [`HostRegistry::reload`] to populate it.
    pub fn new(store: Arc<dyn HostStore>) -> Self {
        Self::with_mode(store, IdentifierMode::default())
    }

    /// Create a registry with an explicit identifier mode
    pub fn with_mode(store: Arc<dyn HostStore>, mode: IdentifierMode) -> Self {
        HostRegistry {
            store,
            mode,
            cache: RwLock::new(Vec::new()),
        }
    }

    /// The identifier mode this registry validates hostnames against
    pub fn mode(&self) -> IdentifierMode {
        self.mode
    }

    /// Replace the cache with a fresh copy from the store.
    ///
    /// On failure the previous cache contents are kept.
    pub async fn reload(&self) -> Result<(), DirectoryError> {
        let hosts = self.store.list_hosts().await?;
        *self.cache.write().await = hosts;
        Ok(())
    }

    /// Return the cached host list, in store order
    pub async fn list(&self) -> Vec<Host> {
        self.cache.read().await.clone()
    }

    /// Look up a host by exact (case-sensitive) hostname
    pub async fn find(&self, hostname: &str) -> Option<Host> {
        self.cache
            .read()
            .await
            .iter()
            .find(|h| h.hostname == hostname)
            .cloned()
    }

    /// Register a new host.
    ///
    /// Fails with `Validation` if the hostname does not match the configured
    /// identifier mode, and with `Conflict` if a record with the same
    /// hostname already exists.
    pub async fn add(&self, host: Host) -> Result<(), DirectoryError> {
        if !self.mode.is_valid(&host.hostname) {
            return Err(DirectoryError::Validation(format!(
                "'{}' is not a valid hostname (expected format: {})",
                host.hostname,
                self.mode.expected_format()
            )));
        }

        if self.find(&host.hostname).await.is_some() {
            return Err(DirectoryError::Conflict(host.hostname));
        }

        self.store.save_host(&host).await?;
        self.reload().await
    }

    /// Overwrite the description/address of an existing host.
    ///
    /// Keyed by hostname; fails with `NotFound` if no such record exists.
    pub async fn update(&self, host: Host) -> Result<(), DirectoryError> {
        if self.find(&host.hostname).await.is_none() {
            return Err(DirectoryError::NotFound(host.hostname));
        }

        self.store.save_host(&host).await?;
        self.reload().await
    }

    /// Remove a host from the directory.
    ///
    /// Fails with `NotFound` if no such record exists. Host-scoped
    /// credentials are not cascade-deleted; the credential store keeps its
    /// own cleanup policy.
    pub async fn remove(&self, hostname: &str) -> Result<(), DirectoryError> {
        if self.find(hostname).await.is_none() {
            return Err(DirectoryError::NotFound(hostname.to_string()));
        }

        self.store.delete_host(hostname).await?;
        self.reload().await
    }
}
