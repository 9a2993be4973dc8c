//! Directory orchestrator: user intents over the registry and resolver
//!
//! `DirectoryService` serves the five directory intents (add, edit, delete,
//! search, connect) plus the long-running domain scan. Every outcome is
//! converted into a user-visible notification through the [`Notifier`], and
//! every mutation leaves the registry reloaded so the visible list reflects
//! the latest external state.

use crate::core::credential::CredentialResolver;
use crate::core::registry::HostRegistry;
use crate::core::search::{SearchController, SearchDisplay};
use crate::core::validation::{is_valid_domain, is_valid_server_in_domain};
use crate::logger;
use crate::models::{Credentials, Host, ScanOutcome};
use crate::utils::{DirectoryError, TransportError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::watch;

/// Severity of a user-visible notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Sink for user-visible notifications (toasts in the shipped UI)
pub trait Notifier: Send + Sync {
    /// Show a notification
    fn notify(&self, kind: NoticeKind, message: &str);

    /// Enter or leave the busy/disabled state during long-running work
    fn set_busy(&self, _busy: bool) {}
}

/// External connection launcher (mstsc in the shipped implementation)
#[async_trait]
pub trait ConnectionLauncher: Send + Sync {
    /// Whether the launcher wants credentials attached to the launch request.
    ///
    /// When false, the host record alone is forwarded and the launcher does
    /// its own prompting.
    fn expects_inline_credentials(&self) -> bool {
        true
    }

    /// Launch a connection to `host`
    async fn launch(
        &self,
        host: &Host,
        credentials: Option<&Credentials>,
    ) -> Result<(), TransportError>;
}

/// External domain-scanning collaborator.
///
/// Discovery and store population are entirely the scanner's business; the
/// orchestrator only validates input, tracks the busy state, and reloads the
/// registry afterwards.
#[async_trait]
pub trait DomainScanner: Send + Sync {
    /// Scan `domain`, querying the directory server `server`
    async fn scan(&self, domain: &str, server: &str) -> Result<ScanOutcome, TransportError>;
}

/// Explicit confirmation for destructive actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirm {
    Yes,
    No,
}

/// Composes registry, resolver, search, launcher, and scanner to serve user
/// intents
pub struct DirectoryService {
    registry: Arc<HostRegistry>,
    resolver: CredentialResolver,
    search: SearchController,
    launcher: Arc<dyn ConnectionLauncher>,
    scanner: Arc<dyn DomainScanner>,
    notifier: Arc<dyn Notifier>,
}

impl DirectoryService {
    pub fn new(
        registry: Arc<HostRegistry>,
        resolver: CredentialResolver,
        search: SearchController,
        launcher: Arc<dyn ConnectionLauncher>,
        scanner: Arc<dyn DomainScanner>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        DirectoryService {
            registry,
            resolver,
            search,
            launcher,
            scanner,
            notifier,
        }
    }

    /// The registry backing this service
    pub fn registry(&self) -> &HostRegistry {
        &self.registry
    }

    /// The credential resolver backing this service
    pub fn resolver(&self) -> &CredentialResolver {
        &self.resolver
    }

    fn report<T>(
        &self,
        result: Result<T, DirectoryError>,
        success_message: &str,
    ) -> Result<T, DirectoryError> {
        match &result {
            Ok(_) => self.notifier.notify(NoticeKind::Success, success_message),
            Err(err) => self.notifier.notify(NoticeKind::Error, &err.to_string()),
        }
        result
    }

    /// Add intent: validate, persist, reload, notify
    pub async fn add_host(&self, host: Host) -> Result<(), DirectoryError> {
        let message = format!("Host {} added", host.hostname);
        let result = self.registry.add(host).await;
        self.report(result, &message)
    }

    /// Edit intent: overwrite an existing record's fields
    pub async fn edit_host(&self, host: Host) -> Result<(), DirectoryError> {
        let message = format!("Host {} updated", host.hostname);
        let result = self.registry.update(host).await;
        self.report(result, &message)
    }

    /// Delete intent.
    ///
    /// Destructive, so it requires explicit confirmation; `Confirm::No` is a
    /// silent no-op (the user changed their mind, nothing to report).
    pub async fn delete_host(
        &self,
        hostname: &str,
        confirm: Confirm,
    ) -> Result<(), DirectoryError> {
        if confirm == Confirm::No {
            return Ok(());
        }

        let message = format!("Host {} deleted", hostname);
        let result = self.registry.remove(hostname).await;
        self.report(result, &message)
    }

    /// Save per-host credentials (from the credentials dialog)
    pub async fn save_host_credentials(
        &self,
        hostname: &str,
        creds: &Credentials,
    ) -> Result<(), DirectoryError> {
        let result = match self.registry.find(hostname).await {
            None => Err(DirectoryError::NotFound(hostname.to_string())),
            Some(_) => self
                .resolver
                .save_for_host(hostname, creds)
                .await
                .map_err(DirectoryError::from),
        };
        self.report(result, &format!("Credentials saved for {}", hostname))
    }

    /// Search intent: forward an input change to the debounced controller
    pub fn search_input(&self, query: &str) {
        self.search.input(query);
    }

    /// Search intent: dispatch immediately (explicit search button)
    pub fn search_now(&self, query: &str) {
        self.search.search_now(query);
    }

    /// Subscribe to search display updates
    pub fn search_updates(&self) -> watch::Receiver<SearchDisplay> {
        self.search.subscribe()
    }

    /// Connect intent: resolve credentials and hand off to the launcher
    pub async fn connect(&self, hostname: &str) -> Result<(), DirectoryError> {
        let message = format!("Connecting to {}", hostname);
        let result = self.connect_inner(hostname).await;
        self.report(result, &message)
    }

    async fn connect_inner(&self, hostname: &str) -> Result<(), DirectoryError> {
        let host = self
            .registry
            .find(hostname)
            .await
            .ok_or_else(|| DirectoryError::NotFound(hostname.to_string()))?;

        let credentials = if self.launcher.expects_inline_credentials() {
            self.resolver.resolve(hostname).await?
        } else {
            None
        };

        self.launcher
            .launch(&host, credentials.as_ref())
            .await
            .map_err(DirectoryError::from)
    }

    /// Scan intent: validate, delegate to the scanner, reload regardless.
    ///
    /// The registry is reloaded even when the scan fails: a partial scan may
    /// still have added hosts to the store.
    pub async fn scan_domain(
        &self,
        domain: &str,
        server: &str,
    ) -> Result<ScanOutcome, DirectoryError> {
        let domain = domain.trim();
        let server = server.trim();

        if !is_valid_domain(domain) {
            let err = DirectoryError::Validation(
                "Please enter a valid domain name (e.g., domain.com)".to_string(),
            );
            self.notifier.notify(NoticeKind::Error, &err.to_string());
            return Err(err);
        }

        if !is_valid_server_in_domain(server, domain) {
            let err = DirectoryError::Validation(format!(
                "Server must be a valid FQDN ending with .{}",
                domain
            ));
            self.notifier.notify(NoticeKind::Error, &err.to_string());
            return Err(err);
        }

        self.notifier.set_busy(true);
        let scanned = self.scanner.scan(domain, server).await;

        if let Err(err) = self.registry.reload().await {
            logger::log_warn(&format!("scan_domain: post-scan reload failed: {}", err));
        }
        self.notifier.set_busy(false);

        match scanned {
            Ok(outcome) => {
                self.notifier
                    .notify(NoticeKind::Success, &outcome.to_string());
                Ok(outcome)
            }
            Err(err) => {
                let err = DirectoryError::from(err);
                self.notifier
                    .notify(NoticeKind::Error, &format!("Failed to scan domain: {}", err));
                Err(err)
            }
        }
    }
}
