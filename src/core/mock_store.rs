//! Mock collaborators for testing without real stores or servers
//!
//! Each mock records the calls it receives and can be scripted to fail, so
//! registry, resolver, search, and orchestrator logic can be exercised
//! without SQLite, the Credential Manager, mstsc, or a domain controller.

use super::credential::CredentialStore;
use super::directory::{ConnectionLauncher, DomainScanner, Notifier, NoticeKind};
use super::registry::HostStore;
use super::search::SearchHosts;
use crate::models::{CredentialProfile, Credentials, Host, ScanOutcome, SecureString, Username};
use crate::utils::{CredentialError, TransportError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory host store with scripted failures
pub struct MockHostStore {
    hosts: Mutex<Vec<Host>>,
    save_count: AtomicUsize,
    fail_next_save: Mutex<Option<String>>,
    fail_next_list: Mutex<Option<String>>,
}

impl MockHostStore {
    pub fn new() -> Self {
        MockHostStore {
            hosts: Mutex::new(Vec::new()),
            save_count: AtomicUsize::new(0),
            fail_next_save: Mutex::new(None),
            fail_next_list: Mutex::new(None),
        }
    }

    /// Place a host directly into the backing store, bypassing the registry
    pub fn seed(&self, host: Host) {
        self.hosts.lock().unwrap().push(host);
    }

    /// How many times `save_host` was called
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    /// Make the next `save_host` call fail with `message`
    pub fn fail_next_save(&self, message: &str) {
        *self.fail_next_save.lock().unwrap() = Some(message.to_string());
    }

    /// Make the next `list_hosts` call fail with `message`
    #[allow(dead_code)]
    pub fn fail_next_list(&self, message: &str) {
        *self.fail_next_list.lock().unwrap() = Some(message.to_string());
    }
}

#[async_trait]
impl HostStore for MockHostStore {
    async fn list_hosts(&self) -> Result<Vec<Host>, TransportError> {
        if let Some(message) = self.fail_next_list.lock().unwrap().take() {
            return Err(TransportError::Unreachable(message));
        }
        Ok(self.hosts.lock().unwrap().clone())
    }

    async fn save_host(&self, host: &Host) -> Result<(), TransportError> {
        if let Some(message) = self.fail_next_save.lock().unwrap().take() {
            return Err(TransportError::Unreachable(message));
        }
        self.save_count.fetch_add(1, Ordering::SeqCst);

        let mut hosts = self.hosts.lock().unwrap();
        match hosts.iter_mut().find(|h| h.hostname == host.hostname) {
            Some(existing) => *existing = host.clone(),
            None => hosts.push(host.clone()),
        }
        Ok(())
    }

    async fn delete_host(&self, hostname: &str) -> Result<(), TransportError> {
        self.hosts.lock().unwrap().retain(|h| h.hostname != hostname);
        Ok(())
    }
}

/// In-memory credential store keyed by profile name
pub struct MockCredentialStore {
    entries: Mutex<HashMap<String, (String, String)>>,
    retrieve_count: AtomicUsize,
}

impl MockCredentialStore {
    pub fn new() -> Self {
        MockCredentialStore {
            entries: Mutex::new(HashMap::new()),
            retrieve_count: AtomicUsize::new(0),
        }
    }

    /// How many times `retrieve` was called
    pub fn retrieve_count(&self) -> usize {
        self.retrieve_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialStore for MockCredentialStore {
    async fn store(
        &self,
        profile: &CredentialProfile,
        creds: &Credentials,
    ) -> Result<(), CredentialError> {
        self.entries.lock().unwrap().insert(
            profile.as_str().to_string(),
            (
                creds.username().as_str().to_string(),
                creds.password().as_str().to_string(),
            ),
        );
        Ok(())
    }

    async fn retrieve(
        &self,
        profile: &CredentialProfile,
    ) -> Result<Option<Credentials>, CredentialError> {
        self.retrieve_count.fetch_add(1, Ordering::SeqCst);
        let entries = self.entries.lock().unwrap();
        match entries.get(profile.as_str()) {
            Some((user, pass)) => Ok(Some(Credentials::new(
                Username::new(user.clone())?,
                SecureString::new(pass.clone()),
            ))),
            None => Ok(None),
        }
    }

    async fn exists(&self, profile: &CredentialProfile) -> Result<bool, CredentialError> {
        Ok(self.entries.lock().unwrap().contains_key(profile.as_str()))
    }

    async fn delete(&self, profile: &CredentialProfile) -> Result<(), CredentialError> {
        self.entries.lock().unwrap().remove(profile.as_str());
        Ok(())
    }
}

/// Search collaborator with scripted responses, failures, and delays
pub struct MockSearchBackend {
    queries: Mutex<Vec<String>>,
    responses: Mutex<HashMap<String, Vec<Host>>>,
    failures: Mutex<HashMap<String, String>>,
    delays: Mutex<HashMap<String, Duration>>,
}

impl MockSearchBackend {
    pub fn new() -> Self {
        MockSearchBackend {
            queries: Mutex::new(Vec::new()),
            responses: Mutex::new(HashMap::new()),
            failures: Mutex::new(HashMap::new()),
            delays: Mutex::new(HashMap::new()),
        }
    }

    /// Queries dispatched so far, in order
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    /// Script the result list for `query`
    pub fn respond(&self, query: &str, hosts: Vec<Host>) {
        self.responses
            .lock()
            .unwrap()
            .insert(query.to_string(), hosts);
    }

    /// Script a failure for `query`
    pub fn fail(&self, query: &str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .insert(query.to_string(), message.to_string());
    }

    /// Delay the response for `query` (simulates a slow backend)
    pub fn set_delay(&self, query: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(query.to_string(), delay);
    }
}

#[async_trait]
impl SearchHosts for MockSearchBackend {
    async fn search_hosts(&self, query: &str) -> Result<Vec<Host>, TransportError> {
        self.queries.lock().unwrap().push(query.to_string());

        let delay = self.delays.lock().unwrap().get(query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(message) = self.failures.lock().unwrap().get(query) {
            return Err(TransportError::Backend(message.clone()));
        }

        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_default())
    }
}

/// Notifier recording notices and busy transitions
pub struct RecordingNotifier {
    notices: Mutex<Vec<(NoticeKind, String)>>,
    busy_log: Mutex<Vec<bool>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        RecordingNotifier {
            notices: Mutex::new(Vec::new()),
            busy_log: Mutex::new(Vec::new()),
        }
    }

    pub fn notices(&self) -> Vec<(NoticeKind, String)> {
        self.notices.lock().unwrap().clone()
    }

    pub fn busy_log(&self) -> Vec<bool> {
        self.busy_log.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        self.notices
            .lock()
            .unwrap()
            .push((kind, message.to_string()));
    }

    fn set_busy(&self, busy: bool) {
        self.busy_log.lock().unwrap().push(busy);
    }
}

/// Launcher recording launch requests
pub struct MockLauncher {
    launches: Mutex<Vec<(String, Option<String>)>>,
    inline: AtomicBool,
}

impl MockLauncher {
    pub fn new() -> Self {
        MockLauncher {
            launches: Mutex::new(Vec::new()),
            inline: AtomicBool::new(true),
        }
    }

    /// (hostname, username) pairs launched so far
    pub fn launches(&self) -> Vec<(String, Option<String>)> {
        self.launches.lock().unwrap().clone()
    }

    /// Control whether this launcher wants inline credentials
    pub fn set_inline(&self, inline: bool) {
        self.inline.store(inline, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConnectionLauncher for MockLauncher {
    fn expects_inline_credentials(&self) -> bool {
        self.inline.load(Ordering::SeqCst)
    }

    async fn launch(
        &self,
        host: &Host,
        credentials: Option<&Credentials>,
    ) -> Result<(), TransportError> {
        self.launches.lock().unwrap().push((
            host.hostname.clone(),
            credentials.map(|c| c.username().as_str().to_string()),
        ));
        Ok(())
    }
}

/// Scanner with a scripted outcome or failure
pub struct MockScanner {
    outcome: Mutex<Result<ScanOutcome, String>>,
    calls: AtomicUsize,
}

impl MockScanner {
    pub fn new() -> Self {
        MockScanner {
            outcome: Mutex::new(Ok(ScanOutcome {
                found: 0,
                created: 0,
                removed: 0,
                total: 0,
            })),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn set_outcome(&self, outcome: ScanOutcome) {
        *self.outcome.lock().unwrap() = Ok(outcome);
    }

    pub fn fail(&self, message: &str) {
        *self.outcome.lock().unwrap() = Err(message.to_string());
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DomainScanner for MockScanner {
    async fn scan(&self, _domain: &str, _server: &str) -> Result<ScanOutcome, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome
            .lock()
            .unwrap()
            .clone()
            .map_err(TransportError::Unreachable)
    }
}
