//! Incremental host search with debounce and stale-response discard
//!
//! The controller sits between keystrokes and the search collaborator. Input
//! changes arm a debounce timer; only the last query scheduled inside the
//! window is dispatched, and each dispatch takes a monotonically increasing
//! sequence number. A response is applied only if its number still equals the
//! latest dispatched number; responses that resolve after a newer dispatch
//! (or after the query was cleared) are discarded instead of overwriting the
//! display.

use crate::constants::SEARCH_DEBOUNCE;
use crate::models::Host;
use crate::utils::TransportError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Search collaborator: the registry's store, or a remote search service.
///
/// Substring/fuzzy matching policy belongs to the implementation.
#[async_trait]
pub trait SearchHosts: Send + Sync {
    /// Return the hosts matching `query`
    async fn search_hosts(&self, query: &str) -> Result<Vec<Host>, TransportError>;
}

/// What the search pane should currently show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchDisplay {
    /// No query: show the placeholder
    Idle,
    /// Matching hosts for the most recently dispatched query
    Results(Vec<Host>),
    /// The query dispatched and matched nothing (distinct from Idle)
    NoMatches,
    /// The current query's request failed
    Failed(String),
}

/// Controller state: Idle (no query) or Querying (request in flight or a
/// result rendered)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    Idle,
    Querying,
}

struct SearchInner {
    backend: Arc<dyn SearchHosts>,
    debounce: Duration,
    /// Latest dispatched sequence number; bumped on dispatch and on reset
    seq: AtomicU64,
    idle: AtomicBool,
    pending: Mutex<Option<JoinHandle<()>>>,
    display: watch::Sender<SearchDisplay>,
}

impl SearchInner {
    fn cancel_pending(&self) {
        if let Some(handle) = self
            .pending
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take()
        {
            handle.abort();
        }
    }

    fn set_pending(&self, handle: JoinHandle<()>) {
        let mut pending = self.pending.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(old) = pending.replace(handle) {
            old.abort();
        }
    }

    async fn dispatch(self: Arc<Self>, query: String) {
        let ticket = self.seq.fetch_add(1, Ordering::SeqCst) + 1;

        let outcome = self.backend.search_hosts(&query).await;

        // Discard if a newer query was dispatched (or the box was cleared)
        // while this request was in flight.
        if self.seq.load(Ordering::SeqCst) != ticket {
            return;
        }

        let display = match outcome {
            Ok(hosts) if hosts.is_empty() => SearchDisplay::NoMatches,
            Ok(hosts) => SearchDisplay::Results(hosts),
            Err(err) => SearchDisplay::Failed(err.to_string()),
        };
        self.display.send_replace(display);
    }
}

/// Debounced query-to-results pipeline over a [`SearchHosts`] collaborator
///
/// Display updates are published through a watch channel; the embedding UI
/// subscribes and renders the latest [`SearchDisplay`].
pub struct SearchController {
    inner: Arc<SearchInner>,
}

impl SearchController {
    /// Create a controller with the standard debounce window
    pub fn new(backend: Arc<dyn SearchHosts>) -> Self {
        Self::with_debounce(backend, SEARCH_DEBOUNCE)
    }

    /// Create a controller with an explicit debounce window
    pub fn with_debounce(backend: Arc<dyn SearchHosts>, debounce: Duration) -> Self {
        let (display, _) = watch::channel(SearchDisplay::Idle);
        SearchController {
            inner: Arc::new(SearchInner {
                backend,
                debounce,
                seq: AtomicU64::new(0),
                idle: AtomicBool::new(true),
                pending: Mutex::new(None),
                display,
            }),
        }
    }

    /// Subscribe to display updates
    pub fn subscribe(&self) -> watch::Receiver<SearchDisplay> {
        self.inner.display.subscribe()
    }

    /// The latest display value
    pub fn display(&self) -> SearchDisplay {
        self.inner.display.borrow().clone()
    }

    /// Current controller state
    pub fn state(&self) -> SearchState {
        if self.inner.idle.load(Ordering::SeqCst) {
            SearchState::Idle
        } else {
            SearchState::Querying
        }
    }

    /// React to a search-box input change.
    ///
    /// An empty (after trimming) query returns to Idle immediately with no
    /// backend call; a non-empty query arms (or re-arms) the debounce timer.
    /// Must be called from within a tokio runtime.
    pub fn input(&self, raw: &str) {
        let query = raw.trim();
        if query.is_empty() {
            self.reset();
            return;
        }
        self.schedule(query.to_string(), self.inner.debounce);
    }

    /// Dispatch `raw` immediately, bypassing the debounce timer.
    ///
    /// Any pending timer is cancelled. An empty query resets to Idle.
    pub fn search_now(&self, raw: &str) {
        let query = raw.trim();
        if query.is_empty() {
            self.reset();
            return;
        }
        self.schedule(query.to_string(), Duration::ZERO);
    }

    fn schedule(&self, query: String, delay: Duration) {
        self.inner.idle.store(false, Ordering::SeqCst);
        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            // Detach the dispatch: cancelling this timer must only stop
            // queries that were never sent. Once a request is in flight it
            // runs to completion and its response is discarded by sequence
            // number if superseded.
            tokio::spawn(inner.dispatch(query));
        });
        self.inner.set_pending(handle);
    }

    fn reset(&self) {
        self.inner.cancel_pending();
        // Invalidate any in-flight response so it cannot overwrite the
        // placeholder.
        self.inner.seq.fetch_add(1, Ordering::SeqCst);
        self.inner.idle.store(true, Ordering::SeqCst);
        self.inner.display.send_replace(SearchDisplay::Idle);
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.inner.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mock_store::MockSearchBackend;
    use tokio::time::sleep;

    const TEST_DEBOUNCE: Duration = Duration::from_millis(40);

    fn controller(backend: Arc<MockSearchBackend>) -> SearchController {
        SearchController::with_debounce(backend, TEST_DEBOUNCE)
    }

    #[tokio::test]
    async fn empty_input_goes_idle_without_dispatch() {
        let backend = Arc::new(MockSearchBackend::new());
        let search = controller(backend.clone());

        search.input("   ");
        sleep(TEST_DEBOUNCE * 3).await;

        assert_eq!(search.state(), SearchState::Idle);
        assert_eq!(search.display(), SearchDisplay::Idle);
        assert!(backend.queries().is_empty());
    }

    #[tokio::test]
    async fn debounce_dispatches_only_last_of_rapid_inputs() {
        let backend = Arc::new(MockSearchBackend::new());
        backend.respond("abc", vec![Host::new("abc.example.com", "")]);
        let search = controller(backend.clone());

        search.input("a");
        search.input("ab");
        search.input("abc");
        sleep(TEST_DEBOUNCE * 5).await;

        assert_eq!(backend.queries(), vec!["abc".to_string()]);
        assert_eq!(
            search.display(),
            SearchDisplay::Results(vec![Host::new("abc.example.com", "")])
        );
    }

    #[tokio::test]
    async fn search_now_bypasses_debounce_and_cancels_pending() {
        let backend = Arc::new(MockSearchBackend::new());
        backend.respond("direct", vec![Host::new("direct.example.com", "")]);
        let search = controller(backend.clone());

        search.input("pending");
        search.search_now("direct");
        sleep(TEST_DEBOUNCE * 5).await;

        // The pending debounced query was cancelled, never dispatched
        assert_eq!(backend.queries(), vec!["direct".to_string()]);
    }

    #[tokio::test]
    async fn stale_response_does_not_overwrite_newer_result() {
        let backend = Arc::new(MockSearchBackend::new());
        backend.respond("a", vec![Host::new("a-only.example.com", "")]);
        backend.set_delay("a", Duration::from_millis(150));
        backend.respond("ab", vec![Host::new("ab.example.com", "")]);
        let search = controller(backend.clone());

        search.search_now("a");
        sleep(Duration::from_millis(20)).await;
        search.search_now("ab");

        // "ab" resolves first and is rendered
        sleep(Duration::from_millis(60)).await;
        assert_eq!(
            search.display(),
            SearchDisplay::Results(vec![Host::new("ab.example.com", "")])
        );

        // The late "a" response is discarded
        sleep(Duration::from_millis(150)).await;
        assert_eq!(
            search.display(),
            SearchDisplay::Results(vec![Host::new("ab.example.com", "")])
        );
    }

    #[tokio::test]
    async fn zero_results_renders_no_matches_not_idle() {
        let backend = Arc::new(MockSearchBackend::new());
        let search = controller(backend.clone());

        search.search_now("nothing");
        sleep(TEST_DEBOUNCE * 3).await;

        assert_eq!(search.display(), SearchDisplay::NoMatches);
        assert_eq!(search.state(), SearchState::Querying);
    }

    #[tokio::test]
    async fn failure_of_current_query_renders_error() {
        let backend = Arc::new(MockSearchBackend::new());
        backend.fail("boom", "search backend offline");
        let search = controller(backend.clone());

        search.search_now("boom");
        sleep(TEST_DEBOUNCE * 3).await;

        match search.display() {
            SearchDisplay::Failed(msg) => assert!(msg.contains("search backend offline")),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn clearing_query_discards_in_flight_response() {
        let backend = Arc::new(MockSearchBackend::new());
        backend.respond("slow", vec![Host::new("slow.example.com", "")]);
        backend.set_delay("slow", Duration::from_millis(100));
        let search = controller(backend.clone());

        search.search_now("slow");
        sleep(Duration::from_millis(20)).await;
        search.input("");

        sleep(Duration::from_millis(150)).await;
        assert_eq!(search.display(), SearchDisplay::Idle);
        assert_eq!(search.state(), SearchState::Idle);
    }
}
