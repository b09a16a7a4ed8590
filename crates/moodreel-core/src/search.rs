//! Live search: keystrokes in, at most one catalog request per settled input.
//!
//! Every keystroke aborts the pending debounce timer and starts a new one.
//! When the quiet period ends with a value that differs from the last one that
//! reached the catalog, a request is issued under a fresh sequence number; a
//! response is published only if its number is still the latest. Empty input
//! skips the timer and resets to idle at once.

use moodreel_catalog::{CatalogError, MovieCatalog};
use moodreel_models::{Movie, MoviePage};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::messages::SEARCH_FAILED;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Debouncing,
    Loading,
    Success,
    Failed,
}

/// What a search view renders.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub phase: SearchPhase,
    /// Latest raw input
    pub query: String,
    pub results: Vec<Movie>,
    pub error: Option<String>,
}

impl SearchState {
    fn idle(query: &str) -> Self {
        Self {
            phase: SearchPhase::Idle,
            query: query.to_string(),
            results: Vec::new(),
            error: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SearchPhase::Debouncing | SearchPhase::Loading)
    }

    /// Settled on a query that matched nothing
    pub fn is_empty_result(&self) -> bool {
        self.phase == SearchPhase::Success && self.results.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub debounce: Duration,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

struct Control {
    debounce_task: Option<JoinHandle<()>>,
    request_task: Option<JoinHandle<()>>,
    /// Bumped per keystroke; a timer only fires for the keystroke that started it
    input_seq: u64,
    /// Bumped per issued request and on reset
    request_seq: u64,
    last_issued: Option<String>,
    /// Phase shown once a duplicate settles or a debounce is abandoned
    settled: SearchPhase,
    closed: bool,
}

impl Control {
    fn abort_debounce(&mut self) {
        if let Some(task) = self.debounce_task.take() {
            task.abort();
        }
    }

    fn abort_request(&mut self) {
        if let Some(task) = self.request_task.take() {
            task.abort();
        }
    }
}

struct Shared {
    catalog: Arc<dyn MovieCatalog>,
    debounce: Duration,
    state: watch::Sender<SearchState>,
    control: Mutex<Control>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs when the quiet period of keystroke `input_seq` has elapsed.
    fn settle(self: &Arc<Self>, input_seq: u64, query: String) {
        let mut control = self.lock();
        if control.closed || control.input_seq != input_seq {
            return;
        }
        control.debounce_task = None;

        if control.last_issued.as_deref() == Some(query.as_str()) {
            debug!(query = %query, "Query unchanged, not searching again");
            // the same query may still be in flight
            let phase = if control.request_task.is_some() {
                SearchPhase::Loading
            } else {
                control.settled
            };
            self.state.send_modify(|s| s.phase = phase);
            return;
        }

        control.abort_request();
        control.request_seq += 1;
        let seq = control.request_seq;
        control.last_issued = Some(query.clone());
        self.state.send_modify(|s| {
            s.phase = SearchPhase::Loading;
            s.error = None;
        });

        debug!(catalog = self.catalog.catalog_name(), query = %query, seq, "Searching catalog");
        let shared = Arc::clone(self);
        control.request_task = Some(tokio::spawn(async move {
            let outcome = shared.catalog.search(&query, None).await;
            shared.complete(seq, &query, outcome);
        }));
    }

    fn complete(&self, seq: u64, query: &str, outcome: Result<MoviePage, CatalogError>) {
        let mut control = self.lock();
        if control.closed || control.request_seq != seq {
            debug!(query = %query, seq, "Discarding stale search response");
            return;
        }
        control.request_task = None;

        let (phase, results, message) = match outcome {
            Ok(page) => (SearchPhase::Success, page.results, None),
            Err(e) => {
                error!(query = %query, status_code = ?e.status_code(), "Error searching movies: {}", e);
                (SearchPhase::Failed, Vec::new(), Some(SEARCH_FAILED.to_string()))
            }
        };
        control.settled = phase;
        self.state.send_modify(|s| {
            // a keystroke after this request keeps the debounce indicator up
            if s.phase == SearchPhase::Loading {
                s.phase = phase;
            }
            s.results = results;
            s.error = message;
        });
    }
}

/// Debounced search over a [`MovieCatalog`]. Must be driven from inside a
/// tokio runtime. Dropping the pipeline shuts it down.
pub struct SearchPipeline {
    shared: Arc<Shared>,
}

impl SearchPipeline {
    pub fn new(catalog: Arc<dyn MovieCatalog>, options: SearchOptions) -> Self {
        let (state, _) = watch::channel(SearchState::idle(""));
        Self {
            shared: Arc::new(Shared {
                catalog,
                debounce: options.debounce,
                state,
                control: Mutex::new(Control {
                    debounce_task: None,
                    request_task: None,
                    input_seq: 0,
                    request_seq: 0,
                    last_issued: None,
                    settled: SearchPhase::Idle,
                    closed: false,
                }),
            }),
        }
    }

    /// Feed the current contents of the search box
    pub fn input(&self, raw: &str) {
        let mut control = self.shared.lock();
        if control.closed {
            return;
        }
        control.abort_debounce();
        control.input_seq += 1;

        if raw.trim().is_empty() {
            control.abort_request();
            control.request_seq += 1;
            control.last_issued = None;
            control.settled = SearchPhase::Idle;
            self.shared.state.send_replace(SearchState::idle(raw));
            return;
        }

        self.shared.state.send_modify(|s| {
            s.phase = SearchPhase::Debouncing;
            s.query = raw.to_string();
        });

        let input_seq = control.input_seq;
        let query = raw.to_string();
        let shared = Arc::clone(&self.shared);
        control.debounce_task = Some(tokio::spawn(async move {
            tokio::time::sleep(shared.debounce).await;
            shared.settle(input_seq, query);
        }));
    }

    pub fn state(&self) -> SearchState {
        self.shared.state.borrow().clone()
    }

    /// Receiver of state snapshots; it always holds the latest one
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.shared.state.subscribe()
    }

    /// Cancels the pending timer and any in-flight request. No state changes
    /// after this returns.
    pub fn shutdown(&self) {
        let mut control = self.shared.lock();
        if control.closed {
            return;
        }
        control.closed = true;
        control.abort_debounce();
        control.abort_request();
        debug!("Search pipeline shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shared.lock().closed
    }
}

impl Drop for SearchPipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}
