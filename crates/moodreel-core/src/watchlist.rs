use futures::Stream;
use moodreel_models::{Movie, MovieId};
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::storage::{KeyValueStorage, StorageError};

/// Durable slot holding the JSON array of saved movies
pub const WATCHLIST_KEY: &str = "movie_watchlist";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to serialize watchlist: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchlistAction {
    Added,
    Removed,
}

struct Inner {
    movies: Vec<Movie>,
    subscribers: Vec<UnboundedSender<Vec<Movie>>>,
}

impl Inner {
    fn broadcast(&mut self) {
        let snapshot = &self.movies;
        self.subscribers.retain(|tx| tx.send(snapshot.clone()).is_ok());
    }
}

/// The user's saved movies: unique by id, in first-add order.
///
/// Every mutation writes the durable slot and then notifies subscribers while
/// holding the same lock, so nobody sees one without the other. A failed write
/// leaves the in-memory list untouched.
pub struct WatchlistStore {
    storage: Arc<dyn KeyValueStorage>,
    inner: Mutex<Inner>,
}

impl WatchlistStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        let movies = load_movies(storage.as_ref());
        Self {
            storage,
            inner: Mutex::new(Inner {
                movies,
                subscribers: Vec::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn current(&self) -> Vec<Movie> {
        self.lock().movies.clone()
    }

    pub fn contains(&self, movie_id: MovieId) -> bool {
        self.lock().movies.iter().any(|m| m.id == movie_id)
    }

    pub fn len(&self) -> usize {
        self.lock().movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_durable(&self) -> bool {
        self.storage.is_durable()
    }

    /// Yields the current snapshot right away, then one snapshot per mutation.
    pub fn changes(&self) -> WatchlistSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock();
        // the receiver is alive, so this cannot fail
        let _ = tx.send(inner.movies.clone());
        inner.subscribers.push(tx);
        WatchlistSubscription { rx }
    }

    /// Returns false (and writes nothing) when the id is already saved.
    pub fn add(&self, movie: Movie) -> Result<bool, StoreError> {
        let mut inner = self.lock();
        self.add_locked(&mut inner, movie)
    }

    /// Returns false (and writes nothing) when no entry has this id.
    pub fn remove(&self, movie_id: MovieId) -> Result<bool, StoreError> {
        let mut inner = self.lock();
        self.remove_locked(&mut inner, movie_id)
    }

    /// Add when absent, remove when present. Check and write happen under one lock.
    pub fn toggle(&self, movie: Movie) -> Result<WatchlistAction, StoreError> {
        let mut inner = self.lock();
        if self.remove_locked(&mut inner, movie.id)? {
            Ok(WatchlistAction::Removed)
        } else {
            self.add_locked(&mut inner, movie)?;
            Ok(WatchlistAction::Added)
        }
    }

    fn add_locked(&self, inner: &mut Inner, movie: Movie) -> Result<bool, StoreError> {
        if inner.movies.iter().any(|m| m.id == movie.id) {
            debug!(movie_id = movie.id, "Already in watchlist");
            return Ok(false);
        }

        let mut next = inner.movies.clone();
        info!(movie_id = movie.id, title = %movie.title, "Adding to watchlist");
        next.push(movie);
        self.commit(inner, next)?;
        Ok(true)
    }

    fn remove_locked(&self, inner: &mut Inner, movie_id: MovieId) -> Result<bool, StoreError> {
        if !inner.movies.iter().any(|m| m.id == movie_id) {
            debug!(movie_id, "Not in watchlist, nothing to remove");
            return Ok(false);
        }

        let next: Vec<Movie> = inner
            .movies
            .iter()
            .filter(|m| m.id != movie_id)
            .cloned()
            .collect();
        info!(movie_id, "Removing from watchlist");
        self.commit(inner, next)?;
        Ok(true)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        let mut inner = self.lock();
        info!("Clearing watchlist ({} movies)", inner.movies.len());
        self.commit(&mut inner, Vec::new())
    }

    fn commit(&self, inner: &mut Inner, next: Vec<Movie>) -> Result<(), StoreError> {
        let json = serde_json::to_string(&next)?;
        if let Err(e) = self.storage.write(WATCHLIST_KEY, &json) {
            warn!("Failed to persist watchlist: {}", e);
            return Err(e.into());
        }
        inner.movies = next;
        inner.broadcast();
        Ok(())
    }
}

/// Missing or malformed content means an empty watchlist
fn load_movies(storage: &dyn KeyValueStorage) -> Vec<Movie> {
    let content = match storage.read(WATCHLIST_KEY) {
        Ok(Some(content)) => content,
        Ok(None) => return Vec::new(),
        Err(e) => {
            warn!("Failed to read watchlist, starting empty: {}", e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<Movie>>(&content) {
        Ok(movies) => {
            let mut unique: Vec<Movie> = Vec::with_capacity(movies.len());
            for movie in movies {
                if !unique.iter().any(|m| m.id == movie.id) {
                    unique.push(movie);
                }
            }
            info!("Loaded watchlist ({} movies)", unique.len());
            unique
        }
        Err(e) => {
            warn!("Watchlist data is malformed, starting empty: {}", e);
            Vec::new()
        }
    }
}

/// Stream of watchlist snapshots. Ends only when the store is dropped.
pub struct WatchlistSubscription {
    rx: UnboundedReceiver<Vec<Movie>>,
}

impl WatchlistSubscription {
    pub async fn recv(&mut self) -> Option<Vec<Movie>> {
        self.rx.recv().await
    }

    /// Next snapshot if one is already queued
    pub fn try_recv(&mut self) -> Option<Vec<Movie>> {
        self.rx.try_recv().ok()
    }
}

impl Stream for WatchlistSubscription {
    type Item = Vec<Movie>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
