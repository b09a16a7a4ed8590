pub mod browse;
pub mod messages;
pub mod search;
pub mod storage;
pub mod watchlist;

#[cfg(test)]
pub(crate) mod test_support;

pub use browse::{load_feed, Feed, LoadFailure, MovieDetailsView, SIMILAR_LIMIT, TOP_CAST_LIMIT};
pub use search::{SearchOptions, SearchPhase, SearchPipeline, SearchState};
pub use storage::{open_storage, FileStorage, KeyValueStorage, MemoryStorage, NoopStorage, StorageError};
pub use watchlist::{StoreError, WatchlistAction, WatchlistStore, WatchlistSubscription, WATCHLIST_KEY};
