use moodreel_catalog::{CatalogError, MovieCatalog};
use moodreel_models::{CastMember, Mood, Movie, MovieDetails, MovieId, MoviePage};
use tracing::{error, warn};

use crate::messages::{LOAD_DETAILS_FAILED, LOAD_MOVIES_FAILED, LOAD_SIMILAR_FAILED};
use crate::watchlist::{StoreError, WatchlistAction, WatchlistStore};

pub const SIMILAR_LIMIT: usize = 6;
pub const TOP_CAST_LIMIT: usize = 6;

/// A catalog failure paired with the static message shown to the user.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct LoadFailure {
    pub message: &'static str,
    #[source]
    pub source: CatalogError,
}

impl LoadFailure {
    pub fn status_code(&self) -> Option<u16> {
        self.source.status_code()
    }
}

/// One page of the home feed: popular movies, or a mood's discovery list
#[derive(Debug, Clone)]
pub struct Feed {
    pub mood: Option<Mood>,
    pub title: String,
    pub page: MoviePage,
}

pub async fn load_feed(
    catalog: &dyn MovieCatalog,
    mood: Option<Mood>,
    page: Option<u32>,
) -> Result<Feed, LoadFailure> {
    let result = match mood {
        Some(m) => catalog.fetch_by_mood(m.key(), page).await,
        None => catalog.fetch_popular(page).await,
    };

    match result {
        Ok(page) => Ok(Feed {
            mood,
            title: Mood::feed_title(mood),
            page,
        }),
        Err(e) => {
            error!(catalog = catalog.catalog_name(), mood = ?mood.map(|m| m.key()), status_code = ?e.status_code(), "Error loading movies: {}", e);
            Err(LoadFailure {
                message: LOAD_MOVIES_FAILED,
                source: e,
            })
        }
    }
}

/// Everything the details page shows for one movie
#[derive(Debug, Clone)]
pub struct MovieDetailsView {
    pub details: MovieDetails,
    pub similar: Vec<Movie>,
    pub in_watchlist: bool,
}

impl MovieDetailsView {
    /// Similar movies are best effort: if they fail to load the list stays empty.
    pub async fn load(
        catalog: &dyn MovieCatalog,
        watchlist: &WatchlistStore,
        movie_id: MovieId,
    ) -> Result<Self, LoadFailure> {
        let details = catalog.fetch_details(movie_id).await.map_err(|e| {
            error!(catalog = catalog.catalog_name(), movie_id, status_code = ?e.status_code(), "Error loading movie details: {}", e);
            LoadFailure {
                message: LOAD_DETAILS_FAILED,
                source: e,
            }
        })?;

        let similar = match catalog.fetch_similar(movie_id).await {
            Ok(page) => page.results.into_iter().take(SIMILAR_LIMIT).collect(),
            Err(e) => {
                warn!(movie_id, status_code = ?e.status_code(), "{}: {}", LOAD_SIMILAR_FAILED, e);
                Vec::new()
            }
        };

        Ok(Self {
            in_watchlist: watchlist.contains(details.movie.id),
            details,
            similar,
        })
    }

    pub fn trailer_url(&self) -> Option<String> {
        self.details.trailer_url()
    }

    pub fn cast(&self) -> &[CastMember] {
        self.details.top_cast(TOP_CAST_LIMIT)
    }

    pub fn toggle_watchlist(&mut self, watchlist: &WatchlistStore) -> Result<WatchlistAction, StoreError> {
        let action = watchlist.toggle(self.details.summary())?;
        self.in_watchlist = action == WatchlistAction::Added;
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::test_support::{movie, FakeCatalog};
    use moodreel_models::{Credits, VideoList};
    use std::sync::Arc;

    fn details(id: MovieId) -> MovieDetails {
        MovieDetails {
            movie: movie(id, "Test Movie"),
            runtime: Some(120),
            status: "Released".to_string(),
            tagline: "Test Tagline".to_string(),
            genres: Vec::new(),
            videos: VideoList::default(),
            credits: Credits::default(),
        }
    }

    fn store() -> WatchlistStore {
        WatchlistStore::new(Arc::new(MemoryStorage::new()))
    }

    #[tokio::test]
    async fn test_feed_for_popular_and_mood() {
        let catalog = FakeCatalog::default();

        let popular = load_feed(&catalog, None, None).await.unwrap();
        assert_eq!(popular.title, "Popular Movies");

        let mood = load_feed(&catalog, Some(Mood::MindBenders), Some(3)).await.unwrap();
        assert_eq!(mood.title, "🤯 Mind Benders Movies");
        assert_eq!(catalog.calls(), vec!["popular:1", "mood:mind-benders:3"]);
    }

    #[tokio::test]
    async fn test_feed_failure_message() {
        let catalog = FakeCatalog {
            fail_with: Some(401),
            ..FakeCatalog::default()
        };
        let err = load_feed(&catalog, None, None).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to load movies. Please try again later.");
        assert_eq!(err.status_code(), Some(401));
    }

    #[tokio::test]
    async fn test_details_view_with_empty_sequences() {
        let catalog = FakeCatalog {
            details: Some(details(123)),
            ..FakeCatalog::default()
        };
        let view = MovieDetailsView::load(&catalog, &store(), 123).await.unwrap();
        assert!(view.trailer_url().is_none());
        assert!(view.cast().is_empty());
        assert!(view.details.genres.is_empty());
        assert!(!view.in_watchlist);
        assert_eq!(catalog.calls(), vec!["details:123", "similar:123"]);
    }

    #[tokio::test]
    async fn test_similar_capped_and_watchlist_flag() {
        let catalog = FakeCatalog {
            details: Some(details(9)),
            similar: (1..=10).map(|id| movie(id, "Similar")).collect(),
            ..FakeCatalog::default()
        };
        let watchlist = store();
        watchlist.add(movie(9, "Test Movie")).unwrap();

        let view = MovieDetailsView::load(&catalog, &watchlist, 9).await.unwrap();
        assert_eq!(view.similar.len(), SIMILAR_LIMIT);
        assert!(view.in_watchlist);
    }

    #[tokio::test]
    async fn test_similar_failure_is_not_fatal() {
        let catalog = FakeCatalog {
            details: Some(details(9)),
            fail_similar: true,
            ..FakeCatalog::default()
        };
        let view = MovieDetailsView::load(&catalog, &store(), 9).await.unwrap();
        assert!(view.similar.is_empty());
    }

    #[tokio::test]
    async fn test_details_failure_message() {
        let catalog = FakeCatalog::default();
        let err = MovieDetailsView::load(&catalog, &store(), 1).await.unwrap_err();
        assert_eq!(err.message, "Failed to load movie details. Please try again later.");
        assert_eq!(err.status_code(), Some(404));
    }

    #[tokio::test]
    async fn test_toggle_from_details() {
        let catalog = FakeCatalog {
            details: Some(details(4)),
            ..FakeCatalog::default()
        };
        let watchlist = store();
        let mut view = MovieDetailsView::load(&catalog, &watchlist, 4).await.unwrap();

        assert_eq!(view.toggle_watchlist(&watchlist).unwrap(), WatchlistAction::Added);
        assert!(view.in_watchlist);
        assert_eq!(watchlist.current(), vec![movie(4, "Test Movie")]);

        assert_eq!(view.toggle_watchlist(&watchlist).unwrap(), WatchlistAction::Removed);
        assert!(!view.in_watchlist);
    }
}
