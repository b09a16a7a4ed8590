use async_trait::async_trait;
use moodreel_models::{MovieDetails, MovieId, MoviePage};

use crate::error::CatalogError;

/// Page used when the caller does not ask for one
pub const DEFAULT_PAGE: u32 = 1;

/// Read-only movie catalog. Implementations surface every failure unchanged;
/// none of them retry.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    fn catalog_name(&self) -> &str;

    async fn fetch_popular(&self, page: Option<u32>) -> Result<MoviePage, CatalogError>;

    /// `mood_key` must be one of `feel-good`, `action-fix`, `mind-benders`
    async fn fetch_by_mood(&self, mood_key: &str, page: Option<u32>) -> Result<MoviePage, CatalogError>;

    /// Callers must not pass an empty query; the search pipeline filters those out
    async fn search(&self, query: &str, page: Option<u32>) -> Result<MoviePage, CatalogError>;

    /// Details with videos and credits embedded in the same round trip
    async fn fetch_details(&self, movie_id: MovieId) -> Result<MovieDetails, CatalogError>;

    async fn fetch_similar(&self, movie_id: MovieId) -> Result<MoviePage, CatalogError>;
}
