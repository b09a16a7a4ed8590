use async_trait::async_trait;
use moodreel_catalog::{CatalogError, MovieCatalog, RemoteError};
use moodreel_models::{Movie, MovieDetails, MovieId, MoviePage};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

pub fn movie(id: MovieId, title: &str) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        overview: "Test Overview".to_string(),
        poster_path: Some("/test.jpg".to_string()),
        backdrop_path: Some("/test-backdrop.jpg".to_string()),
        release_date: "2024-01-01".to_string(),
        vote_average: 7.5,
        vote_count: 1000,
        genre_ids: vec![28, 12],
    }
}

pub fn page_of(movies: Vec<Movie>) -> MoviePage {
    MoviePage {
        page: 1,
        total_pages: 1,
        total_results: movies.len() as u64,
        results: movies,
    }
}

/// Scripted catalog that records calls.
#[derive(Default)]
pub struct FakeCatalog {
    pub calls: Mutex<Vec<String>>,
    /// search queries answered only after this delay
    pub delays: HashMap<String, Duration>,
    /// status code returned by every call when set
    pub fail_with: Option<u16>,
    pub fail_similar: bool,
    pub details: Option<MovieDetails>,
    pub similar: Vec<Movie>,
}

impl FakeCatalog {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), CatalogError> {
        self.calls.lock().unwrap().push(call);
        match self.fail_with {
            Some(code) => Err(RemoteError::new(code, "scripted failure").into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MovieCatalog for FakeCatalog {
    fn catalog_name(&self) -> &str {
        "fake"
    }

    async fn fetch_popular(&self, page: Option<u32>) -> Result<MoviePage, CatalogError> {
        self.record(format!("popular:{}", page.unwrap_or(1)))?;
        Ok(page_of(vec![movie(1, "Popular")]))
    }

    async fn fetch_by_mood(&self, mood_key: &str, page: Option<u32>) -> Result<MoviePage, CatalogError> {
        let mood: moodreel_models::Mood = mood_key.parse()?;
        self.record(format!("mood:{}:{}", mood, page.unwrap_or(1)))?;
        Ok(page_of(vec![movie(2, mood.label())]))
    }

    async fn search(&self, query: &str, _page: Option<u32>) -> Result<MoviePage, CatalogError> {
        self.calls.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(code) = self.fail_with {
            return Err(RemoteError::new(code, "scripted failure").into());
        }
        Ok(page_of(vec![movie(query.len() as MovieId, query)]))
    }

    async fn fetch_details(&self, movie_id: MovieId) -> Result<MovieDetails, CatalogError> {
        self.record(format!("details:{movie_id}"))?;
        self.details
            .clone()
            .ok_or_else(|| RemoteError::new(404, "The resource you requested could not be found.").into())
    }

    async fn fetch_similar(&self, movie_id: MovieId) -> Result<MoviePage, CatalogError> {
        self.calls.lock().unwrap().push(format!("similar:{movie_id}"));
        if self.fail_similar {
            return Err(RemoteError::new(429, "Too Many Requests").into());
        }
        Ok(page_of(self.similar.clone()))
    }
}
