//! TMDB (The Movie Database) catalog client.
//!
//! Uses TMDB API v3: https://developer.themoviedb.org/docs

use async_trait::async_trait;
use moodreel_models::{Mood, MovieDetails, MovieId, MoviePage};
use reqwest::{Client, Request, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{CatalogError, RemoteError};
use crate::tmdb::endpoint::Endpoint;
use crate::traits::{MovieCatalog, DEFAULT_PAGE};

pub const DEFAULT_API_URL: &str = "https://api.themoviedb.org/3";

/// Error body TMDB returns alongside non-2xx statuses
#[derive(Debug, Deserialize)]
struct TmdbErrorBody {
    status_message: Option<String>,
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    api_url: String,
    api_key: String,
}

impl TmdbClient {
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), api_url, api_key)
    }

    pub fn with_client(client: Client, api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Arc::new(client),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Every outgoing request passes through here. Only requests aimed at the
    /// configured API base get the key.
    fn authorize(&self, url: &str, builder: RequestBuilder) -> RequestBuilder {
        if url.starts_with(&self.api_url) {
            builder.query(&[("api_key", self.api_key.as_str())])
        } else {
            builder
        }
    }

    pub fn build_request(&self, endpoint: &Endpoint) -> Result<Request, CatalogError> {
        let url = format!("{}{}", self.api_url, endpoint.path());
        let builder = self.client.get(&url).query(&endpoint.query());
        self.authorize(&url, builder)
            .build()
            .map_err(|e| CatalogError::InvalidArgument(format!("could not build request for {url}: {e}")))
    }

    async fn send<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T, CatalogError> {
        let path = endpoint.path();
        let request = self.build_request(&endpoint)?;
        debug!(path = %path, "TMDB request");

        let response = self.client.execute(request).await.map_err(|e| {
            warn!(path = %path, error = %e, "TMDB request did not complete");
            RemoteError::unreachable(e.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<TmdbErrorBody>(&body)
                .ok()
                .and_then(|b| b.status_message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown Error").to_string());
            warn!(path = %path, status_code = status.as_u16(), "TMDB returned {}", status);
            return Err(RemoteError::new(status.as_u16(), message).into());
        }

        response.json::<T>().await.map_err(|e| {
            warn!(path = %path, error = %e, "Failed to decode TMDB response");
            RemoteError::unreachable(format!("parse JSON: {e}")).into()
        })
    }
}

fn page_or_default(page: Option<u32>) -> Result<u32, CatalogError> {
    match page {
        None => Ok(DEFAULT_PAGE),
        Some(0) => Err(CatalogError::InvalidArgument("page numbers start at 1".to_string())),
        Some(p) => Ok(p),
    }
}

#[async_trait]
impl MovieCatalog for TmdbClient {
    fn catalog_name(&self) -> &str {
        "tmdb"
    }

    async fn fetch_popular(&self, page: Option<u32>) -> Result<MoviePage, CatalogError> {
        let page = page_or_default(page)?;
        self.send(Endpoint::Popular { page }).await
    }

    async fn fetch_by_mood(&self, mood_key: &str, page: Option<u32>) -> Result<MoviePage, CatalogError> {
        let mood: Mood = mood_key.parse()?;
        let page = page_or_default(page)?;
        self.send(Endpoint::Discover { mood, page }).await
    }

    async fn search(&self, query: &str, page: Option<u32>) -> Result<MoviePage, CatalogError> {
        let page = page_or_default(page)?;
        self.send(Endpoint::Search {
            query: query.to_string(),
            page,
        })
        .await
    }

    async fn fetch_details(&self, movie_id: MovieId) -> Result<MovieDetails, CatalogError> {
        self.send(Endpoint::Details { movie_id }).await
    }

    async fn fetch_similar(&self, movie_id: MovieId) -> Result<MoviePage, CatalogError> {
        self.send(Endpoint::Similar { movie_id }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn client() -> TmdbClient {
        TmdbClient::new(DEFAULT_API_URL, "secret")
    }

    fn query_of(request: &Request) -> HashMap<String, String> {
        request.url().query_pairs().into_owned().collect()
    }

    /// Serves `status`/`body` to every connection and counts them.
    async fn serve(status_line: &'static str, body: &'static str) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else { break };
                counter.fetch_add(1, Ordering::SeqCst);

                let mut received = Vec::new();
                let mut buf = [0u8; 1024];
                while !received.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => received.extend_from_slice(&buf[..n]),
                    }
                }

                let response = format!(
                    "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{addr}/3"), hits)
    }

    #[test]
    fn test_catalog_name() {
        assert_eq!(client().catalog_name(), "tmdb");
    }

    #[test]
    fn test_popular_request_defaults_to_first_page() {
        let request = client().build_request(&Endpoint::Popular { page: 1 }).unwrap();
        assert_eq!(request.url().path(), "/3/movie/popular");
        let query = query_of(&request);
        assert_eq!(query["page"], "1");
        assert_eq!(query["api_key"], "secret");
    }

    #[test]
    fn test_mood_request_uses_genre_filter() {
        let request = client()
            .build_request(&Endpoint::Discover { mood: Mood::MindBenders, page: 3 })
            .unwrap();
        assert_eq!(request.url().path(), "/3/discover/movie");
        let query = query_of(&request);
        assert_eq!(query["with_genres"], "9648,53");
        assert_eq!(query["page"], "3");
        assert_eq!(query["api_key"], "secret");
    }

    #[test]
    fn test_search_request_encodes_query() {
        let request = client()
            .build_request(&Endpoint::Search { query: "test movie".to_string(), page: 2 })
            .unwrap();
        assert_eq!(request.url().path(), "/3/search/movie");
        let query = query_of(&request);
        assert_eq!(query["query"], "test movie");
        assert_eq!(query["page"], "2");
    }

    #[test]
    fn test_details_request_embeds_videos_and_credits() {
        let request = client().build_request(&Endpoint::Details { movie_id: 123 }).unwrap();
        assert_eq!(request.url().path(), "/3/movie/123");
        assert_eq!(query_of(&request)["append_to_response"], "videos,credits");
    }

    #[test]
    fn test_similar_request_has_only_the_key() {
        let request = client().build_request(&Endpoint::Similar { movie_id: 123 }).unwrap();
        assert_eq!(request.url().path(), "/3/movie/123/similar");
        let query = query_of(&request);
        assert_eq!(query.len(), 1);
        assert_eq!(query["api_key"], "secret");
    }

    #[test]
    fn test_key_not_attached_outside_api_base() {
        let client = client();
        let url = "https://example.com/other";
        let request = client
            .authorize(url, client.client.get(url))
            .build()
            .unwrap();
        assert!(request.url().query().is_none());
    }

    #[tokio::test]
    async fn test_unknown_mood_is_invalid_argument() {
        let err = client().fetch_by_mood("sad-songs", None).await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidArgument(_)));
        assert_eq!(err.status_code(), None);
    }

    #[tokio::test]
    async fn test_page_zero_is_invalid_argument() {
        let err = client().fetch_popular(Some(0)).await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_successful_page_is_decoded() {
        let (base, hits) = serve(
            "200 OK",
            r#"{"page":1,"results":[{"id":1,"title":"One"}],"total_pages":4,"total_results":70}"#,
        )
        .await;
        let page = TmdbClient::new(base, "k").fetch_popular(None).await.unwrap();
        assert_eq!(page.total_pages, 4);
        assert_eq!(page.results[0].title, "One");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unauthorized_surfaces_status_without_retry() {
        let (base, hits) = serve(
            "401 Unauthorized",
            r#"{"status_code":7,"status_message":"Invalid API key: You must be granted a valid key.","success":false}"#,
        )
        .await;
        let err = TmdbClient::new(base, "bad").fetch_details(1).await.unwrap_err();
        assert_eq!(err.status_code(), Some(401));
        match err {
            CatalogError::Remote(e) => assert!(e.message.starts_with("Invalid API key")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_server_error_uses_reason_phrase() {
        let (base, _) = serve("500 Internal Server Error", "oops").await;
        let err = TmdbClient::new(base, "k").search("test", None).await.unwrap_err();
        assert_eq!(
            err,
            CatalogError::Remote(RemoteError::new(500, "Internal Server Error"))
        );
    }

    #[tokio::test]
    async fn test_rate_limit_on_similar() {
        let (base, hits) = serve("429 Too Many Requests", "").await;
        let err = TmdbClient::new(base, "k").fetch_similar(1).await.unwrap_err();
        assert_eq!(err.status_code(), Some(429));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_status_zero() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = TmdbClient::new(format!("http://{addr}/3"), "k")
            .fetch_popular(None)
            .await
            .unwrap_err();
        match err {
            CatalogError::Remote(e) => assert!(e.is_network()),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
