use moodreel_models::{Mood, MovieId};

/// One catalog call: the path below the API base plus its query parameters
/// (the API key is added separately).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Popular { page: u32 },
    Discover { mood: Mood, page: u32 },
    Search { query: String, page: u32 },
    Details { movie_id: MovieId },
    Similar { movie_id: MovieId },
}

impl Endpoint {
    pub fn path(&self) -> String {
        match self {
            Endpoint::Popular { .. } => "/movie/popular".to_string(),
            Endpoint::Discover { .. } => "/discover/movie".to_string(),
            Endpoint::Search { .. } => "/search/movie".to_string(),
            Endpoint::Details { movie_id } => format!("/movie/{movie_id}"),
            Endpoint::Similar { movie_id } => format!("/movie/{movie_id}/similar"),
        }
    }

    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Endpoint::Popular { page } => vec![("page", page.to_string())],
            Endpoint::Discover { mood, page } => vec![
                ("with_genres", mood.genre_filter()),
                ("page", page.to_string()),
            ],
            Endpoint::Search { query, page } => vec![
                ("query", query.clone()),
                ("page", page.to_string()),
            ],
            Endpoint::Details { .. } => vec![("append_to_response", "videos,credits".to_string())],
            Endpoint::Similar { .. } => Vec::new(),
        }
    }
}
