use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

pub type MovieId = u64;

/// Movie summary as returned by list endpoints and stored in the watchlist.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: MovieId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_average: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vote_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre_ids: Vec<u32>,
}

impl Movie {
    /// Release year, or "N/A" when the date is missing or unparsable
    pub fn year(&self) -> String {
        NaiveDate::parse_from_str(&self.release_date, "%Y-%m-%d")
            .map(|d| d.format("%Y").to_string())
            .unwrap_or_else(|_| "N/A".to_string())
    }
}

/// Paginated result container shared by every list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MoviePage {
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

fn first_page() -> u32 {
    1
}

/// The catalog sends `null` for some string and number fields; treat those like missing ones.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_deserializes_catalog_payload() {
        let json = serde_json::json!({
            "id": 27205,
            "title": "Inception",
            "overview": "A thief who steals corporate secrets...",
            "poster_path": "/poster.jpg",
            "backdrop_path": null,
            "release_date": "2010-07-15",
            "vote_average": 8.4,
            "vote_count": 35000,
            "genre_ids": [28, 878, 12],
            "popularity": 91.2
        });

        let movie: Movie = serde_json::from_value(json).unwrap();
        assert_eq!(movie.id, 27205);
        assert_eq!(movie.poster_path.as_deref(), Some("/poster.jpg"));
        assert_eq!(movie.backdrop_path, None);
        assert_eq!(movie.genre_ids, vec![28, 878, 12]);
        assert_eq!(movie.year(), "2010");
    }

    #[test]
    fn test_movie_tolerates_missing_and_null_fields() {
        let json = serde_json::json!({ "id": 7, "title": null, "release_date": "" });
        let movie: Movie = serde_json::from_value(json).unwrap();
        assert_eq!(movie.title, "");
        assert!(movie.genre_ids.is_empty());
        assert_eq!(movie.year(), "N/A");
    }

    #[test]
    fn test_movie_page_defaults() {
        let page: MoviePage = serde_json::from_str(r#"{"results": []}"#).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 0);
        assert!(page.results.is_empty());
    }
}
