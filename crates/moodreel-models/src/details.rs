use serde::{Deserialize, Serialize};
use crate::movie::{null_as_default, Movie};

const YOUTUBE_EMBED: &str = "https://www.youtube.com/embed";

/// Full movie record from `/movie/{id}?append_to_response=videos,credits`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tagline: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<Genre>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub videos: VideoList,
    #[serde(default, deserialize_with = "null_as_default")]
    pub credits: Credits,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct VideoList {
    #[serde(default)]
    pub results: Vec<Video>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Video {
    pub id: String,
    pub key: String,
    #[serde(default)]
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub character: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub job: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub department: String,
    #[serde(default)]
    pub profile_path: Option<String>,
}

impl MovieDetails {
    /// First YouTube trailer, if the catalog embedded one
    pub fn trailer(&self) -> Option<&Video> {
        self.videos
            .results
            .iter()
            .find(|v| v.site == "YouTube" && v.video_type == "Trailer")
    }

    pub fn trailer_url(&self) -> Option<String> {
        self.trailer().map(|v| format!("{YOUTUBE_EMBED}/{}", v.key))
    }

    pub fn top_cast(&self, limit: usize) -> &[CastMember] {
        let cast = &self.credits.cast;
        &cast[..cast.len().min(limit)]
    }

    pub fn genre_names(&self) -> Vec<&str> {
        self.genres.iter().map(|g| g.name.as_str()).collect()
    }

    pub fn directors(&self) -> impl Iterator<Item = &CrewMember> {
        self.credits.crew.iter().filter(|c| c.job == "Director")
    }

    /// The summary part, as stored in the watchlist
    pub fn summary(&self) -> Movie {
        self.movie.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details_json() -> serde_json::Value {
        serde_json::json!({
            "id": 123,
            "title": "Test Movie",
            "overview": "Test Overview",
            "poster_path": "/test.jpg",
            "backdrop_path": "/test-backdrop.jpg",
            "release_date": "2024-01-01",
            "vote_average": 7.5,
            "vote_count": 1000,
            "runtime": 120,
            "status": "Released",
            "tagline": "Test Tagline",
            "genres": [{ "id": 28, "name": "Action" }],
            "videos": { "results": [
                { "id": "v1", "key": "teaser", "name": "Teaser", "site": "YouTube", "type": "Teaser" },
                { "id": "v2", "key": "vimeo", "name": "Trailer", "site": "Vimeo", "type": "Trailer" },
                { "id": "v3", "key": "abc123", "name": "Official Trailer", "site": "YouTube", "type": "Trailer" }
            ]},
            "credits": {
                "cast": [
                    { "id": 1, "name": "Lead", "character": "Hero", "profile_path": "/lead.jpg" },
                    { "id": 2, "name": "Support", "character": null, "profile_path": null }
                ],
                "crew": [
                    { "id": 9, "name": "Someone", "job": "Director", "department": "Directing", "profile_path": null }
                ]
            }
        })
    }

    #[test]
    fn test_details_deserialize_and_trailer_lookup() {
        let details: MovieDetails = serde_json::from_value(details_json()).unwrap();
        assert_eq!(details.movie.id, 123);
        assert_eq!(details.runtime, Some(120));
        assert_eq!(details.genre_names(), vec!["Action"]);
        assert_eq!(details.trailer().map(|v| v.id.as_str()), Some("v3"));
        assert_eq!(
            details.trailer_url().as_deref(),
            Some("https://www.youtube.com/embed/abc123")
        );
        assert_eq!(details.credits.cast[1].character, "");
        assert_eq!(details.directors().count(), 1);
    }

    #[test]
    fn test_details_with_empty_sequences() {
        let json = serde_json::json!({
            "id": 123,
            "title": "Bare",
            "genres": [],
            "videos": { "results": [] },
            "credits": { "cast": [], "crew": [] }
        });
        let details: MovieDetails = serde_json::from_value(json).unwrap();
        assert!(details.genres.is_empty());
        assert!(details.trailer().is_none());
        assert!(details.trailer_url().is_none());
        assert!(details.top_cast(6).is_empty());
    }

    #[test]
    fn test_details_without_embedded_resources() {
        let json = serde_json::json!({ "id": 5, "title": "No extras", "videos": null });
        let details: MovieDetails = serde_json::from_value(json).unwrap();
        assert!(details.videos.results.is_empty());
        assert!(details.credits.crew.is_empty());
    }

    #[test]
    fn test_top_cast_is_capped() {
        let details: MovieDetails = serde_json::from_value(details_json()).unwrap();
        assert_eq!(details.top_cast(1).len(), 1);
        assert_eq!(details.top_cast(6).len(), 2);
    }
}
