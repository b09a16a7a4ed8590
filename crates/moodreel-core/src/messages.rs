//! Static user-facing failure messages. Status codes go to the logs, never here.

pub const LOAD_MOVIES_FAILED: &str = "Failed to load movies. Please try again later.";
pub const SEARCH_FAILED: &str = "Failed to search movies. Please try again later.";
pub const LOAD_DETAILS_FAILED: &str = "Failed to load movie details. Please try again later.";
pub const LOAD_SIMILAR_FAILED: &str = "Failed to load similar movies";
