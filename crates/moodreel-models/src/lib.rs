pub mod details;
pub mod images;
pub mod mood;
pub mod movie;

pub use details::{CastMember, Credits, CrewMember, Genre, MovieDetails, Video, VideoList};
pub use images::{ImageUrls, NO_POSTER, NO_PROFILE};
pub use mood::{Mood, UnknownMood};
pub use movie::{Movie, MovieId, MoviePage};
