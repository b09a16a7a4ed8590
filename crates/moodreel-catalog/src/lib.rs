pub mod error;
pub mod tmdb;
pub mod traits;

pub use error::{CatalogError, RemoteError};
pub use tmdb::{Endpoint, TmdbClient};
pub use traits::{MovieCatalog, DEFAULT_PAGE};
