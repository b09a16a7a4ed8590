pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{Config, ConfigError, LoggingConfig, SearchConfig, StorageBackend, StorageConfig, TmdbConfig};
pub use credentials::{CredentialStore, TMDB_API_KEY_ENV};
pub use paths::{PathManager, base_path_override};
