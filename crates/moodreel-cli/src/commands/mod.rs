pub mod browse;
pub mod config;
pub mod details;
pub mod search;
pub mod watchlist;

use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use moodreel_catalog::TmdbClient;
use moodreel_config::{Config, CredentialStore, PathManager};
use moodreel_core::{open_storage, WatchlistStore};
use moodreel_models::ImageUrls;
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use crate::output::Output;

/// Configuration, paths and credentials shared by every command.
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    pub credentials: CredentialStore,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();
        let config_file = paths.config_file();

        let config = Config::load_or_default(&config_file)
            .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
        config.validate().wrap_err("Invalid configuration")?;

        let mut credentials = CredentialStore::new(paths.credentials_file());
        credentials
            .load()
            .map_err(|e| eyre!("Failed to load credentials from {}: {}", paths.credentials_file().display(), e))?;

        Ok(Self {
            paths,
            config,
            credentials,
        })
    }

    pub fn catalog(&self) -> Result<Arc<TmdbClient>> {
        let api_key = self.credentials.resolve_tmdb_api_key()?;
        Ok(Arc::new(TmdbClient::new(self.config.tmdb.api_url.clone(), api_key)))
    }

    pub fn images(&self) -> ImageUrls {
        ImageUrls::new(self.config.tmdb.image_url.clone())
    }

    pub fn watchlist(&self) -> Result<WatchlistStore> {
        self.paths
            .ensure_directories()
            .map_err(|e| eyre!("Failed to create data directories: {}", e))?;
        let storage = open_storage(&self.config.storage, &self.paths);
        Ok(WatchlistStore::new(storage))
    }
}

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}

/// Spinner for a pending request; hidden for structured output or when piped.
pub fn spinner(output: &Output, msg: &str) -> ProgressBar {
    if !output.is_human() || output.is_quiet() || !is_interactive() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
    {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
