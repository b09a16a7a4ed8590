use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::config::ConfigError;

/// Environment variable that takes precedence over the stored key
pub const TMDB_API_KEY_ENV: &str = "TMDB_API_KEY";

const TMDB_API_KEY: &str = "tmdb_api_key";

#[derive(Debug, Serialize, Deserialize, Default)]
struct CredentialsData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

pub struct CredentialStore {
    path: PathBuf,
    credentials: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let creds_data: CredentialsData = toml::from_str(&content)?;
            self.credentials = creds_data.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let creds_data = CredentialsData {
            data: self.credentials.clone(),
        };
        let content = toml::to_string_pretty(&creds_data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.credentials.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.credentials.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        self.credentials.remove(key);
    }

    pub fn get_tmdb_api_key(&self) -> Option<&String> {
        self.get(TMDB_API_KEY)
    }

    pub fn set_tmdb_api_key(&mut self, key: String) {
        self.set(TMDB_API_KEY.to_string(), key);
    }

    /// Key from `TMDB_API_KEY`, falling back to the stored one
    pub fn resolve_tmdb_api_key(&self) -> Result<String, ConfigError> {
        self.resolve_tmdb_api_key_with(std::env::var(TMDB_API_KEY_ENV).ok())
    }

    pub fn resolve_tmdb_api_key_with(&self, env_value: Option<String>) -> Result<String, ConfigError> {
        env_value
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                self.get_tmdb_api_key()
                    .filter(|k| !k.trim().is_empty())
                    .cloned()
            })
            .ok_or(ConfigError::MissingApiKey)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_credential_store_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let mut store = CredentialStore::new(path.clone());
        store.set_tmdb_api_key("test_key".to_string());
        store.save().unwrap();

        let mut loaded_store = CredentialStore::new(path);
        loaded_store.load().unwrap();
        assert_eq!(loaded_store.get_tmdb_api_key(), Some(&"test_key".to_string()));
    }

    #[test]
    fn test_env_key_takes_precedence() {
        let mut store = CredentialStore::new(PathBuf::from("/tmp/unused"));
        store.set_tmdb_api_key("stored".to_string());

        assert_eq!(
            store.resolve_tmdb_api_key_with(Some("from_env".to_string())),
            Ok("from_env".to_string())
        );
        assert_eq!(
            store.resolve_tmdb_api_key_with(Some("  ".to_string())),
            Ok("stored".to_string())
        );
    }

    #[test]
    fn test_missing_key() {
        let mut store = CredentialStore::new(PathBuf::from("/tmp/unused"));
        assert_eq!(store.resolve_tmdb_api_key_with(None), Err(ConfigError::MissingApiKey));

        store.set_tmdb_api_key("k".to_string());
        store.remove(TMDB_API_KEY);
        assert_eq!(store.resolve_tmdb_api_key_with(None), Err(ConfigError::MissingApiKey));
    }
}
