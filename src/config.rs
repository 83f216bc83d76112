//! Runtime configuration: provider credentials, endpoint and storage locations

use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://www.omdbapi.com/";
const APP_DIR: &str = "movie-finder";
const FAVORITES_FILE: &str = "favorites.json";
const FALLBACK_FAVORITES_PATH: &str = ".cache/favorites.json";
const DEFAULT_LOG_DIR: &str = ".logs";

pub(crate) const ENV_API_KEY: &str = "OMDB_API_KEY";
const ENV_BASE_URL: &str = "OMDB_BASE_URL";
const ENV_FAVORITES: &str = "MOVIE_FINDER_FAVORITES";
const ENV_LOG_DIR: &str = "MOVIE_FINDER_LOG_DIR";

/// Where and how log files are written
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(DEFAULT_LOG_DIR),
            file_prefix: APP_DIR.to_string(),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Provider API key. Not validated up front: a bad key shows up as the
    /// provider's error on the first request.
    pub api_key: String,
    pub base_url: String,
    pub favorites_path: PathBuf,
    pub logging: LoggingConfig,
}

// Redacts the API key
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("favorites_path", &self.favorites_path)
            .field("logging", &self.logging)
            .finish()
    }
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            favorites_path: default_favorites_path(),
            logging: LoggingConfig::default(),
        }
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Build from `OMDB_API_KEY`, `OMDB_BASE_URL`, `MOVIE_FINDER_FAVORITES`
    /// and `MOVIE_FINDER_LOG_DIR`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::new(value(ENV_API_KEY).unwrap_or_default());
        if let Some(base_url) = value(ENV_BASE_URL) {
            config.base_url = base_url;
        }
        if let Some(path) = value(ENV_FAVORITES) {
            config.favorites_path = PathBuf::from(path);
        }
        if let Some(dir) = value(ENV_LOG_DIR) {
            config.logging.directory = PathBuf::from(dir);
        }
        config
    }
}

/// `<data dir>/movie-finder/favorites.json`, or `.cache/favorites.json` when
/// the platform has no data directory
pub fn default_favorites_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR).join(FAVORITES_FILE))
        .unwrap_or_else(|| PathBuf::from(FALLBACK_FAVORITES_PATH))
}
