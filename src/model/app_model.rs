//! Application model wiring the components to one client and one store

use std::sync::Arc;

use crate::config::{Config, ENV_API_KEY};

use super::detail::DetailViewer;
use super::favorites::FavoritesRegistry;
use super::omdb_client::{MetadataClient, OmdbClient};
use super::search::SearchSession;
use super::storage::{FavoritesStore, JsonFileStore};

/// Main application model.
///
/// Each component owns its own state; they share only the metadata client
/// and favorites store handed in here.
#[derive(Clone)]
pub struct MovieFinder {
    search: SearchSession,
    detail: DetailViewer,
    favorites: FavoritesRegistry,
}

impl MovieFinder {
    /// Wire up the provider client and the favorites file named in `config`
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        tracing::info!(
            base_url = %config.base_url,
            favorites = %config.favorites_path.display(),
            "Starting movie finder"
        );
        if !config.has_api_key() {
            tracing::warn!("{} is not set, provider requests will be rejected", ENV_API_KEY);
        }
        let client = Arc::new(OmdbClient::new(config));
        let store = Arc::new(JsonFileStore::new(config.favorites_path.clone()));
        Ok(Self::new(client, store).await)
    }

    /// Wire up explicit collaborators. Loads favorites from `store`.
    pub async fn new(client: Arc<dyn MetadataClient>, store: Arc<dyn FavoritesStore>) -> Self {
        Self {
            search: SearchSession::new(client.clone()),
            detail: DetailViewer::new(client),
            favorites: FavoritesRegistry::load(store).await,
        }
    }

    pub fn search(&self) -> &SearchSession {
        &self.search
    }

    pub fn detail(&self) -> &DetailViewer {
        &self.detail
    }

    pub fn favorites(&self) -> &FavoritesRegistry {
        &self.favorites
    }
}
