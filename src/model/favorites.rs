//! Favorites registry: deduplicated, persisted set of titles

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::PersistError;

use super::observer::{Listeners, SubscriptionId};
use super::storage::FavoritesStore;
use super::types::MovieSummary;

/// Owns the favorites set, keyed by imdbID, in insertion order.
///
/// Memory is the source of truth; the store is a mirror written after every
/// toggle.
#[derive(Clone)]
pub struct FavoritesRegistry {
    store: Arc<dyn FavoritesStore>,
    items: Arc<Mutex<Vec<MovieSummary>>>,
    listeners: Listeners<Vec<MovieSummary>>,
}

impl FavoritesRegistry {
    /// Read the stored set. Never fails; anything unreadable starts empty.
    pub async fn load(store: Arc<dyn FavoritesStore>) -> Self {
        let stored = store.load().await;
        let total = stored.len();

        let mut seen = HashSet::new();
        let items: Vec<MovieSummary> = stored
            .into_iter()
            .filter(|movie| seen.insert(movie.imdb_id.clone()))
            .collect();
        if items.len() != total {
            tracing::warn!(
                dropped = total - items.len(),
                "Dropped duplicate favorites from storage"
            );
        }
        tracing::info!(count = items.len(), "Favorites loaded");

        Self {
            store,
            items: Arc::new(Mutex::new(items)),
            listeners: Listeners::default(),
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&Vec<MovieSummary>) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    pub async fn is_favorite(&self, id: &str) -> bool {
        self.items.lock().await.iter().any(|m| m.imdb_id == id)
    }

    pub async fn favorites(&self) -> Vec<MovieSummary> {
        self.items.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }

    /// Add `movie` if absent, remove it if present, then persist the whole set.
    ///
    /// Returns whether the movie is a favorite afterwards. A persistence error
    /// is returned but the in-memory change stands.
    pub async fn toggle(&self, movie: &MovieSummary) -> Result<bool, PersistError> {
        let mut items = self.items.lock().await;

        let favorited = match items.iter().position(|m| m.imdb_id == movie.imdb_id) {
            Some(index) => {
                items.remove(index);
                false
            }
            None => {
                items.push(movie.clone());
                true
            }
        };
        tracing::info!(id = %movie.imdb_id, favorited, count = items.len(), "Toggled favorite");
        self.listeners.notify(&items);

        // Saved under the lock so writes land in toggle order
        if let Err(e) = self.store.save(&items).await {
            tracing::error!(error = %e, "Failed to persist favorites");
            return Err(e);
        }
        Ok(favorited)
    }
}
