//! Durable slot holding the favorites set as a JSON array

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::error::PersistError;

use super::types::MovieSummary;

/// Persistence for the favorites set.
///
/// `load` never fails: a missing or unreadable slot is an empty set.
/// `save` replaces the whole slot.
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    async fn load(&self) -> Vec<MovieSummary>;

    async fn save(&self, items: &[MovieSummary]) -> Result<(), PersistError>;
}

fn decode(content: &str) -> Vec<MovieSummary> {
    match serde_json::from_str(content) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, "Stored favorites are corrupt, starting empty");
            Vec::new()
        }
    }
}

fn encode(items: &[MovieSummary]) -> Result<String, PersistError> {
    Ok(serde_json::to_string(items)?)
}

/// Favorites stored in a JSON file on disk
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl FavoritesStore for JsonFileStore {
    async fn load(&self) -> Vec<MovieSummary> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                let items = decode(&content);
                tracing::debug!(path = %self.path.display(), count = items.len(), "Loaded favorites");
                items
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No favorites file yet");
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Could not read favorites file");
                Vec::new()
            }
        }
    }

    async fn save(&self, items: &[MovieSummary]) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let content = encode(items)?;

        // Write beside the target and rename over it so readers never see a
        // partially written file
        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, content).await?;
        if let Err(e) = tokio::fs::rename(&temp_path, &self.path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&temp_path).await {
                tracing::warn!(path = %temp_path.display(), error = %cleanup, "Could not remove temporary favorites file");
            }
            return Err(e.into());
        }

        tracing::debug!(path = %self.path.display(), count = items.len(), "Saved favorites");
        Ok(())
    }
}

/// Favorites kept in memory, for embedders without a durable slot
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slot: Arc<RwLock<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with raw slot content, as if written by an earlier session
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(content.into()))),
        }
    }

    /// Raw slot content, `None` if never written
    pub fn content(&self) -> Option<String> {
        self.slot.read().clone()
    }
}

#[async_trait]
impl FavoritesStore for MemoryStore {
    async fn load(&self) -> Vec<MovieSummary> {
        self.slot.read().as_deref().map(decode).unwrap_or_default()
    }

    async fn save(&self, items: &[MovieSummary]) -> Result<(), PersistError> {
        let content = encode(items)?;
        *self.slot.write() = Some(content);
        Ok(())
    }
}
