//! Model module - search, detail and favorites state
//!
//! This module contains the state-owning components and the collaborators
//! they are built on. It is organized into submodules by responsibility:
//!
//! - `types`: Movie records and component state
//! - `omdb_client`: Metadata provider client
//! - `request`: Request tokens that keep stale responses out
//! - `observer`: Listener registration for state changes
//! - `search`: Search session with pagination
//! - `detail`: Detail viewer for the selected title
//! - `favorites`: Favorites registry
//! - `storage`: Favorites persistence
//! - `app_model`: Application model wiring everything together

mod types;
mod omdb_client;
mod request;
mod observer;
mod search;
mod detail;
mod favorites;
mod storage;
mod app_model;

#[cfg(test)]
pub(crate) mod test_support;

pub use types::{
    DetailState, MovieDetail, MovieSummary, PAGE_SIZE, Rating, SearchPage, SearchState, Status,
    total_pages,
};

pub use omdb_client::{MetadataClient, OmdbClient};

pub use request::{RequestSequence, RequestToken};

pub use observer::{Listeners, SubscriptionId};

pub use search::SearchSession;

pub use detail::DetailViewer;

pub use favorites::FavoritesRegistry;

pub use storage::{FavoritesStore, JsonFileStore, MemoryStore};

pub use app_model::MovieFinder;
