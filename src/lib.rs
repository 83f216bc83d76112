//! Movie search, detail and favorites engine.
//!
//! Coordinates lookups against an OMDb-style metadata provider, pagination,
//! the selected title and a persisted favorites set. Rendering is left to the
//! embedding application, which observes state through listeners.

pub mod config;
pub mod error;
pub mod logging;
pub mod model;

pub use config::Config;
pub use error::{ApiError, ApiResult, PersistError};
pub use model::{
    DetailState, DetailViewer, FavoritesRegistry, FavoritesStore, JsonFileStore, MemoryStore,
    MetadataClient, MovieDetail, MovieFinder, MovieSummary, OmdbClient, SearchPage, SearchSession,
    SearchState, Status,
};
