//! Error types shared by the model components

use thiserror::Error;

/// Shown when a search request never produced a usable response
pub const SEARCH_CONNECTION_MESSAGE: &str = "Connection error.";

/// Shown when a detail request never produced a usable response
pub const DETAIL_CONNECTION_MESSAGE: &str = "Could not load movie details.";

/// Failure of a remote metadata lookup.
///
/// Both variants carry the text that ends up in a component's `error` field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The request could not be completed. Holds a generic message, never the
    /// transport error text.
    #[error("{0}")]
    Connectivity(String),

    /// The provider answered with `"Response": "False"`. Holds its `Error`
    /// field verbatim.
    #[error("{0}")]
    Provider(String),
}

impl ApiError {
    pub fn message(&self) -> &str {
        match self {
            ApiError::Connectivity(message) | ApiError::Provider(message) => message,
        }
    }
}

/// Failure to write the favorites slot. Never rolls back the in-memory change.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to write favorites: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize favorites: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
