//! Detail viewer: the selected title's full record

use std::sync::Arc;

use tokio::sync::Mutex;

use super::observer::{Listeners, SubscriptionId};
use super::omdb_client::MetadataClient;
use super::request::RequestSequence;
use super::types::DetailState;

struct ViewerInner {
    state: DetailState,
    requests: RequestSequence,
}

/// Owns the current selection. Records are fetched on every open, never cached.
#[derive(Clone)]
pub struct DetailViewer {
    client: Arc<dyn MetadataClient>,
    inner: Arc<Mutex<ViewerInner>>,
    listeners: Listeners<DetailState>,
}

impl DetailViewer {
    pub fn new(client: Arc<dyn MetadataClient>) -> Self {
        Self {
            client,
            inner: Arc::new(Mutex::new(ViewerInner {
                state: DetailState::default(),
                requests: RequestSequence::default(),
            })),
            listeners: Listeners::default(),
        }
    }

    pub async fn state(&self) -> DetailState {
        self.inner.lock().await.state.clone()
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&DetailState) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Fetch and select `id`. Only the latest open may set the selection.
    pub async fn open(&self, id: &str) {
        let token = {
            let mut inner = self.inner.lock().await;
            let token = inner.requests.issue();
            let state = &mut inner.state;
            state.requested_id = Some(id.to_string());
            state.loading = true;
            state.error = None;
            self.listeners.notify(&inner.state);
            token
        };

        tracing::debug!(id, "Opening movie details");
        let result = self.client.fetch_detail(id).await;

        let mut inner = self.inner.lock().await;
        if !inner.requests.is_current(token) {
            tracing::debug!(id, "Discarding stale detail response");
            return;
        }

        let state = &mut inner.state;
        state.loading = false;
        match result {
            Ok(detail) => {
                tracing::info!(id, title = %detail.title, "Loaded movie details");
                state.selection = Some(detail);
                state.error = None;
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "Failed to load movie details");
                state.selection = None;
                state.error = Some(e.message().to_string());
            }
        }
        self.listeners.notify(&inner.state);
    }

    /// Drop the selection. Leaves the error as is.
    ///
    /// Also invalidates a pending `open`, so a late response cannot reopen
    /// the view.
    pub async fn close(&self) {
        let mut inner = self.inner.lock().await;
        inner.requests.issue();
        let state = &mut inner.state;
        state.selection = None;
        state.requested_id = None;
        state.loading = false;
        self.listeners.notify(&inner.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, DETAIL_CONNECTION_MESSAGE};
    use crate::model::test_support::{FakeMetadataClient, detail};
    use crate::model::types::Status;

    fn selected_id(state: &DetailState) -> Option<&str> {
        state.selection.as_ref().map(|d| d.imdb_id.as_str())
    }

    #[tokio::test]
    async fn test_open_selects_detail() {
        let client = FakeMetadataClient::new();
        client.on_detail("tt0372784", Ok(detail("tt0372784", "Batman Begins")));
        let viewer = DetailViewer::new(client.clone());

        viewer.open("tt0372784").await;

        let state = viewer.state().await;
        assert_eq!(state.status(), Status::Ready);
        assert_eq!(selected_id(&state), Some("tt0372784"));
        assert_eq!(state.selection.unwrap().director, "Christopher Nolan");
        assert_eq!(client.detail_calls(), vec!["tt0372784"]);
    }

    #[tokio::test]
    async fn test_open_failure_clears_selection() {
        let client = FakeMetadataClient::new();
        client.on_detail("tt0372784", Ok(detail("tt0372784", "Batman Begins")));
        client.on_detail(
            "tt0096895",
            Err(ApiError::Connectivity(DETAIL_CONNECTION_MESSAGE.to_string())),
        );
        let viewer = DetailViewer::new(client.clone());

        viewer.open("tt0372784").await;
        viewer.open("tt0096895").await;

        let state = viewer.state().await;
        assert_eq!(state.status(), Status::Error);
        assert!(state.selection.is_none());
        assert_eq!(state.error.as_deref(), Some(DETAIL_CONNECTION_MESSAGE));
    }

    #[tokio::test]
    async fn test_open_clears_previous_error() {
        let client = FakeMetadataClient::new();
        client.on_detail("tt0372784", Ok(detail("tt0372784", "Batman Begins")));
        let viewer = DetailViewer::new(client.clone());

        viewer.open("tt9999999").await;
        assert_eq!(
            viewer.state().await.error.as_deref(),
            Some("Incorrect IMDb ID.")
        );

        viewer.open("tt0372784").await;
        let state = viewer.state().await;
        assert_eq!(state.error, None);
        assert_eq!(selected_id(&state), Some("tt0372784"));
    }

    #[tokio::test]
    async fn test_reopening_fetches_again() {
        let client = FakeMetadataClient::new();
        client.on_detail("tt0372784", Ok(detail("tt0372784", "Batman Begins")));
        let viewer = DetailViewer::new(client.clone());

        viewer.open("tt0372784").await;
        viewer.close().await;
        viewer.open("tt0372784").await;

        assert_eq!(client.detail_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_close_keeps_error() {
        let client = FakeMetadataClient::new();
        let viewer = DetailViewer::new(client.clone());

        viewer.open("tt9999999").await;
        viewer.close().await;

        let state = viewer.state().await;
        assert!(state.selection.is_none());
        assert_eq!(state.error.as_deref(), Some("Incorrect IMDb ID."));
    }

    #[tokio::test]
    async fn test_only_last_requested_id_is_selected() {
        let client = FakeMetadataClient::new();
        client.on_detail("tt0372784", Ok(detail("tt0372784", "Batman Begins")));
        client.on_detail("tt0113277", Ok(detail("tt0113277", "Heat")));
        client.gate_detail("tt0372784");
        let viewer = DetailViewer::new(client.clone());

        let slow = viewer.open("tt0372784");
        let fast = async {
            viewer.open("tt0113277").await;
            client.release_detail("tt0372784");
        };
        futures::join!(slow, fast);

        let state = viewer.state().await;
        assert_eq!(selected_id(&state), Some("tt0113277"));
        assert_eq!(state.requested_id.as_deref(), Some("tt0113277"));
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_close_discards_pending_open() {
        let client = FakeMetadataClient::new();
        client.on_detail("tt0372784", Ok(detail("tt0372784", "Batman Begins")));
        client.gate_detail("tt0372784");
        let viewer = DetailViewer::new(client.clone());

        let pending = viewer.open("tt0372784");
        let close = async {
            viewer.close().await;
            client.release_detail("tt0372784");
        };
        futures::join!(pending, close);

        let state = viewer.state().await;
        assert!(state.selection.is_none());
        assert_eq!(state.status(), Status::Idle);
    }
}
