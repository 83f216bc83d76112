//! Search session: query text, pagination and the current result page

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::ApiResult;

use super::observer::{Listeners, SubscriptionId};
use super::omdb_client::MetadataClient;
use super::request::{RequestSequence, RequestToken};
use super::types::{SearchPage, SearchState};

struct SessionInner {
    state: SearchState,
    requests: RequestSequence,
}

/// Which operation a response belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SearchKind {
    NewQuery,
    PageChange,
}

/// Owns [`SearchState`] and drives the metadata client.
///
/// Handles are cheap to clone and share the same session. Overlapping calls
/// are allowed: only the most recently issued request may commit its response.
#[derive(Clone)]
pub struct SearchSession {
    client: Arc<dyn MetadataClient>,
    inner: Arc<Mutex<SessionInner>>,
    listeners: Listeners<SearchState>,
}

impl SearchSession {
    pub fn new(client: Arc<dyn MetadataClient>) -> Self {
        Self {
            client,
            inner: Arc::new(Mutex::new(SessionInner {
                state: SearchState::default(),
                requests: RequestSequence::default(),
            })),
            listeners: Listeners::default(),
        }
    }

    pub async fn state(&self) -> SearchState {
        self.inner.lock().await.state.clone()
    }

    /// Register a listener called after every committed transition
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&SearchState) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    /// Start a new search at page 1. Blank queries are ignored.
    pub async fn submit_query(&self, query: &str) {
        if query.trim().is_empty() {
            tracing::debug!("Ignoring blank search query");
            return;
        }

        let token = {
            let mut inner = self.inner.lock().await;
            let token = inner.requests.issue();
            let state = &mut inner.state;
            state.query = query.to_string();
            // Page requests wait for the new query's count
            state.page = 1;
            state.total_pages = 1;
            state.loading = true;
            state.error = None;
            self.listeners.notify(&inner.state);
            token
        };

        tracing::debug!(query, "Performing search");
        let result = self.client.search(query, 1).await;
        self.apply(token, SearchKind::NewQuery, 1, result).await;
    }

    /// Load page `page` of the current query.
    ///
    /// No-op unless a query exists and `1 <= page <= total_pages`.
    pub async fn go_to_page(&self, page: u32) {
        let (token, query) = {
            let mut inner = self.inner.lock().await;
            let state = &inner.state;
            if state.query.trim().is_empty() || page < 1 || page > state.total_pages {
                tracing::debug!(
                    page,
                    total_pages = state.total_pages,
                    "Ignoring page request outside the valid range"
                );
                return;
            }

            let query = state.query.clone();
            let token = inner.requests.issue();
            inner.state.loading = true;
            inner.state.error = None;
            self.listeners.notify(&inner.state);
            (token, query)
        };

        tracing::debug!(query = %query, page, "Loading search page");
        let result = self.client.search(&query, page).await;
        self.apply(token, SearchKind::PageChange, page, result).await;
    }

    pub async fn next_page(&self) {
        let page = self.inner.lock().await.state.page;
        self.go_to_page(page.saturating_add(1)).await;
    }

    pub async fn previous_page(&self) {
        let page = self.inner.lock().await.state.page;
        self.go_to_page(page.saturating_sub(1)).await;
    }

    pub async fn has_next_page(&self) -> bool {
        let inner = self.inner.lock().await;
        inner.state.page < inner.state.total_pages
    }

    pub async fn has_previous_page(&self) -> bool {
        self.inner.lock().await.state.page > 1
    }

    async fn apply(
        &self,
        token: RequestToken,
        kind: SearchKind,
        page: u32,
        result: ApiResult<SearchPage>,
    ) {
        let mut inner = self.inner.lock().await;
        if !inner.requests.is_current(token) {
            tracing::debug!(page, ?kind, "Discarding stale search response");
            return;
        }

        let state = &mut inner.state;
        state.loading = false;
        match result {
            Ok(found) => {
                tracing::info!(
                    query = %state.query,
                    page,
                    results = found.items.len(),
                    total = found.total_count,
                    "Search completed successfully"
                );
                state.total_pages = found.total_pages();
                state.results = found.items;
                state.page = page;
                state.error = None;
            }
            Err(e) => {
                tracing::warn!(query = %state.query, page, error = %e, "Search failed");
                state.results.clear();
                state.error = Some(e.message().to_string());
                // A failed page change keeps its position so it can be retried
                if kind == SearchKind::NewQuery {
                    state.page = 1;
                    state.total_pages = 1;
                }
            }
        }
        self.listeners.notify(&inner.state);
    }
}
