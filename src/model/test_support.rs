//! Scripted collaborators for component tests

use std::collections::HashMap;
use std::io;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::error::{ApiError, ApiResult, PersistError};

use super::omdb_client::MetadataClient;
use super::storage::FavoritesStore;
use super::types::{MovieDetail, MovieSummary, SearchPage};

pub fn movie(id: &str, title: &str) -> MovieSummary {
    MovieSummary::new(id, title, "2005", format!("https://img.example/{id}.jpg"))
}

pub fn page_of(ids: &[&str], total_count: u32) -> SearchPage {
    SearchPage {
        items: ids.iter().map(|id| movie(id, &format!("Movie {id}"))).collect(),
        total_count,
    }
}

pub fn detail(id: &str, title: &str) -> MovieDetail {
    serde_json::from_value(serde_json::json!({
        "imdbID": id,
        "Title": title,
        "Year": "2005",
        "Poster": "url",
        "Director": "Christopher Nolan",
        "Actors": "Christian Bale",
        "Genre": "Action",
        "Plot": "A full plot.",
        "imdbRating": "8.2",
    }))
    .expect("valid detail fixture")
}

/// Metadata client answering from scripted responses.
///
/// A gated key blocks until `release` is called for it, which lets tests make
/// an earlier request complete after a later one.
#[derive(Default)]
pub struct FakeMetadataClient {
    searches: Mutex<HashMap<(String, u32), ApiResult<SearchPage>>>,
    details: Mutex<HashMap<String, ApiResult<MovieDetail>>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    search_calls: Mutex<Vec<(String, u32)>>,
    detail_calls: Mutex<Vec<String>>,
}

impl FakeMetadataClient {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on_search(&self, query: &str, page: u32, response: ApiResult<SearchPage>) {
        self.searches.lock().insert((query.to_string(), page), response);
    }

    pub fn on_detail(&self, id: &str, response: ApiResult<MovieDetail>) {
        self.details.lock().insert(id.to_string(), response);
    }

    pub fn gate_search(&self, query: &str, page: u32) {
        self.gate(search_key(query, page));
    }

    pub fn release_search(&self, query: &str, page: u32) {
        self.release(&search_key(query, page));
    }

    pub fn gate_detail(&self, id: &str) {
        self.gate(id.to_string());
    }

    pub fn release_detail(&self, id: &str) {
        self.release(id);
    }

    pub fn search_calls(&self) -> Vec<(String, u32)> {
        self.search_calls.lock().clone()
    }

    pub fn detail_calls(&self) -> Vec<String> {
        self.detail_calls.lock().clone()
    }

    fn gate(&self, key: String) {
        self.gates.lock().insert(key, Arc::new(Notify::new()));
    }

    fn release(&self, key: &str) {
        if let Some(gate) = self.gates.lock().get(key) {
            gate.notify_one();
        }
    }

    async fn wait_for_gate(&self, key: &str) {
        let gate = self.gates.lock().get(key).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

fn search_key(query: &str, page: u32) -> String {
    format!("search:{query}:{page}")
}

#[async_trait]
impl MetadataClient for FakeMetadataClient {
    async fn search(&self, query: &str, page: u32) -> ApiResult<SearchPage> {
        self.search_calls.lock().push((query.to_string(), page));
        self.wait_for_gate(&search_key(query, page)).await;
        self.searches
            .lock()
            .get(&(query.to_string(), page))
            .cloned()
            .unwrap_or_else(|| Err(ApiError::Provider("Movie not found!".to_string())))
    }

    async fn fetch_detail(&self, id: &str) -> ApiResult<MovieDetail> {
        self.detail_calls.lock().push(id.to_string());
        self.wait_for_gate(id).await;
        self.details
            .lock()
            .get(id)
            .cloned()
            .unwrap_or_else(|| Err(ApiError::Provider("Incorrect IMDb ID.".to_string())))
    }
}

/// Favorites store recording every save
#[derive(Default)]
pub struct RecordingStore {
    initial: Vec<MovieSummary>,
    saves: Mutex<Vec<Vec<MovieSummary>>>,
    fail_saves: bool,
}

impl RecordingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_items(initial: Vec<MovieSummary>) -> Arc<Self> {
        Arc::new(Self {
            initial,
            ..Self::default()
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail_saves: true,
            ..Self::default()
        })
    }

    pub fn saves(&self) -> Vec<Vec<MovieSummary>> {
        self.saves.lock().clone()
    }
}

#[async_trait]
impl FavoritesStore for RecordingStore {
    async fn load(&self) -> Vec<MovieSummary> {
        self.initial.clone()
    }

    async fn save(&self, items: &[MovieSummary]) -> Result<(), PersistError> {
        self.saves.lock().push(items.to_vec());
        if self.fail_saves {
            return Err(PersistError::Io(std::io::Error::other("disk full")));
        }
        Ok(())
    }
}

/// Log output captured from the current thread
#[derive(Clone, Default)]
pub struct CapturedLogs {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Route this thread's events into a buffer until the guard is dropped.
/// Meant for `#[tokio::test]`, whose runtime stays on the test thread.
pub fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    (logs, tracing::subscriber::set_default(subscriber))
}
