//! Metadata provider client: title search and lookup by id

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::config::Config;
use crate::error::{ApiError, ApiResult, DETAIL_CONNECTION_MESSAGE, SEARCH_CONNECTION_MESSAGE};
use crate::{log_api_request, log_api_result};

use super::types::{MovieDetail, MovieSummary, SearchPage};

/// Remote lookups used by the search session and the detail viewer.
///
/// Each call issues at most one request. No retries, no timeouts beyond the
/// transport's own.
#[async_trait]
pub trait MetadataClient: Send + Sync {
    /// Search titles by text, 1-based page.
    ///
    /// A blank query returns an empty page without touching the network.
    ///
    /// # Errors
    /// - `ApiError::Connectivity` - the request or body could not be completed
    /// - `ApiError::Provider` - the provider reported no results or a bad query
    async fn search(&self, query: &str, page: u32) -> ApiResult<SearchPage>;

    /// Fetch the full record for one id, with the full plot.
    ///
    /// # Errors
    /// Same two failure modes as [`MetadataClient::search`].
    async fn fetch_detail(&self, id: &str) -> ApiResult<MovieDetail>;
}

/// HTTP JSON client for an OMDb-compatible endpoint
#[derive(Clone)]
pub struct OmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OmdbClient {
    pub fn new(config: &Config) -> Self {
        Self::with_client(Client::new(), config.api_key.clone(), config.base_url.clone())
    }

    pub fn with_client(client: Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
        }
    }

    async fn get(&self, params: &[(&str, &str)], fallback: &str) -> ApiResult<String> {
        let request = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params);

        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, "Metadata request failed");
            ApiError::Connectivity(fallback.to_string())
        })?;

        // Failures such as a bad key still come back as a JSON body, so the
        // status code is not checked here
        response.text().await.map_err(|e| {
            tracing::warn!(error = %e, "Failed to read metadata response body");
            ApiError::Connectivity(fallback.to_string())
        })
    }
}

#[async_trait]
impl MetadataClient for OmdbClient {
    async fn search(&self, query: &str, page: u32) -> ApiResult<SearchPage> {
        if query.trim().is_empty() {
            tracing::debug!("Skipping search for blank query");
            return Ok(SearchPage::default());
        }

        log_api_request!("search", query, page);
        let page_param = page.to_string();
        let result = self
            .get(&[("s", query), ("page", &page_param)], SEARCH_CONNECTION_MESSAGE)
            .await
            .and_then(|body| parse_search_body(&body));
        log_api_result!("search", result);
        result
    }

    async fn fetch_detail(&self, id: &str) -> ApiResult<MovieDetail> {
        log_api_request!("fetch_detail", id);
        let result = self
            .get(&[("i", id), ("plot", "full")], DETAIL_CONNECTION_MESSAGE)
            .await
            .and_then(|body| parse_detail_body(&body));
        log_api_result!("fetch_detail", result);
        result
    }
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(rename = "Search", default)]
    search: Vec<MovieSummary>,
    #[serde(rename = "totalResults", default, deserialize_with = "deserialize_count")]
    total_results: u32,
}

/// The provider sends counts as strings ("25"); accept plain numbers too.
/// Anything unreadable counts as zero rather than failing the page.
fn deserialize_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(u32),
        Other(serde::de::IgnoredAny),
    }

    let count = match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(text) => text.trim().parse().ok(),
        TextOrNumber::Number(n) => Some(n),
        TextOrNumber::Other(_) => None,
    };
    Ok(count.unwrap_or_else(|| {
        tracing::warn!("Unreadable totalResults in search response, assuming 0");
        0
    }))
}

/// Split the provider's success flag from its payload
fn check_envelope(body: &str, fallback: &str) -> ApiResult<Value> {
    let value: Value = serde_json::from_str(body).map_err(|e| {
        tracing::warn!(error = %e, "Metadata response is not JSON");
        ApiError::Connectivity(fallback.to_string())
    })?;

    match value.get("Response").and_then(Value::as_str) {
        Some("True") => Ok(value),
        _ => match value.get("Error").and_then(Value::as_str) {
            Some(reason) => Err(ApiError::Provider(reason.to_string())),
            None => {
                tracing::warn!("Metadata response carries neither a result nor an error");
                Err(ApiError::Connectivity(fallback.to_string()))
            }
        },
    }
}

fn parse_search_body(body: &str) -> ApiResult<SearchPage> {
    let value = check_envelope(body, SEARCH_CONNECTION_MESSAGE)?;
    let parsed: SearchBody = serde_json::from_value(value).map_err(|e| {
        tracing::warn!(error = %e, "Failed to decode search response");
        ApiError::Connectivity(SEARCH_CONNECTION_MESSAGE.to_string())
    })?;

    Ok(SearchPage {
        items: parsed.search,
        total_count: parsed.total_results,
    })
}

fn parse_detail_body(body: &str) -> ApiResult<MovieDetail> {
    let value = check_envelope(body, DETAIL_CONNECTION_MESSAGE)?;
    serde_json::from_value(value).map_err(|e| {
        tracing::warn!(error = %e, "Failed to decode detail response");
        ApiError::Connectivity(DETAIL_CONNECTION_MESSAGE.to_string())
    })
}
