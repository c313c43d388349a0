//! HTTP client for the jService trivia API.
//!
//! Two read-only endpoints are used:
//! - `GET {base}/categories?count=N` lists categories
//! - `GET {base}/category?id=ID` returns one category with all its clues
//!
//! No retries: a failed request fails the whole board load.

use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

use super::{candidate_ids, CategoryDetail, CategorySummary, TriviaError, TriviaSource};

pub struct JServiceClient {
    client: reqwest::Client,
    base_url: String,
    pool_size: usize,
}

impl JServiceClient {
    pub fn new(
        base_url: impl Into<String>,
        pool_size: usize,
        timeout: Duration,
    ) -> Result<Self, TriviaError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            pool_size,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TriviaError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, ?query, "GET");

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Trivia API request failed");
            return Err(TriviaError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        decode_body(&url, &body)
    }
}

/// Parse a response body, keeping bad JSON apart from transport failures
fn decode_body<T: DeserializeOwned>(url: &str, body: &[u8]) -> Result<T, TriviaError> {
    serde_json::from_slice(body).map_err(|source| {
        warn!(url = %url, error = %source, "Trivia API returned malformed JSON");
        TriviaError::Decode {
            url: url.to_string(),
            source,
        }
    })
}

impl TriviaSource for JServiceClient {
    async fn fetch_candidate_category_ids(&self) -> Result<Vec<u64>, TriviaError> {
        let summaries: Vec<CategorySummary> = self
            .get_json("categories", &[("count", self.pool_size.to_string())])
            .await?;
        let listed = summaries.len();
        let ids = candidate_ids(summaries);
        debug!(listed, usable = ids.len(), "Fetched candidate categories");
        Ok(ids)
    }

    async fn fetch_category_detail(&self, id: u64) -> Result<CategoryDetail, TriviaError> {
        let detail: CategoryDetail = self
            .get_json("category", &[("id", id.to_string())])
            .await?;
        debug!(id, title = %detail.title, clues = detail.clues.len(), "Fetched category");
        Ok(detail)
    }
}
