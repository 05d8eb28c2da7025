use std::time::Duration;

use reqwest::{Client, Url};

use super::{
    decode_results, decode_suggestions, SearchBackend, SearchError, SearchFuture, SearchResult,
    Suggestion,
};

/// Default base endpoint of the product search service
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:5000";

/// HTTP client for the product search service
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: Client,
    base: Url,
}

impl SearchClient {
    /// Create a client for `endpoint`. Requests never time out unless
    /// `timeout` is set.
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self, SearchError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| SearchError::Network(e.to_string()))?;
        Self::with_http_client(endpoint, client)
    }

    /// Create a client that sends through an already configured `reqwest::Client`
    pub fn with_http_client(endpoint: &str, client: Client) -> Result<Self, SearchError> {
        let mut base =
            Url::parse(endpoint).map_err(|_| SearchError::InvalidEndpoint(endpoint.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(SearchError::InvalidEndpoint(endpoint.to_string()));
        }
        // Url::join replaces the last segment unless the path ends with '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self { client, base })
    }

    pub fn endpoint(&self) -> &Url {
        &self.base
    }

    /// URL of `path` with the text passed as the `query` parameter
    pub fn query_url(&self, path: &str, query: &str) -> Result<Url, SearchError> {
        let mut url = self
            .base
            .join(path)
            .map_err(|_| SearchError::InvalidEndpoint(format!("{}{path}", self.base)))?;
        url.query_pairs_mut().append_pair("query", query);
        Ok(url)
    }

    /// Run a product search
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let url = self.query_url("search", query)?;
        let body = self.get(url).await?;
        decode_results(&body)
    }

    /// Fetch completion suggestions for a partial query
    pub async fn suggestions(&self, query: &str) -> Result<Vec<Suggestion>, SearchError> {
        let url = self.query_url("suggestions", query)?;
        let body = self.get(url).await?;
        decode_suggestions(&body)
    }

    /// Ask the service to pull changed products into its index.
    /// Returns the service's confirmation text.
    pub async fn refresh_index(&self) -> Result<String, SearchError> {
        let url = self
            .base
            .join("update")
            .map_err(|_| SearchError::InvalidEndpoint(format!("{}update", self.base)))?;
        let body = self.get(url).await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    async fn get(&self, url: Url) -> Result<Vec<u8>, SearchError> {
        tracing::debug!("GET {}", url);
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| SearchError::Network(e.to_string()))?;
        Ok(body.to_vec())
    }
}

impl SearchBackend for SearchClient {
    fn name(&self) -> &str {
        "http"
    }

    fn search(&self, query: &str) -> SearchFuture {
        let client = self.clone();
        let query = query.to_string();
        Box::pin(async move { SearchClient::search(&client, &query).await })
    }
}
