use crate::prelude::*;
use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};

use crate::config::Config;

/// Read-only JSON source the catalog fetches from
#[async_trait::async_trait]
pub trait Transport: Send + Sync + 'static {
    /// GET `path` relative to the source base URL and return the parsed body
    async fn get_json(&self, path: &str) -> FetchResult<serde_json::Value>;
}

/// HTTP client bound to the PokeAPI base URL
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: reqwest::Url,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .user_agent(concat!("pokedex/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| eyre!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait::async_trait]
impl Transport for ApiClient {
    async fn get_json(&self, path: &str) -> FetchResult<serde_json::Value> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| Error::Generic(format!("Invalid request path {path}: {e}")))?;

        debug!("GET {url}");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Network(format!("{path}: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Http {
                status: response.status().as_u16(),
                path: path.to_string(),
            });
        }

        response.json().await.map_err(|e| Error::Decode {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}
