//! SerpApi (Google engine) page fetcher.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{PageFetcher, ProviderQuery};
use crate::config::SerpApiConfig;
use crate::core::{LanguageProfile, RawResultItem};
use crate::errors::ProviderError;

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

impl SerpApiResponse {
    fn into_items(self) -> Result<Vec<RawResultItem>, ProviderError> {
        if let Some(error) = self.error {
            return Err(ProviderError::Api(error));
        }

        Ok(self
            .organic_results
            .into_iter()
            .filter_map(|r| {
                let link = r.link.filter(|l| !l.trim().is_empty())?;
                Some(RawResultItem::new(
                    r.title.unwrap_or_default(),
                    link,
                    r.snippet.unwrap_or_default(),
                ))
            })
            .collect())
    }
}

/// Fetches result pages from SerpApi.
#[derive(Debug, Clone)]
pub struct SerpApiFetcher {
    client: Client,
    config: SerpApiConfig,
}

impl SerpApiFetcher {
    /// Creates a fetcher from configuration.
    pub fn new(config: SerpApiConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }

    /// Gets the configuration.
    #[must_use]
    pub const fn config(&self) -> &SerpApiConfig {
        &self.config
    }
}

#[async_trait]
impl PageFetcher for SerpApiFetcher {
    async fn fetch_page(
        &self,
        query: &str,
        profile: &LanguageProfile,
        page_index: usize,
        page_size: usize,
    ) -> Result<Vec<RawResultItem>, ProviderError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| ProviderError::api("missing API key"))?;

        let request = ProviderQuery::new(query, profile, page_index, page_size);
        let mut params = request.to_pairs();
        params.push(("engine", self.config.engine.clone()));
        params.push(("api_key", api_key.to_string()));

        debug!(q = %request.q, start = request.start, gl = %request.gl, "Fetching provider page");

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&params)
            .send()
            .await
            .map_err(|e| ProviderError::transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::transport(e.to_string()))?;

        match serde_json::from_str::<SerpApiResponse>(&body) {
            Ok(parsed) if status.is_success() || parsed.error.is_some() => parsed.into_items(),
            Ok(_) => Err(ProviderError::Http {
                status: status.as_u16(),
            }),
            Err(_) if !status.is_success() => Err(ProviderError::Http {
                status: status.as_u16(),
            }),
            Err(e) => Err(ProviderError::Decode(e.to_string())),
        }
    }

    fn has_credential(&self) -> bool {
        self.config.has_credential()
    }
}
