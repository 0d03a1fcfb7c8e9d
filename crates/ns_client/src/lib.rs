//! HTTP client for the NewsAPI `everything` search endpoint.

use std::fmt;

use async_trait::async_trait;
use ns_core::{decode, Article, ArticleSource, Error, NewsApiConfig, Result};
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

pub struct NewsApiClient {
    client: Client,
    config: NewsApiConfig,
}

impl NewsApiClient {
    pub fn new(config: NewsApiConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Full request URL, API key included.
    pub fn request_url(&self, query: &str, page: u32, page_size: u32) -> Result<Url> {
        let page = page.to_string();
        let page_size = page_size.to_string();
        let url = Url::parse_with_params(
            self.config.base_url.as_str(),
            &[
                ("q", query),
                ("apiKey", self.config.api_key.as_str()),
                ("page", page.as_str()),
                ("pageSize", page_size.as_str()),
            ],
        )?;
        Ok(url)
    }

    /// Copy of `url` with the `apiKey` value masked, for logging.
    fn redacted(&self, url: &Url) -> Url {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .into_owned()
            .map(|(name, value)| match name.as_str() {
                "apiKey" => (name, "<redacted>".to_string()),
                _ => (name, value),
            })
            .collect();
        let mut shown = url.clone();
        shown.query_pairs_mut().clear().extend_pairs(pairs);
        shown
    }
}

impl fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("client", &"<reqwest::Client>")
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl ArticleSource for NewsApiClient {
    fn name(&self) -> &str {
        "NewsAPI"
    }

    async fn fetch(&self, query: &str, page: u32, page_size: u32) -> Result<Vec<Article>> {
        let url = self.request_url(query, page, page_size)?;
        debug!("Request URL: {}", self.redacted(&url));

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = decode::error_message(&body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string()
            });
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                message,
            });
        }

        let articles = decode::decode(&body)?;
        info!("📰 '{}' page {}: {} articles", query, page, articles.len());
        Ok(articles)
    }
}
