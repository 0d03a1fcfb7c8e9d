use std::fmt;
use std::time::Duration;

use url::Url;

use crate::{Error, Result};

pub const DEFAULT_ENDPOINT: &str = "https://newsapi.org/v2/everything";
pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Connection settings for the NewsAPI search endpoint.
#[derive(Clone)]
pub struct NewsApiConfig {
    pub api_key: String,
    pub base_url: Url,
    pub user_agent: String,
}

impl NewsApiConfig {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::Config("NewsAPI key is required".to_string()));
        }
        Ok(Self {
            api_key,
            base_url: Url::parse(DEFAULT_ENDPOINT)?,
            user_agent: format!("ns/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    pub fn with_base_url(mut self, url: &str) -> Result<Self> {
        self.base_url = Url::parse(url)?;
        Ok(self)
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl fmt::Debug for NewsApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Behaviour of the search engine itself.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Quiet period before typed text counts as a settled query.
    pub debounce: Duration,
    pub page_size: u32,
    /// Stop paging once a page comes back empty. Off by default, in which case
    /// scrolling keeps requesting further pages.
    pub stop_on_empty_page: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            page_size: DEFAULT_PAGE_SIZE,
            stop_on_empty_page: false,
        }
    }
}

impl SearchConfig {
    pub fn with_page_size(mut self, page_size: u32) -> Result<Self> {
        if page_size == 0 || page_size > 100 {
            return Err(Error::Config(format!(
                "Page size must be between 1 and 100, got {}",
                page_size
            )));
        }
        self.page_size = page_size;
        Ok(self)
    }
}
