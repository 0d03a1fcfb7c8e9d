use async_trait::async_trait;

use crate::types::Article;
use crate::Result;

#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Fetch one page of results for `query`. Pages are numbered from 1.
    ///
    /// One attempt per call; callers decide what to do with a failure.
    async fn fetch(&self, query: &str, page: u32, page_size: u32) -> Result<Vec<Article>>;

    /// Returns the name of the backing service
    fn name(&self) -> &str;
}
