pub mod config;
pub mod decode;
pub mod error;
pub mod logging;
pub mod source;
pub mod types;

pub use config::{NewsApiConfig, SearchConfig};
pub use error::{Error, Result};
pub use source::ArticleSource;
pub use types::{Article, ArticleDetail, SortCriterion};

pub mod prelude {
    pub use super::source::ArticleSource;
    pub use super::types::{Article, SortCriterion};
    pub use super::{Error, Result};
}
