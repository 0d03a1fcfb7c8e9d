pub mod debounce;
pub mod observer;
pub mod pagination;
pub mod session;
pub mod sort;
pub mod state;

#[cfg(test)]
mod tests;

pub use debounce::SearchDebouncer;
pub use observer::{ChannelObserver, Delivery, ObserverId, SearchObserver};
pub use pagination::PaginationController;
pub use session::SearchSession;
pub use state::{SearchSnapshot, SearchStatus};

pub mod prelude {
    pub use super::{PaginationController, SearchSession, SearchSnapshot, SearchStatus};
    pub use ns_core::{Article, ArticleDetail, ArticleSource, Error, Result, SearchConfig, SortCriterion};
}
