use ns_core::{Article, SortCriterion};

use crate::sort;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchStatus {
    /// No active query.
    #[default]
    Idle,
    /// A page fetch is in flight.
    Searching,
    /// Query set, nothing in flight.
    Ready,
}

/// Mutable search state. Only the pagination controller holds one, behind its
/// mutex; every method here is a single transition.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub(crate) query: String,
    pub(crate) page: u32,
    pub(crate) status: SearchStatus,
    pub(crate) sort: SortCriterion,
    pub(crate) results: Vec<Article>,
    pub(crate) last_error: Option<String>,
    pub(crate) exhausted: bool,
    pub(crate) generation: u64,
    pub(crate) revision: u64,
}

/// A page request issued under a given query generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FetchTicket {
    pub generation: u64,
    pub query: String,
    pub page: u32,
}

impl SearchState {
    pub fn new() -> Self {
        Self {
            page: 1,
            ..Self::default()
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Searching
    }

    /// Starts over for a newly settled query. Empty queries go idle and
    /// produce no ticket.
    pub(crate) fn reset(&mut self, query: &str) -> Option<FetchTicket> {
        self.generation += 1;
        self.query = query.to_string();
        self.page = 1;
        self.results.clear();
        self.last_error = None;
        self.exhausted = false;

        if query.is_empty() {
            self.status = SearchStatus::Idle;
            return None;
        }
        self.status = SearchStatus::Searching;
        Some(self.ticket())
    }

    pub(crate) fn begin_next(&mut self) -> Option<FetchTicket> {
        if self.status != SearchStatus::Ready || self.query.is_empty() || self.exhausted {
            return None;
        }
        self.status = SearchStatus::Searching;
        Some(self.ticket())
    }

    pub(crate) fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation && self.is_loading()
    }

    pub(crate) fn apply_page(&mut self, articles: Vec<Article>, stop_on_empty_page: bool) {
        if stop_on_empty_page && articles.is_empty() {
            self.exhausted = true;
        }
        self.results.extend(articles);
        sort::sort(&mut self.results, self.sort);
        self.page += 1;
        self.last_error = None;
        self.status = SearchStatus::Ready;
    }

    pub(crate) fn apply_failure(&mut self, message: String) {
        self.last_error = Some(message);
        self.status = SearchStatus::Ready;
    }

    /// The fetch was dropped before it finished; unblock paging without
    /// recording an error.
    pub(crate) fn abandon(&mut self) {
        self.status = SearchStatus::Ready;
    }

    pub(crate) fn set_sort(&mut self, criterion: SortCriterion) {
        self.sort = criterion;
        sort::sort(&mut self.results, criterion);
    }

    pub(crate) fn snapshot(&self) -> SearchSnapshot {
        SearchSnapshot {
            revision: self.revision,
            query: self.query.clone(),
            page: self.page,
            status: self.status,
            sort: self.sort,
            results: self.results.clone(),
            last_error: self.last_error.clone(),
            exhausted: self.exhausted,
        }
    }

    fn ticket(&self) -> FetchTicket {
        FetchTicket {
            generation: self.generation,
            query: self.query.clone(),
            page: self.page,
        }
    }
}

/// Full copy of the search state, handed to observers after every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSnapshot {
    /// Increases with every mutation; observers receiving snapshots out of
    /// order can drop older ones.
    pub revision: u64,
    pub query: String,
    pub page: u32,
    pub status: SearchStatus,
    pub sort: SortCriterion,
    pub results: Vec<Article>,
    pub last_error: Option<String>,
    pub exhausted: bool,
}

impl SearchSnapshot {
    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Searching
    }
}
