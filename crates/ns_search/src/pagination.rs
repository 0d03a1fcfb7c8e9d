//! Page accumulation for a single search.
//!
//! [`PaginationController`] owns the [`SearchState`] behind a mutex. Each
//! operation runs its check and its write inside one critical section, and the
//! lock is never held while a page is being fetched. Fetches carry the query
//! generation they were issued under, so a response that arrives after a newer
//! query settled is dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ns_core::{Article, ArticleDetail, ArticleSource, Result, SearchConfig, SortCriterion};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::observer::{ChannelObserver, Delivery, ObserverId, ObserverList, SearchObserver};
use crate::state::{FetchTicket, SearchSnapshot, SearchState};

#[derive(Clone)]
pub struct PaginationController {
    inner: Arc<Inner>,
}

struct Inner {
    source: Arc<dyn ArticleSource>,
    config: SearchConfig,
    state: Mutex<SearchState>,
    observers: ObserverList,
}

impl PaginationController {
    pub fn new(source: Arc<dyn ArticleSource>, config: SearchConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                config,
                state: Mutex::new(SearchState::new()),
                observers: ObserverList::default(),
            }),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.inner.config
    }

    pub fn subscribe(&self, observer: Arc<dyn SearchObserver>, delivery: Delivery) -> ObserverId {
        self.inner.observers.subscribe(observer, delivery)
    }

    /// Snapshots delivered inline into a channel.
    pub fn subscribe_channel(&self) -> mpsc::UnboundedReceiver<SearchSnapshot> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribe(Arc::new(ChannelObserver::new(tx)), Delivery::Inline);
        rx
    }

    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        self.inner.observers.unsubscribe(id)
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.state().snapshot()
    }

    pub fn detail(&self, index: usize) -> Option<ArticleDetail> {
        self.state().results.get(index).map(ArticleDetail::from)
    }

    /// Replaces the current search with `query` and fetches its first page.
    /// An empty query clears everything and fetches nothing.
    pub async fn on_settled_query(&self, query: &str) {
        match self.update(|state| Some(state.reset(query))).flatten() {
            Some(ticket) => {
                info!("🔍 Searching for '{}'", query);
                self.run(ticket).await;
            }
            None => debug!("Search cleared"),
        }
    }

    /// Fetches the next page of the current query. Returns false without
    /// doing anything when there is no query, a fetch is already in flight,
    /// or paging has reached the end.
    pub async fn fetch_next(&self) -> bool {
        match self.update(SearchState::begin_next) {
            Some(ticket) => {
                info!("📄 Loading page {} for '{}'", ticket.page, ticket.query);
                self.run(ticket).await;
                true
            }
            None => false,
        }
    }

    pub fn set_sort_criterion(&self, criterion: SortCriterion) {
        self.update(|state| {
            state.set_sort(criterion);
            Some(())
        });
    }

    async fn run(&self, ticket: FetchTicket) {
        let (query, page) = (ticket.query.clone(), ticket.page);
        let mut guard = InFlight {
            controller: self,
            ticket: Some(ticket),
        };
        let outcome = self
            .inner
            .source
            .fetch(&query, page, self.inner.config.page_size)
            .await;
        if let Some(ticket) = guard.ticket.take() {
            self.complete(ticket, outcome);
        }
    }

    fn complete(&self, ticket: FetchTicket, outcome: Result<Vec<Article>>) {
        let stop_on_empty_page = self.inner.config.stop_on_empty_page;
        self.update(|state| {
            if !state.is_current(&ticket) {
                debug!(
                    "Discarding stale page {} for '{}' (generation {}, now {})",
                    ticket.page, ticket.query, ticket.generation, state.generation
                );
                return None;
            }
            match outcome {
                Ok(articles) => {
                    debug!("'{}' page {}: {} articles", ticket.query, ticket.page, articles.len());
                    state.apply_page(articles, stop_on_empty_page);
                }
                Err(e) => {
                    warn!("⚠️ Failed to load page {} for '{}': {}", ticket.page, ticket.query, e);
                    state.apply_failure(e.to_string());
                }
            }
            Some(())
        });
    }

    fn abandon(&self, ticket: FetchTicket) {
        self.update(|state| {
            if !state.is_current(&ticket) {
                return None;
            }
            debug!("Fetch for '{}' page {} dropped before completion", ticket.query, ticket.page);
            state.abandon();
            Some(())
        });
    }

    /// Applies one transition. When it reports a change, the revision is
    /// bumped and observers get the new snapshot once the lock is released.
    fn update<R>(&self, f: impl FnOnce(&mut SearchState) -> Option<R>) -> Option<R> {
        let (result, snapshot) = {
            let mut state = self.state();
            let result = f(&mut *state)?;
            state.revision += 1;
            (result, state.snapshot())
        };
        self.inner.observers.notify(&snapshot);
        Some(result)
    }

    fn state(&self) -> MutexGuard<'_, SearchState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases the loading gate if a fetch future is dropped mid-flight.
struct InFlight<'a> {
    controller: &'a PaginationController,
    ticket: Option<FetchTicket>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(ticket) = self.ticket.take() {
            self.controller.abandon(ticket);
        }
    }
}
