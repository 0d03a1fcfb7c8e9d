//! Binds user input events to the debouncer and the pagination controller.

use std::sync::Arc;

use ns_core::{ArticleDetail, ArticleSource, Error, Result, SearchConfig, SortCriterion};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::debounce::SearchDebouncer;
use crate::pagination::PaginationController;

/// One search screen's worth of state. Must be created inside a tokio runtime.
pub struct SearchSession {
    controller: PaginationController,
    debouncer: SearchDebouncer,
    pump: JoinHandle<()>,
}

impl SearchSession {
    pub fn new(source: Arc<dyn ArticleSource>, config: SearchConfig) -> Self {
        let debounce = config.debounce;
        let controller = PaginationController::new(source, config);
        let (settled_tx, mut settled_rx) = mpsc::unbounded_channel::<String>();
        let debouncer = SearchDebouncer::spawn(debounce, settled_tx);

        let pump_controller = controller.clone();
        let pump = tokio::spawn(async move {
            while let Some(query) = settled_rx.recv().await {
                let controller = pump_controller.clone();
                tokio::spawn(async move {
                    controller.on_settled_query(&query).await;
                });
            }
        });

        Self {
            controller,
            debouncer,
            pump,
        }
    }

    pub fn controller(&self) -> &PaginationController {
        &self.controller
    }

    pub fn on_text_changed(&self, text: impl Into<String>) {
        if !self.debouncer.push(text) {
            debug!("Debouncer stopped, dropping text change");
        }
    }

    /// Requests the next page in the background. The handle resolves to
    /// whether a fetch was actually issued.
    pub fn on_scrolled_near_bottom(&self) -> JoinHandle<bool> {
        let controller = self.controller.clone();
        tokio::spawn(async move { controller.fetch_next().await })
    }

    /// Index 0 sorts by date, 1 by title.
    pub fn on_sort_option_selected(&self, index: usize) -> Result<()> {
        let criterion = SortCriterion::from_index(index)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown sort option index: {}", index)))?;
        self.controller.set_sort_criterion(criterion);
        Ok(())
    }

    pub fn on_result_selected(&self, index: usize) -> Option<ArticleDetail> {
        self.controller.detail(index)
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.pump.abort();
    }
}
