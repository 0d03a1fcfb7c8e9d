use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::state::SearchSnapshot;

pub trait SearchObserver: Send + Sync {
    fn on_snapshot(&self, snapshot: &SearchSnapshot);
}

impl<F> SearchObserver for F
where
    F: Fn(&SearchSnapshot) + Send + Sync,
{
    fn on_snapshot(&self, snapshot: &SearchSnapshot) {
        self(snapshot)
    }
}

/// Forwards snapshots into an unbounded channel. A closed receiver is ignored.
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<SearchSnapshot>,
}

impl ChannelObserver {
    pub fn new(tx: mpsc::UnboundedSender<SearchSnapshot>) -> Self {
        Self { tx }
    }
}

impl SearchObserver for ChannelObserver {
    fn on_snapshot(&self, snapshot: &SearchSnapshot) {
        let _ = self.tx.send(snapshot.clone());
    }
}

/// Where an observer's callback runs.
#[derive(Debug, Clone)]
pub enum Delivery {
    /// On the task that performed the mutation, before it continues.
    Inline,
    /// As a task spawned on the given runtime, e.g. the one owning a UI loop.
    Runtime(Handle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

struct Entry {
    id: ObserverId,
    observer: Arc<dyn SearchObserver>,
    delivery: Delivery,
}

#[derive(Default)]
pub(crate) struct ObserverList {
    next_id: AtomicU64,
    entries: Mutex<Vec<Entry>>,
}

impl ObserverList {
    pub fn subscribe(&self, observer: Arc<dyn SearchObserver>, delivery: Delivery) -> ObserverId {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Entry { id, observer, delivery });
        id
    }

    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|e| e.id != id);
        entries.len() != before
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Delivers one snapshot to every observer. The list lock is released
    /// before any callback runs, so observers may subscribe or unsubscribe.
    pub fn notify(&self, snapshot: &SearchSnapshot) {
        let targets: Vec<(Arc<dyn SearchObserver>, Delivery)> = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|e| (e.observer.clone(), e.delivery.clone()))
            .collect();

        for (observer, delivery) in targets {
            match delivery {
                Delivery::Inline => observer.on_snapshot(snapshot),
                Delivery::Runtime(handle) => {
                    let snapshot = snapshot.clone();
                    handle.spawn(async move {
                        observer.on_snapshot(&snapshot);
                    });
                }
            }
        }
    }
}
