//! Hand-off of mutation intents to the persistence collaborator.
//!
//! Reorders are serialized per category: one intent in flight, at most one
//! parked behind it. A newer drop replaces the parked intent, because it was
//! computed from the most recent local order and already carries every
//! sibling's position. The refreshed snapshot is fetched once the category's
//! queue drains.
//!
//! The write loop runs on its own task, so a caller that stops waiting does
//! not leave the category marked in flight: the task still writes the parked
//! intent and releases the queue.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use anyhow::{Context, Result};
use shared::{
    domain::{Category, CategoryId},
    protocol::{MutationIntent, ReorderIntent},
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::store::BookmarkStore;

#[derive(Debug, Default)]
pub struct ReorderQueue {
    in_flight: HashSet<CategoryId>,
    pending: HashMap<CategoryId, ReorderIntent>,
}

impl ReorderQueue {
    /// Returns the intent when it should be sent now. Otherwise it is parked
    /// behind the category's in-flight intent, replacing any parked one.
    pub fn submit(&mut self, intent: ReorderIntent) -> Option<ReorderIntent> {
        let category_id = intent.category_id;
        if self.in_flight.insert(category_id) {
            return Some(intent);
        }

        if self.pending.insert(category_id, intent).is_some() {
            debug!(category_id = category_id.0, "superseded parked reorder");
        }
        None
    }

    /// Marks the in-flight intent as finished, successfully or not. Returns
    /// the parked intent, which becomes the new in-flight one.
    pub fn complete(&mut self, category_id: CategoryId) -> Option<ReorderIntent> {
        match self.pending.remove(&category_id) {
            Some(next) => Some(next),
            None => {
                self.in_flight.remove(&category_id);
                None
            }
        }
    }

    pub fn is_in_flight(&self, category_id: CategoryId) -> bool {
        self.in_flight.contains(&category_id)
    }

    pub fn parked(&self, category_id: CategoryId) -> Option<&ReorderIntent> {
        self.pending.get(&category_id)
    }
}

pub struct MutationSync {
    store: Arc<dyn BookmarkStore>,
    queue: Arc<Mutex<ReorderQueue>>,
}

impl MutationSync {
    pub fn new(store: Arc<dyn BookmarkStore>) -> Self {
        Self {
            store,
            queue: Arc::new(Mutex::new(ReorderQueue::default())),
        }
    }

    pub fn store(&self) -> &Arc<dyn BookmarkStore> {
        &self.store
    }

    /// Persists `intent`. Returns the refreshed snapshot when this call
    /// drained the queue, `None` when a reorder was parked behind one already
    /// being written by another caller.
    pub async fn apply(&self, intent: MutationIntent) -> Result<Option<Vec<Category>>> {
        match intent {
            MutationIntent::Reorder(intent) => self.reorder(intent).await,
            MutationIntent::CreateBookmark(draft) => {
                let bookmark_id = self
                    .store
                    .create_bookmark(&draft)
                    .await
                    .with_context(|| format!("failed to create bookmark '{}'", draft.title))?;
                info!(
                    bookmark_id = bookmark_id.0,
                    category_id = draft.category_id.0,
                    "bookmark created"
                );
                self.refresh().await.map(Some)
            }
        }
    }

    pub async fn reorder(&self, intent: ReorderIntent) -> Result<Option<Vec<Category>>> {
        let category_id = intent.category_id;
        let Some(next) = self.queue.lock().await.submit(intent) else {
            debug!(category_id = category_id.0, "reorder parked behind in-flight write");
            return Ok(None);
        };

        let drain = tokio::spawn(drain_reorders(
            Arc::clone(&self.store),
            Arc::clone(&self.queue),
            next,
        ));
        drain
            .await
            .with_context(|| format!("reorder task for category {} failed", category_id.0))??;

        info!(category_id = category_id.0, "bookmark order persisted");
        self.refresh().await.map(Some)
    }

    pub async fn refresh(&self) -> Result<Vec<Category>> {
        self.store
            .fetch_snapshot()
            .await
            .context("failed to refresh bookmark snapshot")
    }
}

/// Writes `next` and then every intent parked behind it, until the category's
/// queue is empty.
async fn drain_reorders(
    store: Arc<dyn BookmarkStore>,
    queue: Arc<Mutex<ReorderQueue>>,
    mut next: ReorderIntent,
) -> Result<()> {
    let category_id = next.category_id;
    loop {
        let written = store.reorder(&next).await;
        let following = queue.lock().await.complete(category_id);

        match (written, following) {
            (Ok(()), Some(parked)) => next = parked,
            (Ok(()), None) => return Ok(()),
            (Err(err), Some(parked)) => {
                warn!(
                    category_id = category_id.0,
                    "reorder write failed, sending newer order: {err:#}"
                );
                next = parked;
            }
            (Err(err), None) => {
                return Err(err).with_context(|| {
                    format!("failed to persist order of category {}", category_id.0)
                });
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/sync_tests.rs"]
mod tests;
