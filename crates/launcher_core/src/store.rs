use anyhow::Result;
use async_trait::async_trait;
use shared::{
    domain::{BookmarkId, Category},
    protocol::{BookmarkDraft, ReorderIntent},
};

/// Data-fetch and persistence collaborator behind the engine.
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    /// Every category with its bookmarks, both sorted by ascending sort order.
    async fn fetch_snapshot(&self) -> Result<Vec<Category>>;

    /// Writes every assignment of `intent`. Either all of them land or none.
    async fn reorder(&self, intent: &ReorderIntent) -> Result<()>;

    /// Appends a new bookmark at the end of its category.
    async fn create_bookmark(&self, draft: &BookmarkDraft) -> Result<BookmarkId>;
}
