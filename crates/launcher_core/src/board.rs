//! Working copy of the category/bookmark snapshot plus one drag controller
//! per category view.
//!
//! The board only ever holds what the data-fetch collaborator last supplied,
//! with at most the optimistic reorders applied since. A refreshed snapshot
//! replaces it wholesale and clears the presentation memo.

use std::collections::{HashMap, HashSet};

use shared::{
    domain::{Bookmark, BookmarkId, Category, CategoryId},
    protocol::{BookmarkDraft, MutationIntent, ReorderIntent},
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    drag::{DragError, DragEvent, DragKey, DragReorderController, DropPosition},
    icon::{SymbolCatalog, SymbolLookup},
    presentation::{PresentationBinder, PresentationDescriptor},
    sort_order::{is_dense, normalize},
};

const DUPLICATE_SUFFIX: &str = " (copy)";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("unknown category {0}")]
    UnknownCategory(i64),
    #[error("unknown bookmark {0}")]
    UnknownBookmark(i64),
    #[error(transparent)]
    Drag(#[from] DragError),
}

#[derive(Debug)]
pub struct BookmarkBoard<L = SymbolCatalog> {
    categories: Vec<Category>,
    controllers: HashMap<CategoryId, DragReorderController>,
    presentation: PresentationBinder<L>,
}

impl BookmarkBoard {
    /// Board over `snapshot` with the built-in symbol catalog.
    pub fn new(snapshot: Vec<Category>) -> Self {
        Self::with_presentation(snapshot, PresentationBinder::new(SymbolCatalog::builtin()))
    }
}

impl<L: SymbolLookup> BookmarkBoard<L> {
    pub fn with_presentation(snapshot: Vec<Category>, presentation: PresentationBinder<L>) -> Self {
        let mut board = Self {
            categories: Vec::new(),
            controllers: HashMap::new(),
            presentation,
        };
        board.replace_snapshot(snapshot);
        board
    }

    /// Replaces the working copy. No merge with the previous state; drags in
    /// progress keep running and re-validate their ids on drop.
    pub fn replace_snapshot(&mut self, mut snapshot: Vec<Category>) {
        if !is_sorted_by_key(&snapshot, |c| c.sort_order) {
            warn!("snapshot categories arrived out of sort order");
            snapshot.sort_by_key(|c| c.sort_order);
        }
        for category in &mut snapshot {
            if !is_sorted_by_key(&category.bookmarks, |b| b.sort_order) {
                warn!(
                    category_id = category.id.0,
                    "snapshot bookmarks arrived out of sort order"
                );
                category.bookmarks.sort_by_key(|b| b.sort_order);
            }
            if !is_dense(&category.bookmarks) {
                debug!(
                    category_id = category.id.0,
                    "bookmark sort orders have gaps until the next reorder"
                );
            }
        }

        self.controllers
            .retain(|id, _| snapshot.iter().any(|c| c.id == *id));
        for category in &snapshot {
            self.controllers
                .entry(category.id)
                .or_insert_with(|| DragReorderController::new(category.id));
        }

        self.presentation.invalidate();
        info!(
            categories = snapshot.len(),
            bookmarks = snapshot.iter().map(|c| c.bookmarks.len()).sum::<usize>(),
            "bookmark snapshot replaced"
        );
        self.categories = snapshot;
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, category_id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == category_id)
    }

    pub fn order(&self, category_id: CategoryId) -> Option<Vec<BookmarkId>> {
        self.category(category_id).map(Category::bookmark_ids)
    }

    pub fn controller(&self, category_id: CategoryId) -> Option<&DragReorderController> {
        self.controllers.get(&category_id)
    }

    pub fn presentation(&self) -> &PresentationBinder<L> {
        &self.presentation
    }

    pub fn describe(
        &mut self,
        category_id: CategoryId,
        bookmark_id: BookmarkId,
    ) -> Option<PresentationDescriptor> {
        let category = self.categories.iter().find(|c| c.id == category_id)?;
        let bookmark = category.find_bookmark(bookmark_id)?;
        Some(self.presentation.describe(bookmark, category))
    }

    /// Descriptors for every bookmark of the category, in display order.
    pub fn describe_category(
        &mut self,
        category_id: CategoryId,
    ) -> Option<Vec<PresentationDescriptor>> {
        let category = self.categories.iter().find(|c| c.id == category_id)?;
        Some(self.presentation.describe_category(category))
    }

    /// Feeds a drag event to the category's controller. A resulting reorder
    /// is applied to the board right away and returned for persisting.
    pub fn handle_drag(
        &mut self,
        category_id: CategoryId,
        event: DragEvent,
    ) -> Result<Option<ReorderIntent>, BoardError> {
        let order = self
            .order(category_id)
            .ok_or(BoardError::UnknownCategory(category_id.0))?;
        let controller = self
            .controllers
            .get_mut(&category_id)
            .ok_or(BoardError::UnknownCategory(category_id.0))?;

        let intent = controller.handle(event, &order)?;
        if let Some(intent) = &intent {
            self.apply_optimistic(intent);
        }
        Ok(intent)
    }

    pub fn handle_key(
        &mut self,
        category_id: CategoryId,
        key: DragKey,
        focused: BookmarkId,
    ) -> Result<Option<ReorderIntent>, BoardError> {
        let order = self
            .order(category_id)
            .ok_or(BoardError::UnknownCategory(category_id.0))?;
        let controller = self
            .controllers
            .get_mut(&category_id)
            .ok_or(BoardError::UnknownCategory(category_id.0))?;

        let intent = controller.handle_key(key, focused, &order)?;
        if let Some(intent) = &intent {
            self.apply_optimistic(intent);
        }
        Ok(intent)
    }

    pub fn drop_position(
        &self,
        category_id: CategoryId,
        bookmark_id: BookmarkId,
    ) -> Option<DropPosition> {
        let order = self.order(category_id)?;
        self.controllers
            .get(&category_id)?
            .drop_position(bookmark_id, &order)
    }

    /// Rearranges the category to match `intent`. Returns false, leaving the
    /// board untouched, when the intent no longer covers exactly the
    /// category's saved bookmarks.
    pub fn apply_optimistic(&mut self, intent: &ReorderIntent) -> bool {
        let Some(category) = self
            .categories
            .iter_mut()
            .find(|c| c.id == intent.category_id)
        else {
            return false;
        };

        let current = category.bookmark_ids();
        let wanted: HashSet<BookmarkId> = intent.ordered_ids.iter().copied().collect();
        let covers_all = wanted.len() == intent.ordered_ids.len()
            && current.len() == wanted.len()
            && current.iter().all(|id| wanted.contains(id));
        if !covers_all {
            debug!(
                category_id = intent.category_id.0,
                "reorder intent does not match current bookmarks"
            );
            return false;
        }

        let mut by_id: HashMap<BookmarkId, Bookmark> = HashMap::new();
        let mut drafts = Vec::new();
        for bookmark in category.bookmarks.drain(..) {
            match bookmark.id {
                Some(id) => {
                    by_id.insert(id, bookmark);
                }
                None => drafts.push(bookmark),
            }
        }

        for id in &intent.ordered_ids {
            if let Some(bookmark) = by_id.remove(id) {
                category.bookmarks.push(bookmark);
            }
        }
        category.bookmarks.extend(drafts);
        // Saved bookmarks get the intent's dense orders; drafts follow them.
        normalize(category);
        true
    }

    /// Create intent for a copy of `bookmark_id`.
    pub fn duplicate(&self, bookmark_id: BookmarkId) -> Result<MutationIntent, BoardError> {
        self.categories
            .iter()
            .find_map(|c| c.find_bookmark(bookmark_id))
            .map(|bookmark| MutationIntent::CreateBookmark(duplicate_draft(bookmark)))
            .ok_or(BoardError::UnknownBookmark(bookmark_id.0))
    }
}

/// Copies a bookmark as a new, unsaved one. The copy carries no id and no
/// sort order; the create path decides where it lands.
pub fn duplicate_draft(bookmark: &Bookmark) -> BookmarkDraft {
    let mut draft = BookmarkDraft::from(bookmark);
    draft.title.push_str(DUPLICATE_SUFFIX);
    draft
}

fn is_sorted_by_key<T>(items: &[T], key: impl Fn(&T) -> i64) -> bool {
    items.windows(2).all(|pair| key(&pair[0]) <= key(&pair[1]))
}

#[cfg(test)]
#[path = "tests/board_tests.rs"]
mod tests;
