//! Intents exchanged between the organization engine and its persistence
//! collaborator.

use serde::{Deserialize, Serialize};

use crate::domain::{Bookmark, BookmarkId, CategoryId, IconType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrderUpdate {
    pub bookmark_id: BookmarkId,
    pub sort_order: i64,
}

/// New display order for every bookmark of one category.
///
/// `assignments` holds one entry per id in `ordered_ids`, so the collaborator
/// rewrites every sibling's sort order, not only the moved one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderIntent {
    pub category_id: CategoryId,
    pub ordered_ids: Vec<BookmarkId>,
    pub assignments: Vec<SortOrderUpdate>,
}

/// Payload for creating a bookmark. Carries no sort order: the create path
/// appends to the end of the category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkDraft {
    pub title: String,
    pub url: String,
    pub category_id: CategoryId,
    #[serde(default)]
    pub icon_type: IconType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hex_color: Option<String>,
}

impl From<&Bookmark> for BookmarkDraft {
    fn from(value: &Bookmark) -> Self {
        Self {
            title: value.title.clone(),
            url: value.url.clone(),
            category_id: value.category_id,
            icon_type: value.icon_type,
            symbol_name: value.symbol_name.clone(),
            icon_url: value.icon_url.clone(),
            hex_color: value.hex_color.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum MutationIntent {
    Reorder(ReorderIntent),
    CreateBookmark(BookmarkDraft),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutation_intent_uses_tagged_layout() {
        let intent = MutationIntent::Reorder(ReorderIntent {
            category_id: CategoryId(3),
            ordered_ids: vec![BookmarkId(2), BookmarkId(1)],
            assignments: vec![
                SortOrderUpdate {
                    bookmark_id: BookmarkId(2),
                    sort_order: 0,
                },
                SortOrderUpdate {
                    bookmark_id: BookmarkId(1),
                    sort_order: 1,
                },
            ],
        });
        let value = serde_json::to_value(&intent).expect("json");
        assert_eq!(value["type"], "reorder");
        assert_eq!(value["payload"]["category_id"], 3);
        assert_eq!(value["payload"]["ordered_ids"][0], 2);
    }
}
