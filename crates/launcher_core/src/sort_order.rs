//! Dense sort-order assignment.
//!
//! Every reorder renumbers the whole category `0..N` in display order. There
//! are no gaps or fractional keys to exhaust. The trade-off is write
//! amplification: each drop rewrites the sort order of every bookmark in the
//! category at the persistence boundary, not only the one that moved.

use shared::{
    domain::{Bookmark, BookmarkId, Category},
    protocol::SortOrderUpdate,
};

pub fn assign_sort_orders(ordered_ids: &[BookmarkId]) -> Vec<SortOrderUpdate> {
    ordered_ids
        .iter()
        .zip(0_i64..)
        .map(|(&bookmark_id, sort_order)| SortOrderUpdate {
            bookmark_id,
            sort_order,
        })
        .collect()
}

/// True when sort orders are exactly `0..N` in display order.
pub fn is_dense(bookmarks: &[Bookmark]) -> bool {
    bookmarks
        .iter()
        .zip(0_i64..)
        .all(|(bookmark, expected)| bookmark.sort_order == expected)
}

/// Rewrites sort orders in place to match the current display order.
pub fn normalize(category: &mut Category) {
    for (bookmark, sort_order) in category.bookmarks.iter_mut().zip(0_i64..) {
        bookmark.sort_order = sort_order;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::{CategoryId, IconType};

    fn bookmark(id: i64, sort_order: i64) -> Bookmark {
        Bookmark {
            id: Some(BookmarkId(id)),
            title: format!("b{id}"),
            url: format!("https://example.com/{id}"),
            category_id: CategoryId(1),
            icon_type: IconType::Generated,
            symbol_name: None,
            icon_url: None,
            hex_color: None,
            sort_order,
        }
    }

    #[test]
    fn assigns_dense_orders_in_input_order() {
        let updates = assign_sort_orders(&[BookmarkId(7), BookmarkId(3), BookmarkId(9)]);
        let pairs: Vec<_> = updates
            .iter()
            .map(|u| (u.bookmark_id.0, u.sort_order))
            .collect();
        assert_eq!(pairs, vec![(7, 0), (3, 1), (9, 2)]);
    }

    #[test]
    fn empty_input_assigns_nothing() {
        assert!(assign_sort_orders(&[]).is_empty());
    }

    #[test]
    fn normalize_closes_gaps() {
        let mut category = Category {
            id: CategoryId(1),
            name: "Dev".into(),
            hex_color: "#8b5cf6".into(),
            default_symbol: None,
            sort_order: 0,
            bookmarks: vec![bookmark(1, 4), bookmark(2, 10), bookmark(3, 11)],
        };
        assert!(!is_dense(&category.bookmarks));

        normalize(&mut category);
        assert!(is_dense(&category.bookmarks));
        assert_eq!(category.bookmarks[2].sort_order, 2);
    }
}
