//! Per-bookmark render descriptors: resolved icon plus gradient stops.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shared::domain::{
    non_empty, Bookmark, BookmarkId, Category, IconType, DEFAULT_CATEGORY_COLOR,
};
use tracing::debug;

use crate::{
    color::{gradient, gradient_end, GradientPair, DEFAULT_HUE_SHIFT},
    icon::{resolve, IconRef, SymbolLookup},
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PresentationDescriptor {
    pub icon: IconRef,
    pub color_start: String,
    pub color_end: String,
}

/// Everything a descriptor depends on. The title is part of it because
/// generated glyphs are taken from it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PresentationKey {
    bookmark_id: Option<BookmarkId>,
    bookmark_color: Option<String>,
    category_color: String,
    icon_type: IconType,
    symbol_name: Option<String>,
    icon_url: Option<String>,
    default_symbol: Option<String>,
    title: String,
}

impl PresentationKey {
    fn new(bookmark: &Bookmark, category: &Category) -> Self {
        Self {
            bookmark_id: bookmark.id,
            bookmark_color: bookmark.hex_color.clone(),
            category_color: category.hex_color.clone(),
            icon_type: bookmark.icon_type,
            symbol_name: bookmark.symbol_name.clone(),
            icon_url: bookmark.icon_url.clone(),
            default_symbol: category.default_symbol.clone(),
            title: bookmark.title.clone(),
        }
    }
}

/// Bookmark override first, then the category color, then `fallback`.
pub fn accent_color<'a>(
    bookmark: &'a Bookmark,
    category: &'a Category,
    fallback: &'a str,
) -> &'a str {
    non_empty(bookmark.hex_color.as_deref()).unwrap_or_else(|| category_accent(category, fallback))
}

/// Category color, or `fallback` when it is blank.
pub fn category_accent<'a>(category: &'a Category, fallback: &'a str) -> &'a str {
    non_empty(Some(category.hex_color.as_str())).unwrap_or(fallback)
}

pub fn bind(
    bookmark: &Bookmark,
    category: &Category,
    lookup: &dyn SymbolLookup,
    hue_shift: f64,
) -> PresentationDescriptor {
    bind_with_default(bookmark, category, lookup, hue_shift, DEFAULT_CATEGORY_COLOR)
}

fn bind_with_default(
    bookmark: &Bookmark,
    category: &Category,
    lookup: &dyn SymbolLookup,
    hue_shift: f64,
    default_color: &str,
) -> PresentationDescriptor {
    let start = accent_color(bookmark, category, default_color);
    PresentationDescriptor {
        icon: resolve(bookmark, category, lookup),
        color_start: start.to_string(),
        color_end: gradient_end(start, hue_shift),
    }
}

/// Memoizing binder. Call [`PresentationBinder::invalidate`] whenever a new
/// snapshot replaces the data it was computed from.
#[derive(Debug)]
pub struct PresentationBinder<L> {
    lookup: L,
    hue_shift: f64,
    default_color: String,
    cache: HashMap<PresentationKey, PresentationDescriptor>,
}

impl<L: SymbolLookup> PresentationBinder<L> {
    pub fn new(lookup: L) -> Self {
        Self {
            lookup,
            hue_shift: DEFAULT_HUE_SHIFT,
            default_color: DEFAULT_CATEGORY_COLOR.to_string(),
            cache: HashMap::new(),
        }
    }

    pub fn with_hue_shift(mut self, hue_shift: f64) -> Self {
        self.hue_shift = hue_shift;
        self.cache.clear();
        self
    }

    pub fn with_default_color(mut self, color: impl Into<String>) -> Self {
        self.default_color = color.into();
        self.cache.clear();
        self
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub fn describe(
        &mut self,
        bookmark: &Bookmark,
        category: &Category,
    ) -> PresentationDescriptor {
        let key = PresentationKey::new(bookmark, category);
        if let Some(hit) = self.cache.get(&key) {
            return hit.clone();
        }

        let descriptor = bind_with_default(
            bookmark,
            category,
            &self.lookup,
            self.hue_shift,
            &self.default_color,
        );
        self.cache.insert(key, descriptor.clone());
        descriptor
    }

    /// Gradient for the category header, with the same blank-color default
    /// as its bookmarks.
    pub fn category_gradient(&self, category: &Category) -> GradientPair {
        gradient(
            category_accent(category, &self.default_color),
            self.hue_shift,
        )
    }

    /// Descriptors for a category's bookmarks, in display order.
    pub fn describe_category(&mut self, category: &Category) -> Vec<PresentationDescriptor> {
        category
            .bookmarks
            .iter()
            .map(|bookmark| self.describe(bookmark, category))
            .collect()
    }

    pub fn invalidate(&mut self) {
        if !self.cache.is_empty() {
            debug!(entries = self.cache.len(), "presentation cache cleared");
        }
        self.cache.clear();
    }

    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
#[path = "tests/presentation_tests.rs"]
mod tests;
