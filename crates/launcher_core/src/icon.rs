//! Icon resolution for bookmarks.
//!
//! Symbol names are user-authored free text, so they go through an alias table
//! before being matched against the fixed icon vocabulary. The vocabulary
//! itself sits behind [`SymbolLookup`] so resolution can be exercised without a
//! concrete icon set.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use shared::domain::{non_empty, Bookmark, Category, IconType};

/// Symbol every lookup must be able to render.
pub const FALLBACK_SYMBOL: &str = "bookmark";

const GENERATED_PLACEHOLDER: char = '?';

pub const SYMBOL_ALIASES: &[(&str, &str)] = &[
    ("database", "circle-stack"),
    ("db", "circle-stack"),
    ("settings", "cog-6-tooth"),
    ("gear", "cog-6-tooth"),
    ("cog", "cog-6-tooth"),
    ("config", "adjustments-horizontal"),
    ("terminal", "command-line"),
    ("cli", "command-line"),
    ("console", "command-line"),
    ("code", "code-bracket"),
    ("mail", "envelope"),
    ("email", "envelope"),
    ("cart", "shopping-cart"),
    ("server", "server-stack"),
    ("chat", "chat-bubble-oval-left"),
    ("message", "chat-bubble-oval-left"),
    ("chatbot", "chat-bubble-left-right"),
    ("globe", "globe-alt"),
    ("world", "globe-alt"),
    ("lightbulb", "light-bulb"),
    ("bulb", "light-bulb"),
    ("music", "musical-note"),
    ("audio", "musical-note"),
    ("security", "shield-check"),
    ("shield", "shield-check"),
    ("lock", "lock-closed"),
    ("rocket", "rocket-launch"),
    ("launch", "rocket-launch"),
    ("tools", "wrench-screwdriver"),
    ("wrench", "wrench-screwdriver"),
    ("chart", "chart-bar"),
    ("analytics", "chart-bar"),
    ("graph", "chart-bar"),
    ("stats", "chart-bar"),
    ("puzzle", "puzzle-piece"),
    ("plugin", "puzzle-piece"),
    ("cpu", "cpu-chip"),
    ("chip", "cpu-chip"),
    ("ai", "sparkles"),
    ("magic", "sparkles"),
    ("payment", "credit-card"),
    ("card", "credit-card"),
    ("video", "play"),
    ("movie", "film"),
];

/// Outline icon set available to the view layer.
pub const OUTLINE_SYMBOLS: &[&str] = &[
    "academic-cap",
    "adjustments-horizontal",
    "adjustments-vertical",
    "archive-box",
    "arrow-path",
    "arrow-top-right-on-square",
    "at-symbol",
    "banknotes",
    "bars-3",
    "beaker",
    "bell",
    "bolt",
    "book-open",
    "bookmark",
    "briefcase",
    "bug-ant",
    "building-library",
    "building-office",
    "cake",
    "calculator",
    "calendar",
    "calendar-days",
    "camera",
    "chart-bar",
    "chart-pie",
    "chat-bubble-left-right",
    "chat-bubble-oval-left",
    "check-circle",
    "circle-stack",
    "clipboard",
    "clock",
    "cloud",
    "code-bracket",
    "cog-6-tooth",
    "command-line",
    "computer-desktop",
    "cpu-chip",
    "credit-card",
    "cube",
    "currency-dollar",
    "device-phone-mobile",
    "document",
    "document-text",
    "envelope",
    "eye",
    "film",
    "fire",
    "flag",
    "folder",
    "gift",
    "globe-alt",
    "hashtag",
    "heart",
    "home",
    "identification",
    "inbox",
    "key",
    "language",
    "light-bulb",
    "link",
    "lock-closed",
    "map",
    "map-pin",
    "megaphone",
    "microphone",
    "moon",
    "musical-note",
    "newspaper",
    "paint-brush",
    "paper-airplane",
    "photo",
    "play",
    "puzzle-piece",
    "queue-list",
    "rocket-launch",
    "rss",
    "scale",
    "server",
    "server-stack",
    "share",
    "shield-check",
    "shopping-bag",
    "shopping-cart",
    "sparkles",
    "star",
    "sun",
    "tag",
    "trophy",
    "truck",
    "tv",
    "user",
    "user-group",
    "users",
    "video-camera",
    "wallet",
    "wifi",
    "wrench",
    "wrench-screwdriver",
];

/// A concrete entry of the icon vocabulary, by canonical kebab-case name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymbolIcon {
    pub name: String,
}

impl SymbolIcon {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IconRef {
    Image { url: String },
    Symbol(SymbolIcon),
    /// Text rendered on the gradient background instead of an icon.
    Glyph { text: String },
}

pub trait SymbolLookup {
    /// Resolves a free-form, case-insensitive key. Aliases apply before the
    /// direct match.
    fn lookup(&self, key: &str) -> Option<SymbolIcon>;

    /// Generic bookmark icon. Always renderable.
    fn fallback(&self) -> SymbolIcon {
        SymbolIcon::new(FALLBACK_SYMBOL)
    }
}

impl<F> SymbolLookup for F
where
    F: Fn(&str) -> Option<SymbolIcon>,
{
    fn lookup(&self, key: &str) -> Option<SymbolIcon> {
        self(key)
    }
}

#[derive(Debug, Clone)]
pub struct SymbolCatalog {
    symbols: HashSet<String>,
    aliases: HashMap<String, String>,
}

impl Default for SymbolCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SymbolCatalog {
    /// Built-in outline vocabulary and alias table.
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        catalog.extend_symbols(OUTLINE_SYMBOLS.iter().copied());
        for (alias, target) in SYMBOL_ALIASES {
            catalog.insert_alias(alias, target);
        }
        catalog
    }

    /// Vocabulary holding only the fallback symbol.
    pub fn empty() -> Self {
        let mut symbols = HashSet::new();
        symbols.insert(FALLBACK_SYMBOL.to_string());
        Self {
            symbols,
            aliases: HashMap::new(),
        }
    }

    pub fn extend_symbols<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            let name = name.trim().to_ascii_lowercase();
            if !name.is_empty() {
                self.symbols.insert(name);
            }
        }
    }

    pub fn insert_alias(&mut self, alias: &str, target: &str) {
        self.aliases.insert(
            alias.trim().to_ascii_lowercase(),
            target.trim().to_ascii_lowercase(),
        );
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    fn resolve_name(&self, lowered: &str) -> Option<String> {
        let name = self
            .aliases
            .get(lowered)
            .map(String::as_str)
            .unwrap_or(lowered);
        self.symbols.contains(name).then(|| name.to_string())
    }
}

impl SymbolLookup for SymbolCatalog {
    fn lookup(&self, key: &str) -> Option<SymbolIcon> {
        let trimmed = key.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Some(name) = self.resolve_name(&trimmed.to_ascii_lowercase()) {
            return Some(SymbolIcon::new(name));
        }

        // Component-style names such as `AcademicCapIcon`.
        let kebab = pascal_to_kebab(trimmed);
        let kebab = kebab.strip_suffix("-icon").unwrap_or(&kebab);
        self.resolve_name(kebab).map(SymbolIcon::new)
    }
}

/// `AcademicCapIcon` -> `academic-cap-icon`, `Cog6Tooth` -> `cog-6-tooth`.
pub fn pascal_to_kebab(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;

    for ch in name.chars() {
        if let Some(p) = prev {
            let boundary = (ch.is_ascii_uppercase() && p != '-')
                || (ch.is_ascii_digit() && p.is_ascii_alphabetic())
                || (ch.is_ascii_alphabetic() && p.is_ascii_digit());
            if boundary {
                out.push('-');
            }
        }
        out.push(ch.to_ascii_lowercase());
        prev = Some(ch);
    }

    out
}

/// First match wins:
/// custom image, own symbol, generated glyph, category symbol, fallback.
pub fn resolve(bookmark: &Bookmark, category: &Category, lookup: &dyn SymbolLookup) -> IconRef {
    match bookmark.icon_type {
        IconType::Custom => {
            if let Some(url) = non_empty(bookmark.icon_url.as_deref()) {
                return IconRef::Image {
                    url: url.to_string(),
                };
            }
        }
        IconType::Symbol => {
            let own = non_empty(bookmark.symbol_name.as_deref()).and_then(|n| lookup.lookup(n));
            if let Some(icon) = own {
                return IconRef::Symbol(icon);
            }
        }
        IconType::Generated => {
            let initial = bookmark.title.chars().next().unwrap_or(GENERATED_PLACEHOLDER);
            return IconRef::Glyph {
                text: initial.to_string(),
            };
        }
        IconType::Favicon => {}
    }

    let category_symbol =
        non_empty(category.default_symbol.as_deref()).and_then(|n| lookup.lookup(n));
    if let Some(icon) = category_symbol {
        return IconRef::Symbol(icon);
    }

    IconRef::Symbol(lookup.fallback())
}

#[cfg(test)]
#[path = "tests/icon_tests.rs"]
mod tests;
