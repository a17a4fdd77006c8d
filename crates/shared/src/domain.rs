use serde::{Deserialize, Serialize};

/// Accent color used when a category carries no usable color of its own.
pub const DEFAULT_CATEGORY_COLOR: &str = "#8b5cf6";

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);
    };
}

id_newtype!(CategoryId);
id_newtype!(BookmarkId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IconType {
    Symbol,
    Custom,
    Generated,
    /// Site favicon. Has no dedicated resolution tier; rendering falls back to
    /// the category symbol or the generic bookmark icon.
    #[default]
    Favicon,
}

impl IconType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Symbol => "symbol",
            Self::Custom => "custom",
            Self::Generated => "generated",
            Self::Favicon => "favicon",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "symbol" => Some(Self::Symbol),
            "custom" => Some(Self::Custom),
            "generated" => Some(Self::Generated),
            "favicon" => Some(Self::Favicon),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    /// `None` marks an unsaved draft, e.g. a freshly duplicated bookmark.
    #[serde(default)]
    pub id: Option<BookmarkId>,
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
    #[serde(default)]
    pub sort_order: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default = "default_category_color")]
    pub hex_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_symbol: Option<String>,
    #[serde(default)]
    pub sort_order: i64,
    /// Ordered by ascending `sort_order`.
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,
}

impl Category {
    /// Saved bookmark ids in display order. Drafts without an id are skipped.
    pub fn bookmark_ids(&self) -> Vec<BookmarkId> {
        self.bookmarks.iter().filter_map(|b| b.id).collect()
    }

    pub fn find_bookmark(&self, bookmark_id: BookmarkId) -> Option<&Bookmark> {
        self.bookmarks.iter().find(|b| b.id == Some(bookmark_id))
    }
}

fn default_category_color() -> String {
    DEFAULT_CATEGORY_COLOR.to_string()
}

/// Returns the value when it holds anything other than whitespace.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_defaults_fill_missing_fields() {
        let category: Category =
            serde_json::from_str(r#"{"id": 4, "name": "Work"}"#).expect("category json");
        assert_eq!(category.hex_color, DEFAULT_CATEGORY_COLOR);
        assert!(category.bookmarks.is_empty());
        assert_eq!(category.default_symbol, None);
    }

    #[test]
    fn bookmark_without_id_deserializes_as_draft() {
        let bookmark: Bookmark = serde_json::from_str(
            r#"{"id": null, "title": "Docs", "url": "https://docs.rs", "category_id": 1, "icon_type": "generated"}"#,
        )
        .expect("bookmark json");
        assert_eq!(bookmark.id, None);
        assert_eq!(bookmark.icon_type, IconType::Generated);
        assert_eq!(bookmark.sort_order, 0);
    }

    #[test]
    fn icon_type_parse_is_case_insensitive() {
        assert_eq!(IconType::parse(" Custom "), Some(IconType::Custom));
        assert_eq!(IconType::parse("emoji"), None);
        assert_eq!(IconType::Symbol.as_str(), "symbol");
    }

    #[test]
    fn non_empty_rejects_whitespace() {
        assert_eq!(non_empty(Some("  ")), None);
        assert_eq!(non_empty(Some(" star ")), Some("star"));
        assert_eq!(non_empty(None), None);
    }
}
