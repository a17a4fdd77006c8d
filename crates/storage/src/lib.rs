use anyhow::{Context, Result};
use async_trait::async_trait;
use launcher_core::BookmarkStore;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    collections::{HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{debug, info, warn};

use shared::{
    domain::{non_empty, Bookmark, BookmarkId, Category, CategoryId, IconType},
    error::ApiException,
    protocol::{BookmarkDraft, ReorderIntent, SortOrderUpdate},
};

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// Inserts a category after every existing one.
    pub async fn create_category(
        &self,
        name: &str,
        hex_color: &str,
        default_symbol: Option<&str>,
    ) -> Result<CategoryId> {
        let name = non_empty(Some(name))
            .ok_or_else(|| ApiException::validation("category name must not be empty"))?;

        let rec = sqlx::query(
            "INSERT INTO categories (name, hex_color, default_symbol, sort_order)
             VALUES (?, ?, ?, (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM categories))
             RETURNING id",
        )
        .bind(name)
        .bind(hex_color.trim())
        .bind(non_empty(default_symbol))
        .fetch_one(&self.pool)
        .await?;
        let category_id = CategoryId(rec.get::<i64, _>(0));
        info!(category_id = category_id.0, "category created");
        Ok(category_id)
    }

    /// Inserts a bookmark at the end of its category.
    pub async fn create_bookmark(&self, draft: &BookmarkDraft) -> Result<BookmarkId> {
        let title = non_empty(Some(draft.title.as_str()))
            .ok_or_else(|| ApiException::validation("bookmark title must not be empty"))?;

        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM categories WHERE id = ?")
            .bind(draft.category_id.0)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(ApiException::not_found(format!(
                "category {} does not exist",
                draft.category_id.0
            ))
            .into());
        }

        let rec = sqlx::query(
            "INSERT INTO bookmarks
                (category_id, title, url, icon_type, symbol_name, icon_url, hex_color, sort_order)
             VALUES (?, ?, ?, ?, ?, ?, ?,
                (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM bookmarks WHERE category_id = ?))
             RETURNING id, sort_order",
        )
        .bind(draft.category_id.0)
        .bind(title)
        .bind(draft.url.trim())
        .bind(draft.icon_type.as_str())
        .bind(non_empty(draft.symbol_name.as_deref()))
        .bind(non_empty(draft.icon_url.as_deref()))
        .bind(non_empty(draft.hex_color.as_deref()))
        .bind(draft.category_id.0)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        let bookmark_id = BookmarkId(rec.get::<i64, _>(0));
        debug!(
            bookmark_id = bookmark_id.0,
            category_id = draft.category_id.0,
            sort_order = rec.get::<i64, _>(1),
            "bookmark inserted"
        );
        Ok(bookmark_id)
    }

    /// Every category with its bookmarks, both ordered by sort order. Ties
    /// fall back to insertion order.
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let category_rows = sqlx::query(
            "SELECT id, name, hex_color, default_symbol, sort_order
             FROM categories
             ORDER BY sort_order ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let bookmark_rows = sqlx::query(
            "SELECT id, category_id, title, url, icon_type, symbol_name, icon_url, hex_color, sort_order
             FROM bookmarks
             ORDER BY category_id ASC, sort_order ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut by_category: HashMap<CategoryId, Vec<Bookmark>> = HashMap::new();
        for row in &bookmark_rows {
            let bookmark = bookmark_from_row(row);
            by_category
                .entry(bookmark.category_id)
                .or_default()
                .push(bookmark);
        }

        Ok(category_rows
            .into_iter()
            .map(|r| {
                let id = CategoryId(r.get::<i64, _>(0));
                Category {
                    id,
                    name: r.get::<String, _>(1),
                    hex_color: r.get::<String, _>(2),
                    default_symbol: r.get::<Option<String>, _>(3),
                    sort_order: r.get::<i64, _>(4),
                    bookmarks: by_category.remove(&id).unwrap_or_default(),
                }
            })
            .collect())
    }

    /// Writes a full renumbering of one category in a single transaction.
    /// The updates must name every bookmark of the category exactly once and
    /// nothing else; otherwise nothing is written.
    pub async fn apply_sort_orders(
        &self,
        category_id: CategoryId,
        updates: &[SortOrderUpdate],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let stored: HashSet<i64> =
            sqlx::query_scalar::<_, i64>("SELECT id FROM bookmarks WHERE category_id = ?")
                .bind(category_id.0)
                .fetch_all(&mut *tx)
                .await?
                .into_iter()
                .collect();

        let mut seen = HashSet::with_capacity(updates.len());
        for update in updates {
            let id = update.bookmark_id.0;
            if !stored.contains(&id) {
                return Err(ApiException::validation(format!(
                    "bookmark {id} is not in category {}",
                    category_id.0
                ))
                .into());
            }
            if !seen.insert(id) {
                return Err(ApiException::validation(format!(
                    "bookmark {id} appears more than once in reorder"
                ))
                .into());
            }
        }
        if seen.len() != stored.len() {
            return Err(ApiException::validation(format!(
                "reorder of category {} covers {} of {} bookmarks",
                category_id.0,
                seen.len(),
                stored.len()
            ))
            .into());
        }

        for update in updates {
            sqlx::query("UPDATE bookmarks SET sort_order = ? WHERE id = ? AND category_id = ?")
                .bind(update.sort_order)
                .bind(update.bookmark_id.0)
                .bind(category_id.0)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        info!(
            category_id = category_id.0,
            bookmarks = updates.len(),
            "sort orders applied"
        );
        Ok(())
    }
}

fn bookmark_from_row(row: &SqliteRow) -> Bookmark {
    let id = row.get::<i64, _>(0);
    let raw_icon_type = row.get::<String, _>(4);
    let icon_type = IconType::parse(&raw_icon_type).unwrap_or_else(|| {
        warn!(bookmark_id = id, icon_type = %raw_icon_type, "unknown icon type");
        IconType::default()
    });

    Bookmark {
        id: Some(BookmarkId(id)),
        category_id: CategoryId(row.get::<i64, _>(1)),
        title: row.get::<String, _>(2),
        url: row.get::<String, _>(3),
        icon_type,
        symbol_name: row.get::<Option<String>, _>(5),
        icon_url: row.get::<Option<String>, _>(6),
        hex_color: row.get::<Option<String>, _>(7),
        sort_order: row.get::<i64, _>(8),
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[async_trait]
impl BookmarkStore for Storage {
    async fn fetch_snapshot(&self) -> Result<Vec<Category>> {
        self.list_categories().await
    }

    async fn reorder(&self, intent: &ReorderIntent) -> Result<()> {
        self.apply_sort_orders(intent.category_id, &intent.assignments)
            .await
    }

    async fn create_bookmark(&self, draft: &BookmarkDraft) -> Result<BookmarkId> {
        Storage::create_bookmark(self, draft).await
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
