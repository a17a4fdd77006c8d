use super::*;
use launcher_core::sort_order::assign_sort_orders;

fn draft(category_id: CategoryId, title: &str) -> BookmarkDraft {
    BookmarkDraft {
        title: title.to_string(),
        url: format!("https://{}.example", title.to_lowercase()),
        category_id,
        icon_type: IconType::Symbol,
        symbol_name: Some("globe".into()),
        icon_url: None,
        hex_color: None,
    }
}

async fn seeded() -> (Storage, CategoryId, Vec<BookmarkId>) {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let category = storage
        .create_category("Work", "#3b82f6", Some("briefcase"))
        .await
        .expect("category");
    let mut ids = Vec::new();
    for title in ["Mail", "Docs", "Chat", "Wiki"] {
        ids.push(
            storage
                .create_bookmark(&draft(category, title))
                .await
                .expect("bookmark"),
        );
    }
    (storage, category, ids)
}

fn api_error(err: &anyhow::Error) -> &ApiException {
    err.downcast_ref::<ApiException>().expect("api exception")
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("launcher.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );
}

#[tokio::test]
async fn categories_and_bookmarks_append_in_order() {
    let (storage, work, ids) = seeded().await;
    let home = storage
        .create_category("Home", "#f97316", None)
        .await
        .expect("category");

    let snapshot = storage.list_categories().await.expect("list");
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot[0].id, work);
    assert_eq!(snapshot[0].sort_order, 0);
    assert_eq!(snapshot[0].default_symbol.as_deref(), Some("briefcase"));
    assert_eq!(snapshot[1].id, home);
    assert_eq!(snapshot[1].sort_order, 1);
    assert!(snapshot[1].bookmarks.is_empty());

    assert_eq!(snapshot[0].bookmark_ids(), ids);
    let orders: Vec<_> = snapshot[0].bookmarks.iter().map(|b| b.sort_order).collect();
    assert_eq!(orders, vec![0, 1, 2, 3]);
    assert_eq!(snapshot[0].bookmarks[0].icon_type, IconType::Symbol);
}

#[tokio::test]
async fn blank_optional_fields_are_stored_as_null() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let category = storage
        .create_category("Misc", "#8b5cf6", Some("  "))
        .await
        .expect("category");
    let mut blank = draft(category, "Blank");
    blank.symbol_name = Some(String::new());
    blank.hex_color = Some("   ".into());
    storage.create_bookmark(&blank).await.expect("bookmark");

    let snapshot = storage.list_categories().await.expect("list");
    assert_eq!(snapshot[0].default_symbol, None);
    assert_eq!(snapshot[0].bookmarks[0].symbol_name, None);
    assert_eq!(snapshot[0].bookmarks[0].hex_color, None);
}

#[tokio::test]
async fn apply_sort_orders_rewrites_whole_category() {
    let (storage, category, ids) = seeded().await;
    let reordered = vec![ids[1], ids[2], ids[0], ids[3]];

    storage
        .apply_sort_orders(category, &assign_sort_orders(&reordered))
        .await
        .expect("reorder");

    let snapshot = storage.list_categories().await.expect("list");
    assert_eq!(snapshot[0].bookmark_ids(), reordered);
}

#[tokio::test]
async fn partial_reorder_is_rejected_and_nothing_changes() {
    let (storage, category, ids) = seeded().await;
    let partial = vec![ids[3], ids[2]];

    let err = storage
        .apply_sort_orders(category, &assign_sort_orders(&partial))
        .await
        .expect_err("partial reorder");
    assert_eq!(api_error(&err).code, shared::error::ErrorCode::Validation);

    let snapshot = storage.list_categories().await.expect("list");
    assert_eq!(snapshot[0].bookmark_ids(), ids);
}

#[tokio::test]
async fn reorder_naming_foreign_bookmark_is_rejected() {
    let (storage, work, mut ids) = seeded().await;
    let home = storage
        .create_category("Home", "#f97316", None)
        .await
        .expect("category");
    let stray = storage
        .create_bookmark(&draft(home, "Recipes"))
        .await
        .expect("bookmark");

    ids[0] = stray;
    let err = storage
        .apply_sort_orders(work, &assign_sort_orders(&ids))
        .await
        .expect_err("foreign bookmark");
    assert!(api_error(&err).message.contains("is not in category"));
}

#[tokio::test]
async fn bookmark_in_missing_category_is_not_found() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let err = storage
        .create_bookmark(&draft(CategoryId(77), "Ghost"))
        .await
        .expect_err("missing category");
    assert_eq!(api_error(&err).code, shared::error::ErrorCode::NotFound);
}

#[tokio::test]
async fn store_trait_round_trips_reorder_intent() {
    let (storage, category, ids) = seeded().await;
    let store: &dyn BookmarkStore = &storage;
    let ordered_ids = vec![ids[3], ids[0], ids[1], ids[2]];
    let intent = ReorderIntent {
        category_id: category,
        assignments: assign_sort_orders(&ordered_ids),
        ordered_ids: ordered_ids.clone(),
    };

    store.reorder(&intent).await.expect("reorder");
    let snapshot = store.fetch_snapshot().await.expect("snapshot");
    assert_eq!(snapshot[0].bookmark_ids(), ordered_ids);
}
