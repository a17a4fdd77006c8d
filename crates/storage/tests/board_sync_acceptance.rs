use std::sync::Arc;

use launcher_core::{board::BookmarkBoard, drag::DragEvent, BookmarkStore, IconRef, MutationSync};
use shared::{domain::IconType, protocol::BookmarkDraft};
use storage::Storage;

#[tokio::test]
async fn drag_duplicate_and_refresh_against_sqlite() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let work = storage
        .create_category("Work", "#3b82f6", Some("briefcase"))
        .await
        .expect("category");
    let mut ids = Vec::new();
    for title in ["Mail", "Docs", "Chat", "Wiki"] {
        let draft = BookmarkDraft {
            title: title.into(),
            url: format!("https://{}.example", title.to_lowercase()),
            category_id: work,
            icon_type: IconType::Generated,
            symbol_name: None,
            icon_url: None,
            hex_color: None,
        };
        ids.push(storage.create_bookmark(&draft).await.expect("bookmark"));
    }

    let store: Arc<dyn BookmarkStore> = Arc::new(storage.clone());
    let sync = MutationSync::new(store.clone());
    let mut board = BookmarkBoard::new(store.fetch_snapshot().await.expect("snapshot"));

    board
        .handle_drag(work, DragEvent::Start(ids[0]))
        .expect("start");
    board
        .handle_drag(work, DragEvent::Over(Some(ids[2])))
        .expect("over");
    let intent = board
        .handle_drag(work, DragEvent::Drop)
        .expect("drop")
        .expect("intent");
    let optimistic = board.order(work).expect("order");

    let refreshed = sync
        .reorder(intent)
        .await
        .expect("sync")
        .expect("snapshot");
    board.replace_snapshot(refreshed);
    assert_eq!(board.order(work).expect("order"), optimistic);
    assert_eq!(optimistic, vec![ids[1], ids[2], ids[0], ids[3]]);

    let duplicate = board.duplicate(ids[1]).expect("duplicate");
    let refreshed = sync
        .apply(duplicate)
        .await
        .expect("create")
        .expect("snapshot");
    board.replace_snapshot(refreshed);

    let category = board.category(work).expect("category");
    let copy = category.bookmarks.last().expect("copy");
    assert_eq!(copy.title, "Docs (copy)");
    assert_eq!(copy.sort_order, 4);
    let copy_id = copy.id.expect("saved copy");
    assert!(!ids.contains(&copy_id));

    let descriptor = board.describe(work, copy_id).expect("descriptor");
    assert_eq!(descriptor.color_start, "#3b82f6");
    assert_eq!(descriptor.icon, IconRef::Glyph { text: "D".into() });
}
