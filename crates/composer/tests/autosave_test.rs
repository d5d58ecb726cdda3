#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Autosave tests, run against a paused clock so the debounce window is
//! exercised deterministically.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::time::sleep;

use nido_composer::blocks::BlockRegistry;
use nido_composer::editor::{PageEditor, SaveStatus};
use nido_composer::error::StoreError;
use nido_test_utils::{MemoryPageStore, test_page};

const WINDOW: Duration = Duration::from_millis(2000);

fn editor_with_store() -> (PageEditor, Arc<MemoryPageStore>) {
    let registry = Arc::new(BlockRegistry::with_standard_catalogue());
    let store = Arc::new(MemoryPageStore::with_page(test_page("page-home", "home")));
    let editor = PageEditor::new(registry, store.clone());
    (editor, store)
}

fn props(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected object, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn mutations_within_the_window_produce_exactly_one_save() {
    let (editor, store) = editor_with_store();
    editor.load_page("page-home").await.unwrap();

    let hero = editor.add_block("hero");
    sleep(Duration::from_millis(1000)).await;

    // Still within the restarted window: no save yet.
    editor.update_block_props(hero, props(json!({ "heading": "Draft" })));
    sleep(Duration::from_millis(1000)).await;
    assert!(!editor.flush_due().await.unwrap());
    assert_eq!(store.save_count(), 0);

    editor.update_block_props(hero, props(json!({ "heading": "Final" })));
    sleep(WINDOW).await;
    assert!(editor.flush_due().await.unwrap());

    // Exactly one save, carrying the state as of the last mutation.
    assert_eq!(store.save_count(), 1);
    let call = store.last_save().unwrap();
    assert_eq!(call.page_id, "page-home");
    assert_eq!(call.blocks.len(), 1);
    assert_eq!(call.blocks[0].props.get("heading"), Some(&json!("Final")));
    assert_eq!(call.blocks[0].order, 0);

    assert!(!editor.is_dirty());
    assert!(matches!(editor.save_status(), SaveStatus::Saved { .. }));
}

#[tokio::test(start_paused = true)]
async fn saved_order_matches_array_position_after_reorder() {
    let (editor, store) = editor_with_store();
    editor.load_page("page-home").await.unwrap();

    editor.add_block("hero");
    let rich_text = editor.add_block("rich_text");
    editor.move_up(rich_text);

    editor.save_now().await.unwrap();
    let call = store.last_save().unwrap();
    let keys: Vec<&str> = call.blocks.iter().map(|b| b.block_key.as_str()).collect();
    let orders: Vec<usize> = call.blocks.iter().map(|b| b.order).collect();
    assert_eq!(keys, ["rich_text", "hero"]);
    assert_eq!(orders, [0, 1]);
}

#[tokio::test(start_paused = true)]
async fn manual_save_bypasses_and_clears_the_window() {
    let (editor, store) = editor_with_store();
    editor.load_page("page-home").await.unwrap();

    editor.add_block("hero");
    editor.save_now().await.unwrap();
    assert_eq!(store.save_count(), 1);
    assert!(!editor.is_dirty());

    // The pending window was cleared: nothing further fires.
    assert_eq!(editor.next_deadline(), None);
    sleep(WINDOW).await;
    assert!(!editor.flush_due().await.unwrap());
    assert_eq!(store.save_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn no_save_is_attempted_without_a_loaded_page() {
    let (editor, store) = editor_with_store();
    editor.save_now().await.unwrap();
    assert_eq!(store.save_count(), 0);
    assert_eq!(editor.save_status(), SaveStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn failed_save_leaves_dirty_set_and_the_next_mutation_retries() {
    let (editor, store) = editor_with_store();
    editor.load_page("page-home").await.unwrap();

    store.fail_next_save();
    let hero = editor.add_block("hero");
    sleep(WINDOW).await;
    let result = editor.flush_due().await;
    assert!(matches!(result, Err(StoreError::SaveFailed)));
    assert_eq!(store.save_count(), 0);
    assert!(editor.is_dirty(), "failed save must keep changes pending");
    assert_eq!(editor.save_status(), SaveStatus::Failed);

    // A subsequent mutation arms a new window and the retry succeeds.
    editor.update_block_props(hero, props(json!({ "heading": "Retry" })));
    sleep(WINDOW).await;
    assert!(editor.flush_due().await.unwrap());
    assert_eq!(store.save_count(), 1);
    assert!(!editor.is_dirty());
}

#[tokio::test(start_paused = true)]
async fn rejected_save_maps_positional_errors_back_to_instance_ids() {
    let (editor, store) = editor_with_store();
    editor.load_page("page-home").await.unwrap();

    editor.add_block("hero");
    let second = editor.add_block("rich_text");

    let mut rejection = BTreeMap::new();
    rejection.insert(1usize, "body too large".to_string());
    store.reject_next_save(rejection);

    let result = editor.save_now().await;
    assert!(matches!(result, Err(StoreError::InvalidBlocks(_))));

    let remote = editor.remote_errors();
    assert_eq!(remote.len(), 1);
    assert_eq!(remote.get(&second).map(String::as_str), Some("body too large"));
    assert!(editor.is_dirty());
}

#[tokio::test(start_paused = true)]
async fn run_pending_waits_out_the_window_and_saves() {
    let (editor, store) = editor_with_store();
    editor.load_page("page-home").await.unwrap();

    editor.add_block("hero");
    assert!(editor.run_pending().await.unwrap());
    assert_eq!(store.save_count(), 1);

    // Nothing armed afterwards.
    assert!(!editor.run_pending().await.unwrap());
    assert_eq!(store.save_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn closing_the_page_drops_the_pending_save() {
    let (editor, store) = editor_with_store();
    editor.load_page("page-home").await.unwrap();

    editor.add_block("hero");
    editor.close_page();

    sleep(WINDOW).await;
    assert!(!editor.flush_due().await.unwrap());
    assert_eq!(store.save_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn switching_pages_drops_the_pending_save_of_the_old_page() {
    let (editor, store) = editor_with_store();
    store.insert_page(test_page("page-fees", "fees"));
    editor.load_page("page-home").await.unwrap();

    editor.add_block("hero");
    editor.load_page("page-fees").await.unwrap();

    sleep(WINDOW).await;
    assert!(!editor.flush_due().await.unwrap());
    assert_eq!(store.save_count(), 0);
    assert!(store.page("page-home").unwrap().blocks.is_empty());
}
