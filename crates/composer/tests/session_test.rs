#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Editing session tests: block CRUD, reordering, and page lifecycle
//! driven through the editor against the in-memory store.

use std::sync::Arc;

use serde_json::json;

use nido_composer::blocks::BlockRegistry;
use nido_composer::editor::PageEditor;
use nido_composer::error::StoreError;
use nido_composer::publish::PublishState;
use nido_test_utils::{MemoryPageStore, test_page};

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

#[tokio::test]
async fn compose_reorder_and_publish_scenario() {
    let (editor, store) = editor_with_store();
    editor.load_page("page-home").await.unwrap();

    // Start from an empty page: hero, then rich text, then move the rich
    // text block up.
    let hero = editor.add_block("hero");
    let rich_text = editor.add_block("rich_text");
    assert!(editor.move_up(rich_text));

    let order: Vec<String> = editor
        .blocks()
        .iter()
        .map(|b| b.block_key.clone())
        .collect();
    assert_eq!(order, ["rich_text", "hero"]);

    // An empty heading fails the hero validator and blocks publishing.
    editor.update_block_props(hero, props(json!({ "heading": "" })));
    editor.update_block_props(rich_text, props(json!({ "body": "<p>Come visit us.</p>" })));

    let errors = editor.errors();
    assert!(errors.contains_key(&hero));
    assert!(!errors.contains_key(&rich_text));
    assert!(editor.publish().await.is_err());
    assert_eq!(editor.publish_state(), PublishState::Draft);
    assert_eq!(store.is_published("page-home"), Some(false));

    // Fixing the heading clears the error and the same transition succeeds.
    editor.update_block_props(hero, props(json!({ "heading": "Welcome" })));
    assert!(editor.errors().is_empty());
    editor.publish().await.unwrap();
    assert_eq!(editor.publish_state(), PublishState::Published);
    assert_eq!(store.is_published("page-home"), Some(true));
}

#[tokio::test]
async fn surviving_ids_form_a_permutation_under_churn() {
    let (editor, _store) = editor_with_store();
    editor.load_page("page-home").await.unwrap();

    let a = editor.add_block("hero");
    let b = editor.add_block("rich_text");
    let c = editor.add_block("faq");
    editor.move_down(a);
    editor.move_before(c, a);
    editor.remove_block(b);
    let d = editor.duplicate_block(c).unwrap();

    let mut ids: Vec<_> = editor.blocks().iter().map(|blk| blk.id).collect();
    assert_eq!(ids.len(), 3);
    ids.sort();
    let mut expected = vec![a, c, d];
    expected.sort();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn selection_clears_when_selected_block_is_removed() {
    let (editor, _store) = editor_with_store();
    editor.load_page("page-home").await.unwrap();

    let hero = editor.add_block("hero");
    editor.select(Some(hero));
    assert_eq!(editor.selection(), Some(hero));

    editor.remove_block(hero);
    assert_eq!(editor.selection(), None);
}

#[tokio::test]
async fn loading_a_page_replaces_session_state() {
    let (editor, store) = editor_with_store();
    store.insert_page(test_page("page-fees", "fees"));

    editor.load_page("page-home").await.unwrap();
    editor.add_block("hero");
    assert!(editor.is_dirty());

    editor.load_page("page-fees").await.unwrap();
    assert!(!editor.is_dirty());
    assert!(editor.blocks().is_empty());
    assert_eq!(editor.page().unwrap().slug, "fees");
}

#[tokio::test]
async fn loading_an_unknown_page_fails_without_touching_the_session() {
    let (editor, _store) = editor_with_store();
    editor.load_page("page-home").await.unwrap();
    editor.add_block("hero");

    let result = editor.load_page("page-missing").await;
    assert!(matches!(result, Err(StoreError::PageNotFound)));
    assert_eq!(editor.page().unwrap().id, "page-home");
    assert_eq!(editor.blocks().len(), 1);
}

#[tokio::test]
async fn create_page_sanitizes_the_slug() {
    let (editor, store) = editor_with_store();
    let page_id = editor
        .create_page("centre-1", "New Page", "New Page!!")
        .await
        .unwrap();

    let stored = store.page(&page_id).unwrap();
    assert_eq!(stored.slug, "new-page");
    assert!(!stored.is_published);

    // The new page is loaded for editing.
    assert_eq!(editor.page().unwrap().id, page_id);
    assert_eq!(editor.publish_state(), PublishState::Draft);
}

#[tokio::test]
async fn create_page_surfaces_slug_conflicts() {
    let (editor, _store) = editor_with_store();
    // "home" is already taken by the seeded page.
    let result = editor.create_page("centre-1", "Another home", "Home").await;
    assert!(matches!(result, Err(StoreError::SlugConflict)));
}

#[tokio::test]
async fn create_page_rejects_unusable_slugs() {
    let (editor, _store) = editor_with_store();
    let result = editor.create_page("centre-1", "Oops", "!!!").await;
    assert!(matches!(result, Err(StoreError::CreateFailed(_))));
}

#[tokio::test]
async fn deleting_the_current_page_closes_the_session() {
    let (editor, store) = editor_with_store();
    editor.load_page("page-home").await.unwrap();
    editor.add_block("hero");

    editor.delete_page("page-home").await.unwrap();
    assert!(store.page("page-home").is_none());
    assert!(editor.page().is_none());
    assert!(editor.blocks().is_empty());
}

#[tokio::test]
async fn deleting_another_page_leaves_the_session_alone() {
    let (editor, store) = editor_with_store();
    store.insert_page(test_page("page-other", "other"));
    editor.load_page("page-home").await.unwrap();

    editor.delete_page("page-other").await.unwrap();
    assert_eq!(editor.page().unwrap().id, "page-home");
}

#[tokio::test]
async fn unknown_blocks_survive_a_load_and_stay_removable() {
    let (editor, store) = editor_with_store();
    let mut page = test_page("page-legacy", "legacy");
    page.blocks = vec![
        nido_test_utils::valid_hero(),
        nido_test_utils::test_block("retired_widget", json!({ "old": true })),
    ];
    store.insert_page(page);

    editor.load_page("page-legacy").await.unwrap();
    assert_eq!(editor.blocks().len(), 2);

    let retired = editor.blocks()[1].id;
    let errors = editor.errors();
    assert!(errors.get(&retired).unwrap().contains("unrecognized block type"));

    assert!(editor.remove_block(retired));
    assert!(editor.errors().is_empty());
}
