#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Props editor tests: schema-driven form building through the editor,
//! list-item controls, and the unknown-block fallback.

use std::sync::Arc;

use serde_json::json;

use nido_composer::blocks::BlockRegistry;
use nido_composer::editor::PageEditor;
use nido_composer::form::ElementType;
use nido_composer::media::DirectUrlResolver;
use nido_test_utils::{MemoryPageStore, test_page};

fn editor() -> PageEditor {
    let registry = Arc::new(BlockRegistry::with_standard_catalogue());
    let store = Arc::new(MemoryPageStore::with_page(test_page("page-home", "home")));
    PageEditor::new(registry, store)
}

fn props(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("expected object, got {other:?}"),
    }
}

#[tokio::test]
async fn form_reflects_current_props_and_schema_order() {
    let editor = editor();
    editor.load_page("page-home").await.unwrap();

    let hero = editor.add_block("hero");
    editor.update_block_props(hero, props(json!({ "heading": "Welcome" })));

    let form = editor.props_form(hero, &DirectUrlResolver).unwrap();
    assert_eq!(form.title.as_deref(), Some("Hero banner"));

    let names: Vec<&str> = form
        .sorted_elements()
        .iter()
        .map(|(name, _)| name.as_str())
        .collect();
    assert_eq!(
        names,
        ["heading", "tagline", "background_image", "darken_overlay"]
    );

    let heading = form.elements.get("heading").unwrap();
    assert_eq!(heading.default_value, Some(json!("Welcome")));
    assert!(matches!(
        heading.element_type,
        ElementType::Textfield {
            max_length: Some(120),
            char_count: Some(7),
        }
    ));
}

#[tokio::test]
async fn a_lone_list_item_cannot_be_removed() {
    let editor = editor();
    editor.load_page("page-home").await.unwrap();

    let testimonials = editor.add_block("testimonials");
    editor.update_block_props(
        testimonials,
        props(json!({ "items": [{ "quote": "Lovely", "author": "Dana" }] })),
    );

    let form = editor.props_form(testimonials, &DirectUrlResolver).unwrap();
    let list = form.elements.get("items").unwrap();
    let only_item = list.children.get("0").unwrap();
    assert!(
        only_item.children.get("_remove").unwrap().disabled,
        "the last item at min_items = 1 must not be removable"
    );

    // With a second item both become removable.
    editor.update_block_props(
        testimonials,
        props(json!({
            "items": [
                { "quote": "Lovely", "author": "Dana" },
                { "quote": "Great", "author": "Ryo" }
            ]
        })),
    );
    let form = editor.props_form(testimonials, &DirectUrlResolver).unwrap();
    let list = form.elements.get("items").unwrap();
    assert!(!list.children.get("0").unwrap().children.get("_remove").unwrap().disabled);
    assert!(!list.children.get("1").unwrap().children.get("_remove").unwrap().disabled);
}

#[tokio::test]
async fn unknown_block_key_gets_the_fallback_surface() {
    let editor = editor();
    editor.load_page("page-home").await.unwrap();

    let widget = editor.add_block("retired_widget");
    editor.update_block_props(widget, props(json!({ "legacy": { "a": 1 } })));

    let form = editor.props_form(widget, &DirectUrlResolver).unwrap();
    assert_eq!(form.title.as_deref(), Some("Editor not available"));
    match &form.elements.get("raw_props").unwrap().element_type {
        ElementType::JsonView { value } => assert!(value.contains("legacy")),
        other => panic!("expected json view, got {other:?}"),
    }
}

#[tokio::test]
async fn props_form_for_an_unknown_id_is_none() {
    let editor = editor();
    editor.load_page("page-home").await.unwrap();
    assert!(editor.props_form(uuid::Uuid::now_v7(), &DirectUrlResolver).is_none());
}
