//! Props editor: builds the editing surface for one block instance.
//!
//! The surface is generated from the block type's field schema, so a new
//! block type gets its editor by registering a schema. Unknown block keys
//! get a fallback surface showing the raw props instead of a crash.

use serde_json::Value;

use crate::blocks::{BlockRegistry, FieldKind, FieldSpec};
use crate::form::{Form, FormElement, ListControl};
use crate::media::MediaResolver;
use crate::models::BlockInstance;

/// Weight offsets for the per-item list controls, placed after the item's
/// own fields.
const WEIGHT_REMOVE: i32 = 100;
const WEIGHT_MOVE_UP: i32 = 101;
const WEIGHT_MOVE_DOWN: i32 = 102;
/// Weight of the trailing add-item control.
const WEIGHT_ADD: i32 = 1000;

/// Build the props editing form for `instance`.
pub fn build_props_form(
    instance: &BlockInstance,
    registry: &BlockRegistry,
    media: &dyn MediaResolver,
) -> Form {
    let form_id = format!("block_props:{}", instance.id);

    let Some(definition) = registry.get(&instance.block_key) else {
        return fallback_form(form_id, instance);
    };

    let mut form = Form::new(form_id).title(definition.display_name.clone());
    if let Some(description) = &definition.description {
        form = form.description(description.clone());
    }

    for (position, spec) in definition.fields.iter().enumerate() {
        let value = instance.props.get(&spec.name);
        let element = build_field(spec, value, media).weight(position as i32);
        form = form.element(spec.name.clone(), element);
    }

    form
}

/// Fallback surface for an unregistered block type: a notice plus the raw
/// props, read-only, so the user can see what the block held and remove it.
fn fallback_form(form_id: String, instance: &BlockInstance) -> Form {
    let raw = serde_json::to_string_pretty(&Value::Object(instance.props.clone()))
        .unwrap_or_default();

    Form::new(form_id)
        .title("Editor not available")
        .element(
            "notice",
            FormElement::markup(format!(
                "No editor is available for block type '{}'. The block's raw \
                 configuration is shown below; you can remove the block or \
                 restore its type in the catalogue.",
                instance.block_key
            ))
            .weight(0),
        )
        .element("raw_props", FormElement::json_view(raw).weight(1))
}

/// Build the element for one field from its spec and current value.
fn build_field(spec: &FieldSpec, value: Option<&Value>, media: &dyn MediaResolver) -> FormElement {
    let mut element = match &spec.kind {
        FieldKind::Text { max_length } => {
            let current = value.and_then(Value::as_str).unwrap_or_default();
            let mut el = FormElement::textfield()
                .text_limits(*max_length, current.chars().count());
            if !current.is_empty() {
                el = el.default_value(current);
            }
            el
        }
        FieldKind::LongText { rows, rich } => {
            let mut el = FormElement::textarea(*rows, *rich);
            if let Some(text) = value.and_then(Value::as_str) {
                el = el.default_value(text);
            }
            el
        }
        FieldKind::Number { min, max } => {
            let mut el = FormElement::number(*min, *max);
            if let Some(n) = value.and_then(Value::as_f64) {
                el = el.default_value(n);
            }
            el
        }
        FieldKind::Toggle => {
            let current = value.and_then(Value::as_bool).unwrap_or(false);
            FormElement::checkbox().default_value(current)
        }
        FieldKind::Media { media: kind } => {
            let reference = value.and_then(Value::as_str).unwrap_or_default();
            let preview = if reference.is_empty() {
                None
            } else {
                media.resolve(reference)
            };
            let mut el = FormElement::media(*kind).media_preview(preview, !reference.is_empty());
            if !reference.is_empty() {
                el = el.default_value(reference);
            }
            el
        }
        FieldKind::ItemList {
            item,
            min_items,
            max_items,
        } => build_item_list(spec, item, *min_items, *max_items, value, media),
    };

    element = element.title(spec.label.clone());
    if let Some(help) = &spec.help {
        element = element.description(help.clone());
    }
    if spec.required {
        element = element.required();
    }
    element
}

/// Build the container for a repeatable-list field: one nested form per
/// item plus its move/remove controls, and a trailing add control.
fn build_item_list(
    spec: &FieldSpec,
    item_fields: &[FieldSpec],
    min_items: usize,
    max_items: usize,
    value: Option<&Value>,
    media: &dyn MediaResolver,
) -> FormElement {
    let empty = Vec::new();
    let items = value.and_then(Value::as_array).unwrap_or(&empty);
    let count = items.len();

    let mut list = FormElement::container();

    for (index, entry) in items.iter().enumerate() {
        let mut item_form = FormElement::container().weight(index as i32);

        for (position, field) in item_fields.iter().enumerate() {
            let field_value = entry.as_object().and_then(|obj| obj.get(&field.name));
            let element = build_field(field, field_value, media).weight(position as i32);
            item_form = item_form.child(field.name.clone(), element);
        }

        // Items at or below the configured minimum cannot be removed.
        item_form = item_form
            .child(
                "_remove",
                FormElement::button(ListControl::RemoveItem {
                    field: spec.name.clone(),
                    index,
                })
                .title("Remove")
                .disabled(count <= min_items)
                .weight(WEIGHT_REMOVE),
            )
            .child(
                "_move_up",
                FormElement::button(ListControl::MoveItemUp {
                    field: spec.name.clone(),
                    index,
                })
                .title("Move up")
                .disabled(index == 0)
                .weight(WEIGHT_MOVE_UP),
            )
            .child(
                "_move_down",
                FormElement::button(ListControl::MoveItemDown {
                    field: spec.name.clone(),
                    index,
                })
                .title("Move down")
                .disabled(index + 1 == count)
                .weight(WEIGHT_MOVE_DOWN),
            );

        list = list.child(index.to_string(), item_form);
    }

    list.child(
        "_add",
        FormElement::button(ListControl::AddItem {
            field: spec.name.clone(),
        })
        .title("Add")
        .disabled(count >= max_items)
        .weight(WEIGHT_ADD),
    )
}
