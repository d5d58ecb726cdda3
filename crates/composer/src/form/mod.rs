//! Structured form surface for the props editor.
//!
//! Forms are plain serializable data: the editor client renders them and
//! posts edits straight back through the session's `update_block_props`,
//! so no field state lives only in the form. Elements are keyed by name
//! and ordered by weight.

pub mod props;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::blocks::MediaKind;

/// A complete editing surface for one block instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    /// Unique form identifier (e.g. "block_props:<instance-id>").
    pub form_id: String,

    /// Form title (the block type's display name).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Optional description shown under the title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Form elements keyed by name.
    pub elements: BTreeMap<String, FormElement>,
}

impl Form {
    /// Create a new form with the given ID.
    pub fn new(form_id: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            title: None,
            description: None,
            elements: BTreeMap::new(),
        }
    }

    /// Set the form title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the form description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add an element.
    pub fn element(mut self, name: impl Into<String>, element: FormElement) -> Self {
        self.elements.insert(name.into(), element);
        self
    }

    /// Elements sorted by weight.
    pub fn sorted_elements(&self) -> Vec<(&String, &FormElement)> {
        let mut elements: Vec<_> = self.elements.iter().collect();
        elements.sort_by_key(|(_, el)| el.weight);
        elements
    }
}

/// A control that edits a repeatable-list field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ListControl {
    /// Append a new empty item.
    AddItem { field: String },
    /// Remove the item at `index`.
    RemoveItem { field: String, index: usize },
    /// Swap the item at `index` with its predecessor.
    MoveItemUp { field: String, index: usize },
    /// Swap the item at `index` with its successor.
    MoveItemDown { field: String, index: usize },
}

/// Element type variants with type-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementType {
    /// Single-line text input. Carries the current character count so the
    /// client can show a live counter against `max_length`.
    Textfield {
        #[serde(skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        char_count: Option<usize>,
    },

    /// Multi-line text input; `rich` enables the constrained HTML editor.
    Textarea {
        rows: u32,
        #[serde(default)]
        rich: bool,
    },

    /// Numeric input with optional inclusive bounds.
    Number {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },

    /// Boolean toggle.
    Checkbox,

    /// Media reference input with inline preview. `broken` is set when a
    /// non-empty reference failed to resolve, so the client shows the
    /// broken-preview indicator instead of an image.
    Media {
        media: MediaKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        preview_url: Option<String>,
        #[serde(default)]
        broken: bool,
    },

    /// Container for nested elements (list items, item forms).
    Container,

    /// A list-editing control.
    Button { control: ListControl },

    /// Display-only text.
    Markup { value: String },

    /// Read-only raw JSON view; the fallback surface for unknown blocks.
    JsonView { value: String },
}

/// One element of a form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormElement {
    /// Element type with type-specific configuration.
    #[serde(flatten)]
    pub element_type: ElementType,

    /// Label shown next to the element.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Help text shown under the element.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Current value, pre-filled from the instance's props.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,

    /// Whether this field is required.
    #[serde(default)]
    pub required: bool,

    /// Sort weight (lower = appears first).
    #[serde(default)]
    pub weight: i32,

    /// Whether this element is disabled (e.g. the remove control of a
    /// list at its minimum item count).
    #[serde(default)]
    pub disabled: bool,

    /// Placeholder text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    /// Child elements (for containers).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, FormElement>,
}

impl FormElement {
    fn new(element_type: ElementType) -> Self {
        Self {
            element_type,
            title: None,
            description: None,
            default_value: None,
            required: false,
            weight: 0,
            disabled: false,
            placeholder: None,
            children: BTreeMap::new(),
        }
    }

    /// Create a textfield element.
    pub fn textfield() -> Self {
        Self::new(ElementType::Textfield {
            max_length: None,
            char_count: None,
        })
    }

    /// Create a textarea element.
    pub fn textarea(rows: u32, rich: bool) -> Self {
        Self::new(ElementType::Textarea { rows, rich })
    }

    /// Create a number element.
    pub fn number(min: Option<f64>, max: Option<f64>) -> Self {
        Self::new(ElementType::Number { min, max })
    }

    /// Create a checkbox element.
    pub fn checkbox() -> Self {
        Self::new(ElementType::Checkbox)
    }

    /// Create a media reference element.
    pub fn media(media: MediaKind) -> Self {
        Self::new(ElementType::Media {
            media,
            preview_url: None,
            broken: false,
        })
    }

    /// Create a container element.
    pub fn container() -> Self {
        Self::new(ElementType::Container)
    }

    /// Create a list-control button.
    pub fn button(control: ListControl) -> Self {
        Self::new(ElementType::Button { control })
    }

    /// Create a markup element (display-only text).
    pub fn markup(value: impl Into<String>) -> Self {
        Self::new(ElementType::Markup {
            value: value.into(),
        })
    }

    /// Create a read-only JSON view.
    pub fn json_view(value: impl Into<String>) -> Self {
        Self::new(ElementType::JsonView {
            value: value.into(),
        })
    }

    /// Set the element title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the element description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the current value.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Mark as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the weight.
    pub fn weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    /// Mark as disabled.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set placeholder text.
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Add a child element.
    pub fn child(mut self, name: impl Into<String>, element: FormElement) -> Self {
        self.children.insert(name.into(), element);
        self
    }

    /// Set max length and current character count for a textfield.
    pub fn text_limits(mut self, max: Option<usize>, count: usize) -> Self {
        if let ElementType::Textfield {
            ref mut max_length,
            ref mut char_count,
        } = self.element_type
        {
            *max_length = max;
            *char_count = Some(count);
        }
        self
    }

    /// Set the resolved preview for a media element; `None` with a
    /// non-empty reference marks the preview broken.
    pub fn media_preview(mut self, preview: Option<String>, reference_present: bool) -> Self {
        if let ElementType::Media {
            ref mut preview_url,
            ref mut broken,
            ..
        } = self.element_type
        {
            *broken = reference_present && preview.is_none();
            *preview_url = preview;
        }
        self
    }
}
