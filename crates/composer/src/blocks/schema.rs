//! Field schemas describing the editable props of a block type.
//!
//! Each block type declares an ordered list of fields drawn from a small
//! set of archetypes. The props editor renders its surface from this
//! description and validation is table-driven from it, so adding a block
//! type means registering a schema rather than adding branches anywhere.

use serde::{Deserialize, Serialize};

/// What kind of asset a media field references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

/// Field archetypes available to block schemas.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    /// Single-line text, optionally length-limited.
    Text {
        #[serde(skip_serializing_if = "Option::is_none")]
        max_length: Option<usize>,
    },

    /// Multi-line text. When `rich` is set the value may carry a
    /// constrained HTML subset; disallowed markup is a validation error.
    LongText {
        rows: u32,
        #[serde(default)]
        rich: bool,
    },

    /// Numeric value with optional inclusive bounds.
    Number {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },

    /// Boolean toggle.
    Toggle,

    /// Reference to an uploaded asset or absolute URL, previewed inline.
    Media { media: MediaKind },

    /// Repeatable structured list; each item is a small form of its own.
    /// `min_items` items can never be removed; `max_items` caps additions.
    ItemList {
        item: Vec<FieldSpec>,
        min_items: usize,
        max_items: usize,
    },
}

/// One named, labelled field within a block schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Prop key this field reads and writes.
    pub name: String,

    /// Human-readable label.
    pub label: String,

    /// Archetype and its configuration.
    pub kind: FieldKind,

    /// Whether an empty value fails validation.
    #[serde(default)]
    pub required: bool,

    /// Optional help text shown under the field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl FieldSpec {
    /// Create a field with the given prop name and archetype. The label
    /// defaults to the name; override it with [`FieldSpec::label`].
    pub fn new(name: &str, kind: FieldKind) -> Self {
        Self {
            name: name.to_string(),
            label: name.to_string(),
            kind,
            required: false,
            help: None,
        }
    }

    /// Single-line text field.
    pub fn text(name: &str, max_length: Option<usize>) -> Self {
        Self::new(name, FieldKind::Text { max_length })
    }

    /// Multi-line plain text field.
    pub fn long_text(name: &str, rows: u32) -> Self {
        Self::new(name, FieldKind::LongText { rows, rich: false })
    }

    /// Multi-line rich text field.
    pub fn rich_text(name: &str, rows: u32) -> Self {
        Self::new(name, FieldKind::LongText { rows, rich: true })
    }

    /// Numeric field with optional bounds.
    pub fn number(name: &str, min: Option<f64>, max: Option<f64>) -> Self {
        Self::new(name, FieldKind::Number { min, max })
    }

    /// Boolean toggle field.
    pub fn toggle(name: &str) -> Self {
        Self::new(name, FieldKind::Toggle)
    }

    /// Media reference field.
    pub fn media(name: &str, media: MediaKind) -> Self {
        Self::new(name, FieldKind::Media { media })
    }

    /// Repeatable structured list field.
    pub fn item_list(name: &str, item: Vec<FieldSpec>, min_items: usize, max_items: usize) -> Self {
        Self::new(
            name,
            FieldKind::ItemList {
                item,
                min_items,
                max_items,
            },
        )
    }

    /// Set the label.
    pub fn label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// Mark as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set help text.
    pub fn help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }
}
