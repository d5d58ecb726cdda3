//! Block catalogue: type definitions, the registry, and the standard set.
//!
//! The registry is a pure lookup table loaded once at startup. An unknown
//! key returns `None` — callers treat that as "unregistered block", never
//! as an error, so stale instances keep rendering as placeholders and stay
//! removable.

pub mod schema;
pub mod validate;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use schema::{FieldKind, FieldSpec, MediaKind};

/// Definition of a single block type in the catalogue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDefinition {
    /// Machine name of the block type (e.g. "hero", "rich_text").
    pub key: String,
    /// Human-readable name shown in the block picker.
    pub display_name: String,
    /// Optional one-line description for the picker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered editable fields; validation and the props editor are both
    /// driven from this.
    pub fields: Vec<FieldSpec>,
}

impl BlockDefinition {
    /// Validate a props mapping against this definition's schema.
    ///
    /// Returns a list of human-readable error messages; empty means valid.
    pub fn validate(&self, props: &Map<String, Value>) -> Vec<String> {
        validate::validate_props(&self.fields, props)
    }
}

/// Registry of block definitions, keyed by block key.
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    types: HashMap<String, BlockDefinition>,
}

impl BlockRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Create a registry pre-populated with the standard catalogue.
    pub fn with_standard_catalogue() -> Self {
        let mut registry = Self::new();
        registry.register_standard_catalogue();
        registry
    }

    /// Register a block definition, replacing any previous entry with the
    /// same key.
    pub fn register(&mut self, definition: BlockDefinition) {
        self.types.insert(definition.key.clone(), definition);
    }

    /// Look up a block definition.
    pub fn get(&self, key: &str) -> Option<&BlockDefinition> {
        self.types.get(key)
    }

    /// Check whether a block type is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.types.contains_key(key)
    }

    /// Number of registered block types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All registered keys.
    pub fn keys(&self) -> Vec<String> {
        self.types.keys().cloned().collect()
    }

    /// Register the standard catalogue of marketing-page blocks for
    /// early-childhood-education centres.
    pub fn register_standard_catalogue(&mut self) {
        self.register(BlockDefinition {
            key: "hero".to_string(),
            display_name: "Hero banner".to_string(),
            description: Some("Full-width banner with heading and background image".to_string()),
            fields: vec![
                FieldSpec::text("heading", Some(120))
                    .label("Heading")
                    .required(),
                FieldSpec::text("tagline", Some(200)).label("Tagline"),
                FieldSpec::media("background_image", MediaKind::Image).label("Background image"),
                FieldSpec::toggle("darken_overlay")
                    .label("Darken background")
                    .help("Improves text contrast over busy photos"),
            ],
        });

        self.register(BlockDefinition {
            key: "rich_text".to_string(),
            display_name: "Rich text".to_string(),
            description: Some("Free-form formatted text".to_string()),
            fields: vec![FieldSpec::rich_text("body", 10).label("Body").required()],
        });

        self.register(BlockDefinition {
            key: "image".to_string(),
            display_name: "Image".to_string(),
            description: None,
            fields: vec![
                FieldSpec::media("source", MediaKind::Image)
                    .label("Image")
                    .required(),
                FieldSpec::text("alt", Some(200))
                    .label("Alternative text")
                    .required()
                    .help("Describes the image for screen readers"),
                FieldSpec::text("caption", Some(200)).label("Caption"),
            ],
        });

        self.register(BlockDefinition {
            key: "gallery".to_string(),
            display_name: "Photo gallery".to_string(),
            description: None,
            fields: vec![
                FieldSpec::toggle("show_captions").label("Show captions"),
                FieldSpec::item_list(
                    "items",
                    vec![
                        FieldSpec::media("source", MediaKind::Image)
                            .label("Photo")
                            .required(),
                        FieldSpec::text("caption", Some(160)).label("Caption"),
                    ],
                    1,
                    24,
                )
                .label("Photos")
                .required(),
            ],
        });

        self.register(BlockDefinition {
            key: "video".to_string(),
            display_name: "Video".to_string(),
            description: None,
            fields: vec![
                FieldSpec::media("source", MediaKind::Video)
                    .label("Video")
                    .required(),
                FieldSpec::text("caption", Some(200)).label("Caption"),
            ],
        });

        self.register(BlockDefinition {
            key: "testimonials".to_string(),
            display_name: "Testimonials".to_string(),
            description: Some("Quotes from families".to_string()),
            fields: vec![
                FieldSpec::item_list(
                    "items",
                    vec![
                        FieldSpec::long_text("quote", 4).label("Quote").required(),
                        FieldSpec::text("author", Some(80)).label("Author").required(),
                        FieldSpec::text("role", Some(120))
                            .label("Role")
                            .help("e.g. Parent of a kindergarten child"),
                    ],
                    1,
                    12,
                )
                .label("Testimonials")
                .required(),
            ],
        });

        self.register(BlockDefinition {
            key: "staff_profiles".to_string(),
            display_name: "Our team".to_string(),
            description: None,
            fields: vec![
                FieldSpec::item_list(
                    "items",
                    vec![
                        FieldSpec::text("name", Some(80)).label("Name").required(),
                        FieldSpec::text("role", Some(120)).label("Role").required(),
                        FieldSpec::media("photo", MediaKind::Image).label("Photo"),
                        FieldSpec::long_text("bio", 6).label("Short bio"),
                    ],
                    1,
                    20,
                )
                .label("Team members")
                .required(),
            ],
        });

        self.register(BlockDefinition {
            key: "fee_schedule".to_string(),
            display_name: "Fee schedule".to_string(),
            description: None,
            fields: vec![
                FieldSpec::item_list(
                    "items",
                    vec![
                        FieldSpec::text("program", Some(80)).label("Program").required(),
                        FieldSpec::text("age_range", Some(40)).label("Age range"),
                        FieldSpec::number("weekly_fee", Some(0.0), Some(5000.0))
                            .label("Weekly fee")
                            .required(),
                        FieldSpec::text("notes", Some(200)).label("Notes"),
                    ],
                    1,
                    15,
                )
                .label("Programs")
                .required(),
            ],
        });

        self.register(BlockDefinition {
            key: "opening_hours".to_string(),
            display_name: "Opening hours".to_string(),
            description: None,
            fields: vec![
                FieldSpec::item_list(
                    "items",
                    vec![
                        FieldSpec::text("day", Some(16)).label("Day").required(),
                        FieldSpec::text("opens", Some(8)).label("Opens"),
                        FieldSpec::text("closes", Some(8)).label("Closes"),
                        FieldSpec::toggle("closed").label("Closed all day"),
                    ],
                    1,
                    7,
                )
                .label("Days")
                .required(),
            ],
        });

        self.register(BlockDefinition {
            key: "faq".to_string(),
            display_name: "Frequently asked questions".to_string(),
            description: None,
            fields: vec![
                FieldSpec::item_list(
                    "items",
                    vec![
                        FieldSpec::text("question", Some(200))
                            .label("Question")
                            .required(),
                        FieldSpec::long_text("answer", 6).label("Answer").required(),
                    ],
                    1,
                    30,
                )
                .label("Questions")
                .required(),
            ],
        });

        self.register(BlockDefinition {
            key: "call_to_action".to_string(),
            display_name: "Call to action".to_string(),
            description: Some("Banner with a button, e.g. book a tour".to_string()),
            fields: vec![
                FieldSpec::text("heading", Some(120)).label("Heading").required(),
                FieldSpec::long_text("body", 4).label("Body"),
                FieldSpec::text("button_label", Some(40))
                    .label("Button label")
                    .required(),
                FieldSpec::text("button_url", Some(300))
                    .label("Button link")
                    .required(),
                FieldSpec::toggle("open_in_new_tab").label("Open in new tab"),
            ],
        });
    }
}
