//! Page and block instance models.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// One placed, configured occurrence of a block on a page.
///
/// The id is generated locally (UUIDv7) and is stable for the lifetime of
/// the editing session, including across reorders. Display order is the
/// instance's position in the page's block list; instances never carry
/// their own order number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockInstance {
    /// Session-local identifier, unique within the page.
    pub id: Uuid,

    /// Catalogue key (e.g. "hero", "rich_text"). May reference a block
    /// type that is no longer registered; such instances render as error
    /// placeholders but stay in the list so they can be removed.
    pub block_key: String,

    /// Configuration data for this instance.
    pub props: Map<String, Value>,
}

impl BlockInstance {
    /// Create a new instance of the given block type with empty props.
    pub fn new(block_key: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            block_key: block_key.into(),
            props: Map::new(),
        }
    }

    /// Create an instance with the given props.
    pub fn with_props(block_key: impl Into<String>, props: Map<String, Value>) -> Self {
        Self {
            id: Uuid::now_v7(),
            block_key: block_key.into(),
            props,
        }
    }

    /// Copy this instance under a fresh id.
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::now_v7(),
            block_key: self.block_key.clone(),
            props: self.props.clone(),
        }
    }
}

/// A named, sluggable, publishable composition of blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Server-assigned identifier.
    pub id: String,

    /// Page title as shown in the editor and on the page.
    pub title: String,

    /// URL-safe slug, unique per centre.
    pub slug: String,

    /// Whether the page is publicly visible.
    pub is_published: bool,

    /// Ordered block list; array position is display order.
    pub blocks: Vec<BlockInstance>,
}
