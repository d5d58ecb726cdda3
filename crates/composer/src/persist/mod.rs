//! Page persistence: the store seam and the save wire shape.
//!
//! The engine talks to the remote page service through the [`PageStore`]
//! trait so the editing loop can run against the HTTP client in
//! production and an in-memory store in tests. Saves always carry the
//! complete ordered block list; order is recomputed from array position
//! at serialization time and never stored on the instances themselves.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::models::{BlockInstance, Page};

/// One block as submitted on a save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedBlock {
    #[serde(rename = "blockKey")]
    pub block_key: String,
    pub props: Map<String, Value>,
    /// 0-based, contiguous, matching array position at save time.
    pub order: usize,
}

/// Serialize a block list for persistence, deriving order from position.
pub fn to_saved_blocks(blocks: &[BlockInstance]) -> Vec<SavedBlock> {
    blocks
        .iter()
        .enumerate()
        .map(|(order, block)| SavedBlock {
            block_key: block.block_key.clone(),
            props: block.props.clone(),
            order,
        })
        .collect()
}

/// Request payload for creating a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePage {
    pub title: String,
    pub slug: String,
    pub centre_id: String,
    pub is_published: bool,
}

/// Access to the remote page service.
#[async_trait]
pub trait PageStore: Send + Sync {
    /// Fetch a page with its ordered block list. Implementations assign
    /// fresh session-local instance ids; ids are never round-tripped.
    async fn load_page(&self, page_id: &str) -> Result<Page, StoreError>;

    /// Replace the page's entire block list.
    async fn save_blocks(&self, page_id: &str, blocks: &[SavedBlock]) -> Result<(), StoreError>;

    /// Flip only the published flag; the block list is untouched.
    async fn set_published(&self, page_id: &str, is_published: bool) -> Result<(), StoreError>;

    /// Create a page and return it as stored.
    async fn create_page(&self, page: &CreatePage) -> Result<Page, StoreError>;

    /// Delete a page.
    async fn delete_page(&self, page_id: &str) -> Result<(), StoreError>;
}
