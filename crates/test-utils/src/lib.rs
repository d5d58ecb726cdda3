//! Nido test utilities.
//!
//! Helpers for integration testing: page fixtures, block builders, and an
//! in-memory page store that records save traffic and supports failure
//! injection for autosave tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};

use nido_composer::error::StoreError;
use nido_composer::models::{BlockInstance, Page};
use nido_composer::persist::{CreatePage, PageStore, SavedBlock};

/// Create a draft page fixture with no blocks.
pub fn test_page(id: &str, slug: &str) -> Page {
    Page {
        id: id.to_string(),
        title: "Test page".to_string(),
        slug: slug.to_string(),
        is_published: false,
        blocks: Vec::new(),
    }
}

/// Create a block instance with props from a JSON object literal.
pub fn test_block(block_key: &str, props: Value) -> BlockInstance {
    let props = match props {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    BlockInstance::with_props(block_key, props)
}

/// A hero block that passes the standard catalogue's validation.
pub fn valid_hero() -> BlockInstance {
    test_block(
        "hero",
        serde_json::json!({ "heading": "Welcome to Sunny Corner" }),
    )
}

/// One recorded save call.
#[derive(Debug, Clone)]
pub struct SaveCall {
    pub page_id: String,
    pub blocks: Vec<SavedBlock>,
}

/// Failure injected into the next save call.
enum InjectedFailure {
    SaveFailed,
    InvalidBlocks(BTreeMap<usize, String>),
}

struct StoreState {
    pages: HashMap<String, Page>,
    save_calls: Vec<SaveCall>,
    fail_next_save: Option<InjectedFailure>,
}

/// In-memory [`PageStore`] for tests.
///
/// Records every `save_blocks` call so debounce tests can assert exactly
/// how many saves fired and what the last one carried.
pub struct MemoryPageStore {
    state: Mutex<StoreState>,
    next_id: AtomicU64,
}

impl Default for MemoryPageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState {
                pages: HashMap::new(),
                save_calls: Vec::new(),
                fail_next_save: None,
            }),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a store seeded with one page.
    pub fn with_page(page: Page) -> Self {
        let store = Self::new();
        store.insert_page(page);
        store
    }

    /// Seed or replace a page.
    pub fn insert_page(&self, page: Page) {
        self.state.lock().pages.insert(page.id.clone(), page);
    }

    /// Current stored state of a page.
    pub fn page(&self, page_id: &str) -> Option<Page> {
        self.state.lock().pages.get(page_id).cloned()
    }

    /// Stored published flag of a page.
    pub fn is_published(&self, page_id: &str) -> Option<bool> {
        self.state.lock().pages.get(page_id).map(|p| p.is_published)
    }

    /// Number of `save_blocks` calls seen so far.
    pub fn save_count(&self) -> usize {
        self.state.lock().save_calls.len()
    }

    /// The most recent `save_blocks` call.
    pub fn last_save(&self) -> Option<SaveCall> {
        self.state.lock().save_calls.last().cloned()
    }

    /// Make the next save fail with a transport error.
    pub fn fail_next_save(&self) {
        self.state.lock().fail_next_save = Some(InjectedFailure::SaveFailed);
    }

    /// Make the next save come back rejected with positional block errors.
    pub fn reject_next_save(&self, block_errors: BTreeMap<usize, String>) {
        self.state.lock().fail_next_save = Some(InjectedFailure::InvalidBlocks(block_errors));
    }
}

#[async_trait]
impl PageStore for MemoryPageStore {
    async fn load_page(&self, page_id: &str) -> Result<Page, StoreError> {
        self.state
            .lock()
            .pages
            .get(page_id)
            .cloned()
            .ok_or(StoreError::PageNotFound)
    }

    async fn save_blocks(&self, page_id: &str, blocks: &[SavedBlock]) -> Result<(), StoreError> {
        let mut state = self.state.lock();

        if let Some(failure) = state.fail_next_save.take() {
            return Err(match failure {
                InjectedFailure::SaveFailed => StoreError::SaveFailed,
                InjectedFailure::InvalidBlocks(map) => StoreError::InvalidBlocks(map),
            });
        }

        let Some(page) = state.pages.get_mut(page_id) else {
            return Err(StoreError::PageNotFound);
        };
        page.blocks = blocks
            .iter()
            .map(|b| BlockInstance::with_props(b.block_key.clone(), b.props.clone()))
            .collect();

        state.save_calls.push(SaveCall {
            page_id: page_id.to_string(),
            blocks: blocks.to_vec(),
        });
        Ok(())
    }

    async fn set_published(&self, page_id: &str, is_published: bool) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        let Some(page) = state.pages.get_mut(page_id) else {
            return Err(StoreError::PageNotFound);
        };
        page.is_published = is_published;
        Ok(())
    }

    async fn create_page(&self, page: &CreatePage) -> Result<Page, StoreError> {
        let mut state = self.state.lock();
        if state.pages.values().any(|p| p.slug == page.slug) {
            return Err(StoreError::SlugConflict);
        }

        let id = format!("page-{}", self.next_id.fetch_add(1, Ordering::Relaxed));
        let created = Page {
            id: id.clone(),
            title: page.title.clone(),
            slug: page.slug.clone(),
            is_published: page.is_published,
            blocks: Vec::new(),
        };
        state.pages.insert(id, created.clone());
        Ok(created)
    }

    async fn delete_page(&self, page_id: &str) -> Result<(), StoreError> {
        self.state
            .lock()
            .pages
            .remove(page_id)
            .map(|_| ())
            .ok_or(StoreError::PageNotFound)
    }
}
