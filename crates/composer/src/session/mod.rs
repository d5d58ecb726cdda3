//! The editing session: one page's ordered block list and its state.
//!
//! The session owns the block list, the selection, the dirty flag, and the
//! current validation error map. All mutation goes through its operations
//! so dirty-tracking and validation stay consistent — no other component
//! touches the list directly. The in-memory order of the list is the
//! single source of truth for display order.

pub mod autosave;
pub mod reorder;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::blocks::BlockRegistry;
use crate::blocks::validate::validate_all;
use crate::error::PublishError;
use crate::models::{BlockInstance, Page};
use crate::publish::PublishState;

/// Metadata of the loaded page. Block content lives in the session itself.
#[derive(Debug, Clone)]
pub struct PageMeta {
    pub id: String,
    pub title: String,
    pub slug: String,
}

/// One user's editing session over one page.
pub struct EditorSession {
    registry: Arc<BlockRegistry>,
    page: Option<PageMeta>,
    publish: PublishState,
    blocks: Vec<BlockInstance>,
    selection: Option<Uuid>,
    dirty: bool,
    errors: BTreeMap<Uuid, String>,
    remote_errors: BTreeMap<Uuid, String>,
}

impl EditorSession {
    /// Create a session with no page loaded.
    pub fn new(registry: Arc<BlockRegistry>) -> Self {
        Self {
            registry,
            page: None,
            publish: PublishState::Draft,
            blocks: Vec::new(),
            selection: None,
            dirty: false,
            errors: BTreeMap::new(),
            remote_errors: BTreeMap::new(),
        }
    }

    /// Load a page, replacing the whole session state atomically.
    pub fn load_page(&mut self, page: Page) {
        self.page = Some(PageMeta {
            id: page.id,
            title: page.title,
            slug: page.slug,
        });
        self.publish = PublishState::from_flag(page.is_published);
        self.load_blocks(page.blocks);
    }

    /// Unload the current page, clearing all session state.
    pub fn unload(&mut self) {
        self.page = None;
        self.publish = PublishState::Draft;
        self.load_blocks(Vec::new());
    }

    /// Replace the block list atomically, clearing dirty and selection
    /// state. Used when a different page is loaded.
    pub fn load_blocks(&mut self, blocks: Vec<BlockInstance>) {
        self.blocks = blocks;
        self.selection = None;
        self.dirty = false;
        self.remote_errors.clear();
        self.errors = validate_all(&self.blocks, &self.registry);
    }

    /// Metadata of the loaded page, if any.
    pub fn page(&self) -> Option<&PageMeta> {
        self.page.as_ref()
    }

    /// Current publish state of the loaded page.
    pub fn publish_state(&self) -> PublishState {
        self.publish
    }

    /// The ordered block list; array position is display order.
    pub fn blocks(&self) -> &[BlockInstance] {
        &self.blocks
    }

    /// Look up one block by id.
    pub fn block(&self, id: Uuid) -> Option<&BlockInstance> {
        self.blocks.iter().find(|b| b.id == id)
    }

    /// Current validation error map; absence of a key means valid.
    pub fn errors(&self) -> &BTreeMap<Uuid, String> {
        &self.errors
    }

    /// Server-reported block errors from the last rejected save, keyed by
    /// instance id.
    pub fn remote_errors(&self) -> &BTreeMap<Uuid, String> {
        &self.remote_errors
    }

    /// Whether there are unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Currently selected block, if any.
    pub fn selection(&self) -> Option<Uuid> {
        self.selection
    }

    /// Select a block (or clear the selection with `None`). Selecting an
    /// unknown id is a no-op.
    pub fn select(&mut self, id: Option<Uuid>) {
        match id {
            Some(id) if self.block(id).is_none() => {}
            other => self.selection = other,
        }
    }

    /// Append a new instance of `block_key` with empty props and return
    /// its id.
    ///
    /// The key is deliberately not checked against the registry here:
    /// a misconfigured block must still appear in the list (as an error
    /// placeholder) so the user can remove it.
    pub fn add_block(&mut self, block_key: &str) -> Uuid {
        let instance = BlockInstance::new(block_key);
        let id = instance.id;
        self.blocks.push(instance);
        self.mutated();
        debug!(block_key, %id, "block added");
        id
    }

    /// Insert a copy of `id` (fresh id, same props) directly after it.
    pub fn duplicate_block(&mut self, id: Uuid) -> Option<Uuid> {
        let index = self.blocks.iter().position(|b| b.id == id)?;
        let copy = self.blocks[index].duplicate();
        let copy_id = copy.id;
        self.blocks.insert(index + 1, copy);
        self.mutated();
        Some(copy_id)
    }

    /// Remove the block with `id`. Clears the selection if it pointed at
    /// the removed block. No-op (returns false) for an unknown id.
    pub fn remove_block(&mut self, id: Uuid) -> bool {
        let Some(index) = self.blocks.iter().position(|b| b.id == id) else {
            return false;
        };
        self.blocks.remove(index);
        if self.selection == Some(id) {
            self.selection = None;
        }
        self.mutated();
        debug!(%id, "block removed");
        true
    }

    /// Replace the props of `id` wholesale (not a deep merge). Returns
    /// false for an unknown id.
    pub fn update_block_props(&mut self, id: Uuid, props: Map<String, Value>) -> bool {
        let Some(block) = self.blocks.iter_mut().find(|b| b.id == id) else {
            return false;
        };
        block.props = props;
        self.mutated();
        true
    }

    /// Move a block one step towards the front.
    pub fn move_up(&mut self, id: Uuid) -> bool {
        let moved = reorder::move_up(&mut self.blocks, id);
        if moved {
            self.mutated();
        }
        moved
    }

    /// Move a block one step towards the back.
    pub fn move_down(&mut self, id: Uuid) -> bool {
        let moved = reorder::move_down(&mut self.blocks, id);
        if moved {
            self.mutated();
        }
        moved
    }

    /// Move a block directly before `anchor`.
    pub fn move_before(&mut self, id: Uuid, anchor: Uuid) -> bool {
        let moved = reorder::move_before(&mut self.blocks, id, anchor);
        if moved {
            self.mutated();
        }
        moved
    }

    /// Move a block directly after `anchor`.
    pub fn move_after(&mut self, id: Uuid, anchor: Uuid) -> bool {
        let moved = reorder::move_after(&mut self.blocks, id, anchor);
        if moved {
            self.mutated();
        }
        moved
    }

    /// Attempt the Draft -> Published transition, hard-gated on an empty
    /// error map.
    pub fn publish(&mut self) -> Result<(), PublishError> {
        if self.page.is_none() {
            return Err(PublishError::NoPage);
        }
        self.publish.publish(&self.errors)
    }

    /// Published -> Draft; always allowed.
    pub fn unpublish(&mut self) {
        self.publish.unpublish();
    }

    /// Restore a publish state after a failed persistence call.
    pub(crate) fn set_publish_state(&mut self, state: PublishState) {
        self.publish = state;
    }

    /// Clear the dirty flag after a successful save.
    pub(crate) fn mark_saved(&mut self) {
        self.dirty = false;
        self.remote_errors.clear();
    }

    /// Record server-reported block errors, keyed by position in the
    /// saved list, mapped back to the ids that held those positions.
    pub(crate) fn set_remote_errors(
        &mut self,
        by_position: &BTreeMap<usize, String>,
        saved_ids: &[Uuid],
    ) {
        self.remote_errors = by_position
            .iter()
            .filter_map(|(&index, message)| {
                saved_ids.get(index).map(|id| (*id, message.clone()))
            })
            .collect();
    }

    /// Common tail of every mutation: mark dirty, drop stale server
    /// errors, and recompute the validation map wholesale.
    fn mutated(&mut self) {
        self.dirty = true;
        self.remote_errors.clear();
        self.errors = validate_all(&self.blocks, &self.registry);
    }
}
