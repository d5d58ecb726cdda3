//! The editing controller: one user's session wired to the scheduler and
//! the page store.
//!
//! All mutation goes through this type so dirty-tracking, validation, and
//! autosave arming stay consistent. The session state sits behind a lock
//! that is released across store calls, so the editing surface stays
//! interactive while a save is in flight: a mutation that lands mid-save
//! arms the next debounce window instead of blocking, and a page switch
//! mid-save discards the stale result when it completes.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::blocks::BlockRegistry;
use crate::error::{PublishError, StoreError};
use crate::form::Form;
use crate::form::props::build_props_form;
use crate::media::MediaResolver;
use crate::models::BlockInstance;
use crate::persist::{CreatePage, PageStore, to_saved_blocks};
use crate::publish::PublishState;
use crate::session::autosave::{AutosaveScheduler, AutosaveState};
use crate::session::{EditorSession, PageMeta};
use crate::slug::slugify;

/// Transient save indicator for the editor chrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// Nothing saved yet this session, or no page loaded.
    Idle,
    /// A save is in flight.
    Saving,
    /// The last save succeeded at the given time.
    Saved { at: DateTime<Utc> },
    /// The last save failed; changes are still pending locally.
    Failed,
}

struct Inner {
    session: EditorSession,
    scheduler: AutosaveScheduler,
    status: SaveStatus,
    /// Bumped whenever a different page (or no page) takes over the
    /// session; an in-flight save from an older epoch is discarded.
    epoch: u64,
}

/// Editing controller for one interactive user.
pub struct PageEditor {
    registry: Arc<BlockRegistry>,
    store: Arc<dyn PageStore>,
    inner: Mutex<Inner>,
}

impl PageEditor {
    /// Create an editor with the default debounce window.
    pub fn new(registry: Arc<BlockRegistry>, store: Arc<dyn PageStore>) -> Self {
        Self::with_scheduler(registry, store, AutosaveScheduler::default())
    }

    /// Create an editor with a custom autosave scheduler (e.g. a shorter
    /// debounce window).
    pub fn with_scheduler(
        registry: Arc<BlockRegistry>,
        store: Arc<dyn PageStore>,
        scheduler: AutosaveScheduler,
    ) -> Self {
        Self {
            registry: registry.clone(),
            store,
            inner: Mutex::new(Inner {
                session: EditorSession::new(registry),
                scheduler,
                status: SaveStatus::Idle,
                epoch: 0,
            }),
        }
    }

    // ---- page lifecycle -------------------------------------------------

    /// Load a page into the session, replacing whatever was loaded.
    pub async fn load_page(&self, page_id: &str) -> Result<(), StoreError> {
        let page = self.store.load_page(page_id).await?;
        let mut inner = self.inner.lock();
        inner.session.load_page(page);
        inner.scheduler.cancel();
        inner.status = SaveStatus::Idle;
        inner.epoch += 1;
        info!(page_id, "page loaded");
        Ok(())
    }

    /// Create a page and load it for editing. The slug input is sanitized
    /// before submission; returns the new page's id.
    pub async fn create_page(
        &self,
        centre_id: &str,
        title: &str,
        slug_input: &str,
    ) -> Result<String, StoreError> {
        let slug = slugify(slug_input);
        if slug.is_empty() {
            return Err(StoreError::CreateFailed(
                "slug has no usable characters".to_string(),
            ));
        }

        let page = self
            .store
            .create_page(&CreatePage {
                title: title.to_string(),
                slug,
                centre_id: centre_id.to_string(),
                is_published: false,
            })
            .await?;
        let page_id = page.id.clone();

        let mut inner = self.inner.lock();
        inner.session.load_page(page);
        inner.scheduler.cancel();
        inner.status = SaveStatus::Idle;
        inner.epoch += 1;
        info!(%page_id, "page created");
        Ok(page_id)
    }

    /// Unload the current page without saving. Any armed autosave is
    /// dropped; an in-flight save completes but its result is discarded.
    pub fn close_page(&self) {
        let mut inner = self.inner.lock();
        inner.session.unload();
        inner.scheduler.cancel();
        inner.status = SaveStatus::Idle;
        inner.epoch += 1;
    }

    /// Delete a page. If it is the one being edited, the session closes.
    pub async fn delete_page(&self, page_id: &str) -> Result<(), StoreError> {
        self.store.delete_page(page_id).await?;
        let is_current = {
            let inner = self.inner.lock();
            inner.session.page().is_some_and(|meta| meta.id == page_id)
        };
        if is_current {
            self.close_page();
        }
        Ok(())
    }

    // ---- block mutations ------------------------------------------------

    /// Append a new block and arm the autosave window.
    pub fn add_block(&self, block_key: &str) -> Uuid {
        let mut inner = self.inner.lock();
        let id = inner.session.add_block(block_key);
        inner.scheduler.note_mutation(Instant::now());
        id
    }

    /// Duplicate a block in place.
    pub fn duplicate_block(&self, id: Uuid) -> Option<Uuid> {
        let mut inner = self.inner.lock();
        let copy = inner.session.duplicate_block(id)?;
        inner.scheduler.note_mutation(Instant::now());
        Some(copy)
    }

    /// Remove a block; no-op on an unknown id.
    pub fn remove_block(&self, id: Uuid) -> bool {
        let mut inner = self.inner.lock();
        let removed = inner.session.remove_block(id);
        if removed {
            inner.scheduler.note_mutation(Instant::now());
        }
        removed
    }

    /// Replace a block's props wholesale.
    pub fn update_block_props(&self, id: Uuid, props: Map<String, Value>) -> bool {
        let mut inner = self.inner.lock();
        let updated = inner.session.update_block_props(id, props);
        if updated {
            inner.scheduler.note_mutation(Instant::now());
        }
        updated
    }

    /// Move a block one step towards the front.
    pub fn move_up(&self, id: Uuid) -> bool {
        self.reorder(|session| session.move_up(id))
    }

    /// Move a block one step towards the back.
    pub fn move_down(&self, id: Uuid) -> bool {
        self.reorder(|session| session.move_down(id))
    }

    /// Move a block directly before `anchor`.
    pub fn move_before(&self, id: Uuid, anchor: Uuid) -> bool {
        self.reorder(|session| session.move_before(id, anchor))
    }

    /// Move a block directly after `anchor`.
    pub fn move_after(&self, id: Uuid, anchor: Uuid) -> bool {
        self.reorder(|session| session.move_after(id, anchor))
    }

    fn reorder(&self, op: impl FnOnce(&mut EditorSession) -> bool) -> bool {
        let mut inner = self.inner.lock();
        let moved = op(&mut inner.session);
        if moved {
            inner.scheduler.note_mutation(Instant::now());
        }
        moved
    }

    /// Select a block, or clear the selection. Selection is view state:
    /// it never marks the page dirty.
    pub fn select(&self, id: Option<Uuid>) {
        self.inner.lock().session.select(id);
    }

    // ---- read access ----------------------------------------------------

    /// Metadata of the loaded page.
    pub fn page(&self) -> Option<PageMeta> {
        self.inner.lock().session.page().cloned()
    }

    /// Snapshot of the ordered block list.
    pub fn blocks(&self) -> Vec<BlockInstance> {
        self.inner.lock().session.blocks().to_vec()
    }

    /// Snapshot of the current validation error map.
    pub fn errors(&self) -> BTreeMap<Uuid, String> {
        self.inner.lock().session.errors().clone()
    }

    /// Server-reported block errors from the last rejected save.
    pub fn remote_errors(&self) -> BTreeMap<Uuid, String> {
        self.inner.lock().session.remote_errors().clone()
    }

    /// Whether unsaved changes exist.
    pub fn is_dirty(&self) -> bool {
        self.inner.lock().session.is_dirty()
    }

    /// Currently selected block.
    pub fn selection(&self) -> Option<Uuid> {
        self.inner.lock().session.selection()
    }

    /// Current publish state.
    pub fn publish_state(&self) -> PublishState {
        self.inner.lock().session.publish_state()
    }

    /// Transient save indicator.
    pub fn save_status(&self) -> SaveStatus {
        self.inner.lock().status
    }

    /// Build the props-editor form for a block. `None` if the id is not
    /// in the list.
    pub fn props_form(&self, id: Uuid, media: &dyn MediaResolver) -> Option<Form> {
        let inner = self.inner.lock();
        inner
            .session
            .block(id)
            .map(|block| build_props_form(block, &self.registry, media))
    }

    // ---- publish lifecycle ----------------------------------------------

    /// Draft -> Published, hard-gated on a clean validation map, then
    /// persisted. Rolls the local state back if persisting fails.
    pub async fn publish(&self) -> Result<(), PublishError> {
        let (page_id, previous) = {
            let mut inner = self.inner.lock();
            let page_id = inner
                .session
                .page()
                .ok_or(PublishError::NoPage)?
                .id
                .clone();
            let previous = inner.session.publish_state();
            inner.session.publish()?;
            (page_id, previous)
        };

        if let Err(e) = self.store.set_published(&page_id, true).await {
            warn!(%page_id, error = %e, "publish not persisted; reverting");
            self.inner.lock().session.set_publish_state(previous);
            return Err(PublishError::Store(e));
        }
        info!(%page_id, "page published");
        Ok(())
    }

    /// Published -> Draft, then persisted. Rolls back if persisting fails.
    pub async fn unpublish(&self) -> Result<(), PublishError> {
        let (page_id, previous) = {
            let mut inner = self.inner.lock();
            let page_id = inner
                .session
                .page()
                .ok_or(PublishError::NoPage)?
                .id
                .clone();
            let previous = inner.session.publish_state();
            inner.session.unpublish();
            (page_id, previous)
        };

        if let Err(e) = self.store.set_published(&page_id, false).await {
            warn!(%page_id, error = %e, "unpublish not persisted; reverting");
            self.inner.lock().session.set_publish_state(previous);
            return Err(PublishError::Store(e));
        }
        info!(%page_id, "page unpublished");
        Ok(())
    }

    // ---- saving ---------------------------------------------------------

    /// Deadline of the armed autosave window, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.inner.lock().scheduler.deadline()
    }

    /// Save immediately, bypassing and clearing any armed window. No-op
    /// when no page is loaded.
    pub async fn save_now(&self) -> Result<(), StoreError> {
        {
            let mut inner = self.inner.lock();
            inner.scheduler.fire_now();
            if inner.session.page().is_none() {
                return Ok(());
            }
        }
        self.perform_save().await
    }

    /// Run the pending autosave if its window has elapsed. Returns whether
    /// a save was attempted.
    pub async fn flush_due(&self) -> Result<bool, StoreError> {
        {
            let inner = self.inner.lock();
            if !inner.scheduler.due(Instant::now()) {
                return Ok(false);
            }
        }
        self.perform_save().await.map(|()| true)
    }

    /// Wait for the armed window to elapse, then flush. Returns
    /// immediately when nothing is armed; returns `false` without saving
    /// if a further mutation pushed the deadline while waiting. Hosts
    /// call this in a loop.
    pub async fn run_pending(&self) -> Result<bool, StoreError> {
        let Some(deadline) = self.next_deadline() else {
            return Ok(false);
        };
        tokio::time::sleep_until(deadline).await;
        self.flush_due().await
    }

    /// Serialize the current list and write it out. Save failures leave
    /// the dirty flag set; the next mutation or a manual save retries.
    async fn perform_save(&self) -> Result<(), StoreError> {
        let (page_id, payload, saved_ids, epoch) = {
            let mut inner = self.inner.lock();
            let Some(meta) = inner.session.page() else {
                return Ok(());
            };
            let page_id = meta.id.clone();
            let payload = to_saved_blocks(inner.session.blocks());
            let saved_ids: Vec<Uuid> = inner.session.blocks().iter().map(|b| b.id).collect();
            inner.scheduler.begin_save();
            inner.status = SaveStatus::Saving;
            (page_id, payload, saved_ids, inner.epoch)
        };

        debug!(%page_id, blocks = payload.len(), "saving block list");
        let result = self.store.save_blocks(&page_id, &payload).await;

        let mut inner = self.inner.lock();
        if inner.epoch != epoch {
            debug!(%page_id, "discarding result of stale save");
            return Ok(());
        }
        inner.scheduler.finish_save(Instant::now());

        match result {
            Ok(()) => {
                // A mutation that landed mid-save re-armed the scheduler;
                // its changes are still unsaved, so dirty stays set.
                if inner.scheduler.state() != AutosaveState::Armed {
                    inner.session.mark_saved();
                }
                inner.status = SaveStatus::Saved { at: Utc::now() };
                Ok(())
            }
            Err(StoreError::InvalidBlocks(by_position)) => {
                inner.session.set_remote_errors(&by_position, &saved_ids);
                inner.status = SaveStatus::Failed;
                warn!(%page_id, rejected = by_position.len(), "server rejected block list");
                Err(StoreError::InvalidBlocks(by_position))
            }
            Err(e) => {
                inner.status = SaveStatus::Failed;
                warn!(%page_id, error = %e, "save failed; changes remain pending");
                Err(e)
            }
        }
    }
}
