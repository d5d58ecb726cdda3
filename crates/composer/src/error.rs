//! Engine error types.
//!
//! Everything here is recoverable within an editing session: store errors
//! degrade to a status indicator with the dirty flag left set, and publish
//! refusals report which blocks need fixing. Nothing is fatal.

use std::collections::BTreeMap;

use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the page persistence edge.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested page does not exist (or was deleted out from under us).
    #[error("page not found")]
    PageNotFound,

    /// Transport or server failure talking to the page API. Not classified
    /// further; on the save path the dirty flag stays set and the next
    /// mutation or a manual save retries.
    #[error("request to the page service failed")]
    SaveFailed,

    /// The server rejected the submitted block list. Keys are positions in
    /// the submitted array; the editor maps them back to instance ids.
    #[error("server rejected {} block(s)", .0.len())]
    InvalidBlocks(BTreeMap<usize, String>),

    /// Page creation or rename collided with an existing slug.
    #[error("slug already in use")]
    SlugConflict,

    /// Page creation failed server-side for a reason other than a slug
    /// collision.
    #[error("create failed: {0}")]
    CreateFailed(String),
}

/// Errors from the draft/published lifecycle.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Publishing is refused while any block fails validation. Carries the
    /// offending instances so the caller can point at them.
    #[error("{} block(s) fail validation", .0.len())]
    ValidationPending(BTreeMap<Uuid, String>),

    /// No page is loaded in the editing session.
    #[error("no page loaded")]
    NoPage,

    /// The transition was allowed locally but persisting the flag failed;
    /// the local state is rolled back.
    #[error(transparent)]
    Store(#[from] StoreError),
}
