//! Draft/Published lifecycle for a page.
//!
//! Publishing is a discrete, user-initiated action separate from the
//! autosave path: it persists only the `is_published` flag, never the
//! block list. The Draft -> Published transition is a hard precondition
//! on a clean validation map, not a UI-level warning; Published -> Draft
//! is always allowed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::PublishError;

/// Publication state of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishState {
    #[default]
    Draft,
    Published,
}

impl PublishState {
    /// State corresponding to a persisted `is_published` flag.
    pub fn from_flag(is_published: bool) -> Self {
        if is_published {
            Self::Published
        } else {
            Self::Draft
        }
    }

    /// Whether the page is publicly visible.
    pub fn is_published(self) -> bool {
        self == Self::Published
    }

    /// Attempt the Draft -> Published transition.
    ///
    /// Refused while `errors` is non-empty; the refusal carries the
    /// offending instances so the caller can point at them. State is
    /// unchanged on refusal. Publishing an already-published page is
    /// accepted and does nothing.
    pub fn publish(&mut self, errors: &BTreeMap<Uuid, String>) -> Result<(), PublishError> {
        if !errors.is_empty() {
            warn!(invalid = errors.len(), "publish refused: blocks fail validation");
            return Err(PublishError::ValidationPending(errors.clone()));
        }
        *self = Self::Published;
        Ok(())
    }

    /// Published -> Draft; unconditional.
    pub fn unpublish(&mut self) {
        *self = Self::Draft;
    }
}
