//! Debounced autosave scheduling.
//!
//! Decouples "the user is actively editing" from "we are writing to the
//! page API". The scheduler is an explicit state machine
//! (`Idle -> Armed -> Saving -> Idle/Armed`) driven with instants passed
//! in by the caller, so debounce behavior is testable without real timers:
//!
//! - a mutation (re)arms a fresh debounce window, cancelling any pending
//!   deadline — only the latest window matters;
//! - a mutation that lands while a save is in flight re-arms the next
//!   window once the save completes instead of blocking;
//! - a manual save clears the window entirely and saves immediately.

use std::time::Duration;

use tokio::time::Instant;

/// Debounce window applied between the last mutation and the save.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(2000);

/// Scheduler states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutosaveState {
    /// Nothing pending.
    Idle,
    /// A save is scheduled for the current deadline.
    Armed,
    /// A save is in flight.
    Saving,
}

/// Debounce state machine for the autosave path.
#[derive(Debug)]
pub struct AutosaveScheduler {
    debounce: Duration,
    state: AutosaveState,
    deadline: Option<Instant>,
    rearm_after_save: bool,
}

impl Default for AutosaveScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl AutosaveScheduler {
    /// Create a scheduler with the given debounce window.
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            state: AutosaveState::Idle,
            deadline: None,
            rearm_after_save: false,
        }
    }

    /// Current state.
    pub fn state(&self) -> AutosaveState {
        self.state
    }

    /// Deadline of the armed window, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Record a mutation at `now`.
    ///
    /// Starts or restarts the debounce window. During an in-flight save
    /// the window is re-armed when the save finishes.
    pub fn note_mutation(&mut self, now: Instant) {
        match self.state {
            AutosaveState::Idle | AutosaveState::Armed => {
                self.state = AutosaveState::Armed;
                self.deadline = Some(now + self.debounce);
            }
            AutosaveState::Saving => {
                self.rearm_after_save = true;
            }
        }
    }

    /// Drop any pending window and re-arm request (page switched away).
    /// An in-flight save is not interrupted; its completion is discarded
    /// by the caller.
    pub fn cancel(&mut self) {
        self.state = AutosaveState::Idle;
        self.deadline = None;
        self.rearm_after_save = false;
    }

    /// Clear the pending window without saving; used by the manual-save
    /// path, which saves immediately regardless of timer state.
    pub fn fire_now(&mut self) {
        if self.state == AutosaveState::Armed {
            self.state = AutosaveState::Idle;
        }
        self.deadline = None;
    }

    /// Whether the armed window has elapsed at `now`.
    pub fn due(&self, now: Instant) -> bool {
        self.state == AutosaveState::Armed && self.deadline.is_some_and(|d| d <= now)
    }

    /// Mark a save as started. Clears the window; mutations from here on
    /// re-arm rather than restart.
    pub fn begin_save(&mut self) {
        self.state = AutosaveState::Saving;
        self.deadline = None;
        self.rearm_after_save = false;
    }

    /// Mark the in-flight save as finished. Re-arms a fresh window if a
    /// mutation landed while the save was running.
    pub fn finish_save(&mut self, now: Instant) {
        if self.state != AutosaveState::Saving {
            return;
        }
        if self.rearm_after_save {
            self.rearm_after_save = false;
            self.state = AutosaveState::Armed;
            self.deadline = Some(now + self.debounce);
        } else {
            self.state = AutosaveState::Idle;
            self.deadline = None;
        }
    }
}
