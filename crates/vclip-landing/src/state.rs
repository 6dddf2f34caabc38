//! Widget state container.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use vclip_landing_models::{LeadCaptureState, PollState, UploadState};

/// Everything the uploader renders from.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WidgetState {
    /// Upload cycle this state belongs to; bumped by every reset
    pub cycle: u64,
    pub upload: UploadState,
    pub lead: LeadCaptureState,
    pub poll: PollState,
}

impl WidgetState {
    pub fn new(cycle: u64) -> Self {
        Self {
            cycle,
            ..Self::default()
        }
    }

    /// Nothing more will happen without user action.
    pub fn is_settled(&self) -> bool {
        self.upload.is_terminal() || self.poll.is_terminal()
    }
}

/// Shared handle onto the widget state.
///
/// Background timers write through [`StateCell::update_if_current`], which
/// refuses writes from a cycle that has since been reset.
#[derive(Debug, Clone)]
pub(crate) struct StateCell {
    tx: Arc<watch::Sender<WidgetState>>,
}

impl StateCell {
    pub(crate) fn new(initial: WidgetState) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<WidgetState> {
        self.tx.subscribe()
    }

    pub(crate) fn snapshot(&self) -> WidgetState {
        self.tx.borrow().clone()
    }

    /// Apply `f` if `cycle` is still current. `f` returns whether it changed anything.
    ///
    /// Returns false when the cycle is stale.
    pub(crate) fn update_if_current<F>(&self, cycle: u64, f: F) -> bool
    where
        F: FnOnce(&mut WidgetState) -> bool,
    {
        let mut current = false;
        self.tx.send_if_modified(|state| {
            if state.cycle != cycle {
                return false;
            }
            current = true;
            f(state)
        });
        current
    }

    /// Unconditional modification for the current cycle.
    pub(crate) fn modify<F>(&self, cycle: u64, f: F) -> bool
    where
        F: FnOnce(&mut WidgetState),
    {
        self.update_if_current(cycle, |state| {
            f(state);
            true
        })
    }

    /// Start over with a fresh state for `cycle`.
    pub(crate) fn replace(&self, state: WidgetState) {
        self.tx.send_replace(state);
    }

    /// Invalidate the current cycle so no background writer can land.
    pub(crate) fn retire(&self) {
        self.tx.send_modify(|state| state.cycle += 1);
    }
}
