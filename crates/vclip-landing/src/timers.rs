//! Timers owned by one processing lifecycle.

use tokio::task::JoinHandle;

use vclip_landing_models::PollState;

/// Handles for the status poller (which owns the poll timeout) and the
/// progress simulator.
///
/// Every exit path cancels them: terminal states end the tasks themselves,
/// reset calls [`ProcessingTimers::cancel`] and dropping the owner aborts.
#[derive(Debug, Default)]
pub struct ProcessingTimers {
    poller: Option<JoinHandle<PollState>>,
    progress: Option<JoinHandle<()>>,
}

impl ProcessingTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a new lifecycle, cancelling whatever ran before.
    pub fn start(&mut self, poller: JoinHandle<PollState>, progress: JoinHandle<()>) {
        self.cancel();
        self.poller = Some(poller);
        self.progress = Some(progress);
    }

    /// Abort every live timer.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.poller.take() {
            handle.abort();
        }
        if let Some(handle) = self.progress.take() {
            handle.abort();
        }
    }

    /// Whether any timer task is still running.
    pub fn is_active(&self) -> bool {
        self.poller.as_ref().is_some_and(|h| !h.is_finished())
            || self.progress.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Wait for the poller to reach a final state.
    ///
    /// Returns `None` if no poller was started or it was cancelled.
    pub async fn wait_for_poller(&mut self) -> Option<PollState> {
        let handle = self.poller.take()?;
        handle.await.ok()
    }
}

impl Drop for ProcessingTimers {
    fn drop(&mut self) {
        self.cancel();
    }
}
