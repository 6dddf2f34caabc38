//! Status poller.
//!
//! Checks the task status on a fixed period until the backend reports a
//! terminal status, a check fails, or the hard timeout expires. On success it
//! fetches the clip list exactly once.

use std::sync::Arc;

use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};
use tracing::{error, info, instrument, warn};

use vclip_landing_client::{ClientError, LandingBackend};
use vclip_landing_models::{ErrorKind, PollState, TaskId, TaskStatus, UploadError};

use crate::config::PollerConfig;
use crate::error::messages;
use crate::metrics;
use crate::state::StateCell;

/// Outcome of one status check.
enum Step {
    Continue,
    /// Task succeeded; the result still has to be fetched
    Succeeded,
    Done(PollState),
}

/// Poll `task_id` until a final [`PollState`].
#[instrument(name = "status_poll", skip_all, fields(task_id = %task_id, cycle = cycle))]
pub(crate) async fn run<B>(
    backend: Arc<B>,
    state: StateCell,
    cycle: u64,
    task_id: TaskId,
    config: PollerConfig,
) -> PollState
where
    B: LandingBackend + ?Sized,
{
    let poller = StatusPoller {
        backend,
        state,
        cycle,
        task_id,
    };
    let outcome = poller.run(config).await;

    info!(outcome = poll_state_label(outcome), "Polling finished");
    metrics::record_poll_session(poll_state_label(outcome));
    outcome
}

struct StatusPoller<B: ?Sized> {
    backend: Arc<B>,
    state: StateCell,
    cycle: u64,
    task_id: TaskId,
}

impl<B> StatusPoller<B>
where
    B: LandingBackend + ?Sized,
{
    async fn run(&self, config: PollerConfig) -> PollState {
        if !self.state.modify(self.cycle, |s| s.poll = PollState::Polling) {
            return PollState::Idle;
        }
        info!(
            interval = ?config.interval,
            timeout = ?config.timeout,
            "Polling task status"
        );

        let started = Instant::now();
        let deadline = started + config.timeout;
        let timeout = sleep_until(deadline);
        tokio::pin!(timeout);

        let mut ticker = interval_at(started + config.interval, config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = &mut timeout => {
                    return self.time_out();
                }
                _ = ticker.tick() => {
                    match tokio::time::timeout_at(deadline, self.check_once()).await {
                        Ok(Step::Continue) => {}
                        // The deadline bounds status checks only; the one
                        // result fetch is allowed to finish.
                        Ok(Step::Succeeded) => {
                            self.fetch_results().await;
                            return PollState::Succeeded;
                        }
                        Ok(Step::Done(outcome)) => return outcome,
                        Err(_) => return self.time_out(),
                    }
                }
            }
        }
    }

    /// Leave the processing phase as last observed and stop quietly.
    fn time_out(&self) -> PollState {
        warn!("No terminal status before the poll timeout, giving up");
        self.finish(PollState::TimedOut)
    }

    fn finish(&self, outcome: PollState) -> PollState {
        self.state.modify(self.cycle, |s| s.poll = outcome);
        outcome
    }

    /// Record a check that ended polling with an error.
    fn fail_check(&self, err: &ClientError) {
        let kind = if err.is_network() {
            ErrorKind::NetworkError
        } else {
            ErrorKind::ServerError
        };
        self.state.modify(self.cycle, |s| {
            s.upload
                .fail(UploadError::new(kind, messages::STATUS_CHECK_FAILED));
            s.poll = PollState::Failed;
        });
    }

    async fn check_once(&self) -> Step {
        let response = match self.backend.task_status(&self.task_id).await {
            Ok(response) => response,
            Err(ClientError::Server { status, .. }) => {
                metrics::record_status_poll("http_error");
                warn!(status, "Status check returned an error status, will retry");
                return Step::Continue;
            }
            Err(e) => {
                metrics::record_status_poll("error");
                error!("Status check failed: {}", e);
                self.fail_check(&e);
                return Step::Done(PollState::Failed);
            }
        };

        metrics::record_status_poll(response.status.as_str());
        let applied = self
            .state
            .modify(self.cycle, |s| s.upload.observe_status(response.status));
        if !applied {
            return Step::Done(PollState::Idle);
        }

        match response.status {
            TaskStatus::Success => {
                info!("Task succeeded, fetching clips");
                Step::Succeeded
            }
            TaskStatus::Failure => {
                let message = response
                    .error
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| messages::PROCESSING_FAILED.to_string());
                error!(reason = %message, "Task failed");
                self.state.modify(self.cycle, |s| {
                    s.upload.processing_failed(message);
                    s.poll = PollState::Failed;
                });
                Step::Done(PollState::Failed)
            }
            TaskStatus::Processing | TaskStatus::Unknown => Step::Continue,
        }
    }

    async fn fetch_results(&self) {
        match self.backend.task_result(&self.task_id).await {
            Ok(result) => {
                let clips = result.into_clips();
                info!(clips = clips.len(), "Clips ready");
                self.state.modify(self.cycle, |s| {
                    s.upload.complete_with_clips(clips);
                    s.poll = PollState::Succeeded;
                });
            }
            Err(ClientError::Server { status, .. }) => {
                warn!(status, "Result fetch returned an error status");
                self.finish(PollState::Succeeded);
            }
            Err(e) => {
                error!("Result fetch failed: {}", e);
                self.fail_check(&e);
                self.finish(PollState::Succeeded);
            }
        }
    }
}

fn poll_state_label(state: PollState) -> &'static str {
    match state {
        PollState::Idle => "cancelled",
        PollState::Polling => "polling",
        PollState::Succeeded => "succeeded",
        PollState::Failed => "failed",
        PollState::TimedOut => "timed_out",
    }
}
