//! The upload widget.
//!
//! Owns the state container and the processing timers, and implements the
//! upload controller and lead capture form on top of a [`LandingBackend`].

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{info, warn};

use vclip_landing_client::{LandingBackend, UploadFile};
use vclip_landing_models::{
    validate_phone, validate_video, ErrorKind, LeadCaptureState, PollState, TaskId, UploadError,
    UploadPhase, UploadState, UploadStatus,
};

use crate::config::WidgetConfig;
use crate::error::{LandingError, LandingResult};
use crate::metrics;
use crate::poller;
use crate::progress;
use crate::state::{StateCell, WidgetState};
use crate::timers::ProcessingTimers;

/// Headless video upload widget.
pub struct UploadWidget<B: LandingBackend + 'static> {
    backend: Arc<B>,
    config: WidgetConfig,
    state: StateCell,
    timers: ProcessingTimers,
    cycle: u64,
    file_input: Option<UploadFile>,
}

impl<B: LandingBackend + 'static> UploadWidget<B> {
    pub fn new(backend: Arc<B>, config: WidgetConfig) -> Self {
        Self {
            backend,
            config,
            state: StateCell::new(WidgetState::new(0)),
            timers: ProcessingTimers::new(),
            cycle: 0,
            file_input: None,
        }
    }

    /// Receive every state change.
    pub fn subscribe(&self) -> watch::Receiver<WidgetState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> WidgetState {
        self.state.snapshot()
    }

    /// File currently held by the picker, if any.
    pub fn file_input(&self) -> Option<&UploadFile> {
        self.file_input.as_ref()
    }

    /// Whether the poller or progress simulator is still running.
    pub fn has_live_timers(&self) -> bool {
        self.timers.is_active()
    }

    /// Base URL clip download links are resolved against.
    pub fn download_base_url(&self) -> &str {
        self.backend.download_base_url()
    }

    /// Wait for the current poller to finish.
    pub async fn wait_for_poller(&mut self) -> Option<PollState> {
        self.timers.wait_for_poller().await
    }

    /// Validate and upload a picked file.
    ///
    /// Only allowed from the idle phase; call [`UploadWidget::reset`] first to
    /// try again after an error.
    pub async fn select_file(&mut self, file: UploadFile) -> LandingResult<()> {
        if self.snapshot().upload.phase != UploadPhase::Idle {
            return Err(LandingError::InvalidState(
                "an upload is already in progress; remove it first",
            ));
        }

        info!(
            file_name = %file.name(),
            size_bytes = file.size_bytes(),
            media_type = %file.media_type(),
            "Video selected"
        );
        self.file_input = Some(file.clone());

        if let Err(rejection) = validate_video(&file.info) {
            let err = LandingError::from(rejection);
            warn!(file_name = %file.name(), "Video rejected: {}", err);
            self.record_upload_failure(&err);
            if let Some(upload_error) = err.to_upload_error() {
                self.state.modify(self.cycle, |s| {
                    s.upload = UploadState::reject(&file.info, upload_error);
                });
            }
            return Err(err);
        }

        self.state.modify(self.cycle, |s| {
            s.upload = UploadState::uploading(&file.info);
            s.lead = LeadCaptureState::new();
            s.poll = PollState::Idle;
        });

        let response = match self.backend.upload(&file).await {
            Ok(response) => response,
            Err(e) => return Err(self.fail_upload(LandingError::Upload(e))),
        };

        match (response.status, response.task_id) {
            (UploadStatus::Uploaded, _) => {
                info!(file_name = %file.name(), "Upload stored, waiting for lead capture");
                metrics::record_upload("uploaded");
                self.state.modify(self.cycle, |s| {
                    s.upload.mark_uploaded();
                    s.lead.show();
                });
                Ok(())
            }
            (UploadStatus::Processing, Some(task_id)) => {
                info!(
                    file_name = %file.name(),
                    task_id = %task_id,
                    "Upload started processing directly"
                );
                metrics::record_upload("processing");
                let poll_id = task_id.clone();
                self.state.modify(self.cycle, |s| {
                    s.upload.mark_uploaded_with_task(task_id);
                });
                self.start_processing_timers(poll_id);
                Ok(())
            }
            (_, _) => Err(self.fail_upload(LandingError::upload_refused(response.error))),
        }
    }

    /// Live phone input; the stored value is always sanitized.
    pub fn input_phone(&mut self, raw: &str) {
        self.state.update_if_current(self.cycle, |s| {
            if !s.lead.visible || s.lead.submitting {
                return false;
            }
            s.lead.set_input(raw);
            true
        });
    }

    /// Submit the lead form and start processing.
    ///
    /// The webhook call is best effort; only the start-processing call decides
    /// the outcome.
    pub async fn submit_phone(&mut self) -> LandingResult<TaskId> {
        let lead = self.snapshot().lead;
        if !lead.can_submit() {
            return Err(LandingError::InvalidState("the lead form is not open"));
        }

        let phone = lead.phone_number;
        if let Err(e) = validate_phone(&phone) {
            let message = e.to_string();
            self.state.modify(self.cycle, |s| s.lead.reject(message));
            metrics::record_lead("invalid");
            return Err(e.into());
        }

        self.state.modify(self.cycle, |s| s.lead.begin_submit());

        match tokio::time::timeout(
            self.config.lead_webhook_timeout,
            self.backend.notify_lead(&phone),
        )
        .await
        {
            Ok(Ok(())) => info!("Lead forwarded to webhook"),
            Ok(Err(e)) => warn!("Lead webhook failed, continuing: {}", e),
            Err(_) => warn!(
                "Lead webhook did not answer within {:?}, continuing",
                self.config.lead_webhook_timeout
            ),
        }

        let detail = match self.backend.start_processing(&phone).await {
            Ok(response) => {
                if let Some(task_id) = response.started_task().cloned() {
                    info!(task_id = %task_id, "Processing started");
                    metrics::record_lead("started");

                    let stored = task_id.clone();
                    self.state.modify(self.cycle, |s| {
                        s.lead.complete();
                        s.upload.start_processing(stored);
                    });
                    self.start_processing_timers(task_id.clone());
                    return Ok(task_id);
                }
                response
                    .error
                    .unwrap_or_else(|| format!("unexpected status {:?}", response.status))
            }
            Err(e) => e.to_string(),
        };

        warn!("Could not start processing: {}", detail);
        metrics::record_lead("start_failed");
        let err = LandingError::StartProcessing(detail);
        let message = err.user_message();
        self.state.modify(self.cycle, |s| s.lead.reject(message));
        Err(err)
    }

    /// Throw away the current upload and everything derived from it.
    pub fn reset(&mut self) {
        self.timers.cancel();
        self.file_input = None;
        self.cycle += 1;
        self.state.replace(WidgetState::new(self.cycle));
        info!(cycle = self.cycle, "Upload reset");
    }

    fn start_processing_timers(&mut self, task_id: TaskId) {
        let poller = tokio::spawn(poller::run(
            Arc::clone(&self.backend),
            self.state.clone(),
            self.cycle,
            task_id,
            self.config.poller.clone(),
        ));
        let progress = tokio::spawn(progress::run(
            self.state.clone(),
            self.cycle,
            self.config.progress.clone(),
        ));
        self.timers.start(poller, progress);
    }

    fn fail_upload(&mut self, err: LandingError) -> LandingError {
        warn!("Upload failed: {}", err);
        self.record_upload_failure(&err);
        let upload_error = err
            .to_upload_error()
            .unwrap_or_else(|| UploadError::new(ErrorKind::ServerError, err.user_message()));
        self.state.modify(self.cycle, |s| {
            s.upload.fail(upload_error);
            s.lead = LeadCaptureState::new();
        });
        err
    }

    fn record_upload_failure(&self, err: &LandingError) {
        let outcome = err.kind().map(|k| k.as_str()).unwrap_or("error");
        metrics::record_upload(outcome);
    }
}

impl<B: LandingBackend + 'static> Drop for UploadWidget<B> {
    fn drop(&mut self) {
        self.timers.cancel();
        self.state.retire();
    }
}
