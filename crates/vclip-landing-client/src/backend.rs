//! Backend seam used by the uploader state machine.

use async_trait::async_trait;

use vclip_landing_models::{
    StartProcessingResponse, TaskId, TaskResultResponse, TaskStatusResponse, UploadResponse,
};

use crate::client::LandingApiClient;
use crate::error::ClientResult;
use crate::file::UploadFile;

/// Everything the uploader needs from the outside world.
#[async_trait]
pub trait LandingBackend: Send + Sync {
    /// Submit the picked video.
    async fn upload(&self, file: &UploadFile) -> ClientResult<UploadResponse>;

    /// Forward a phone number to the lead webhook.
    async fn notify_lead(&self, phone: &str) -> ClientResult<()>;

    /// Start processing the uploaded video.
    async fn start_processing(&self, phone_number: &str) -> ClientResult<StartProcessingResponse>;

    /// Current status of a task.
    async fn task_status(&self, task_id: &TaskId) -> ClientResult<TaskStatusResponse>;

    /// Clips produced by a finished task.
    async fn task_result(&self, task_id: &TaskId) -> ClientResult<TaskResultResponse>;

    /// Base URL clip download paths are relative to.
    fn download_base_url(&self) -> &str;
}

#[async_trait]
impl LandingBackend for LandingApiClient {
    async fn upload(&self, file: &UploadFile) -> ClientResult<UploadResponse> {
        LandingApiClient::upload(self, file).await
    }

    async fn notify_lead(&self, phone: &str) -> ClientResult<()> {
        LandingApiClient::notify_lead(self, phone).await
    }

    async fn start_processing(&self, phone_number: &str) -> ClientResult<StartProcessingResponse> {
        LandingApiClient::start_processing(self, phone_number).await
    }

    async fn task_status(&self, task_id: &TaskId) -> ClientResult<TaskStatusResponse> {
        LandingApiClient::task_status(self, task_id).await
    }

    async fn task_result(&self, task_id: &TaskId) -> ClientResult<TaskResultResponse> {
        LandingApiClient::task_result(self, task_id).await
    }

    fn download_base_url(&self) -> &str {
        self.base_url()
    }
}
