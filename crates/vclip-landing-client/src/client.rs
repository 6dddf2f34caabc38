//! Upload API HTTP client.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

use vclip_landing_models::{
    ErrorBody, LeadWebhookPayload, StartProcessingRequest, StartProcessingResponse, TaskId,
    TaskResultResponse, TaskStatusResponse, UploadResponse,
};

use crate::error::{ClientError, ClientResult};
use crate::file::UploadFile;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Marketing automation hook that receives captured phone numbers.
pub const DEFAULT_LEAD_WEBHOOK_URL: &str =
    "https://hook.us2.make.com/8hamrtcq1dj54cfvmrpwb72mok8lb417";

/// Backend endpoint paths.
pub mod endpoints {
    pub const UPLOAD: &str = "/api/upload";
    pub const START_PROCESSING: &str = "/api/start-processing";
    pub const TASK: &str = "/api/task";
}

/// Configuration for the API client.
///
/// `base_url` is the single source of truth for where the backend lives.
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Backend base URL, without trailing slash
    pub base_url: String,
    /// Lead webhook receiver
    pub webhook_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            webhook_url: DEFAULT_LEAD_WEBHOOK_URL.to_string(),
            timeout: Duration::from_secs(300), // 500 MiB uploads on slow links
        }
    }
}

impl ApiClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("LANDING_API_URL")
                .unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            webhook_url: std::env::var("LANDING_WEBHOOK_URL")
                .unwrap_or_else(|_| DEFAULT_LEAD_WEBHOOK_URL.to_string()),
            timeout: Duration::from_secs(
                std::env::var("LANDING_REQUEST_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_webhook_url(mut self, webhook_url: impl Into<String>) -> Self {
        self.webhook_url = webhook_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check both URLs and normalize the base URL.
    pub fn validated(mut self) -> ClientResult<Self> {
        check_http_url("base URL", &self.base_url)?;
        check_http_url("webhook URL", &self.webhook_url)?;
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Full URL for an endpoint path.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn task_status_url(&self, task_id: &TaskId) -> ClientResult<String> {
        self.task_url(task_id, None)
    }

    pub fn task_result_url(&self, task_id: &TaskId) -> ClientResult<String> {
        self.task_url(task_id, Some("result"))
    }

    /// `{base}/api/task/{id}[/{suffix}]` with the id kept as one encoded segment.
    fn task_url(&self, task_id: &TaskId, suffix: Option<&str>) -> ClientResult<String> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ClientError::InvalidConfig(format!("base URL '{}': {}", self.base_url, e))
        })?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                ClientError::InvalidConfig(format!(
                    "base URL '{}' cannot take a path",
                    self.base_url
                ))
            })?;
            segments
                .pop_if_empty()
                .extend(endpoints::TASK.split('/').filter(|s| !s.is_empty()))
                .push(task_id.as_str());
            if let Some(suffix) = suffix {
                segments.push(suffix);
            }
        }
        Ok(url.into())
    }
}

fn check_http_url(what: &str, raw: &str) -> ClientResult<()> {
    let url = Url::parse(raw)
        .map_err(|e| ClientError::InvalidConfig(format!("{} '{}': {}", what, raw, e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ClientError::InvalidConfig(format!(
            "{} '{}' must use http or https, not {}",
            what, raw, other
        ))),
    }
}

/// Client for the upload API and the lead webhook.
#[derive(Debug, Clone)]
pub struct LandingApiClient {
    http: Client,
    config: ApiClientConfig,
}

impl LandingApiClient {
    /// Create a new API client.
    pub fn new(config: ApiClientConfig) -> ClientResult<Self> {
        let config = config.validated()?;
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(ApiClientConfig::from_env())
    }

    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Upload a video as multipart form data (field `file`).
    pub async fn upload(&self, file: &UploadFile) -> ClientResult<UploadResponse> {
        let url = self.config.endpoint_url(endpoints::UPLOAD);

        let source = tokio::fs::File::open(&file.path).await?;
        let part = Part::stream_with_length(Body::from(source), file.size_bytes())
            .file_name(file.name().to_string())
            .mime_str(file.media_type())?;
        let form = Form::new().part("file", part);

        info!(
            file_name = %file.name(),
            size_bytes = file.size_bytes(),
            media_type = %file.media_type(),
            "Uploading video to {}", url
        );

        let response = self.http.post(&url).multipart(form).send().await?;
        read_json(response).await
    }

    /// Ask the backend to start processing the uploaded video.
    pub async fn start_processing(&self, phone_number: &str) -> ClientResult<StartProcessingResponse> {
        let url = self.config.endpoint_url(endpoints::START_PROCESSING);
        debug!("Requesting processing start at {}", url);

        let body = StartProcessingRequest {
            phone_number: phone_number.to_string(),
        };
        let response = self.http.post(&url).json(&body).send().await?;
        read_json(response).await
    }

    /// Fetch the current status of a task.
    pub async fn task_status(&self, task_id: &TaskId) -> ClientResult<TaskStatusResponse> {
        let url = self.config.task_status_url(task_id)?;
        let response = self.http.get(&url).send().await?;
        read_json(response).await
    }

    /// Fetch the clips produced by a finished task.
    pub async fn task_result(&self, task_id: &TaskId) -> ClientResult<TaskResultResponse> {
        let url = self.config.task_result_url(task_id)?;
        debug!(task_id = %task_id, "Fetching task result from {}", url);
        let response = self.http.get(&url).send().await?;
        read_json(response).await
    }

    /// Forward a captured phone number to the lead webhook.
    ///
    /// The response body is ignored.
    pub async fn notify_lead(&self, phone: &str) -> ClientResult<()> {
        let payload = LeadWebhookPayload {
            phone: phone.to_string(),
        };
        let response = self
            .http
            .post(&self.config.webhook_url)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Lead webhook returned {}", status);
            return Err(ClientError::server(status.as_u16(), None));
        }
        Ok(())
    }
}

/// Decode a JSON body, turning non-2xx responses into [`ClientError::Server`].
async fn read_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .ok()
            .and_then(ErrorBody::message);
        return Err(ClientError::server(status.as_u16(), message));
    }

    serde_json::from_slice(&bytes).map_err(|e| {
        ClientError::invalid_response(format!("{} (status {})", e, status.as_u16()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ApiClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.webhook_url, DEFAULT_LEAD_WEBHOOK_URL);
        assert_eq!(config.timeout, Duration::from_secs(300));
    }

    #[test]
    fn test_validated_trims_trailing_slash() {
        let config = ApiClientConfig::default()
            .with_base_url("https://api.viralclip.ai/")
            .validated()
            .unwrap();
        assert_eq!(config.base_url, "https://api.viralclip.ai");
        assert_eq!(
            config.endpoint_url(endpoints::UPLOAD),
            "https://api.viralclip.ai/api/upload"
        );
    }

    #[test]
    fn test_validated_rejects_bad_urls() {
        let relative = ApiClientConfig::default().with_base_url("localhost:8000/api");
        assert!(matches!(relative.validated(), Err(ClientError::InvalidConfig(_))));

        let ftp = ApiClientConfig::default().with_webhook_url("ftp://example.com/hook");
        assert!(matches!(ftp.validated(), Err(ClientError::InvalidConfig(_))));
    }

    #[test]
    fn test_task_urls() {
        let config = ApiClientConfig::default();
        let id = TaskId::new("abc");
        assert_eq!(
            config.task_status_url(&id).unwrap(),
            "http://localhost:8000/api/task/abc"
        );
        assert_eq!(
            config.task_result_url(&id).unwrap(),
            "http://localhost:8000/api/task/abc/result"
        );
    }

    #[test]
    fn test_task_urls_encode_the_id() {
        let config = ApiClientConfig::default();
        let id = TaskId::new("a/b?c#d");
        assert_eq!(
            config.task_status_url(&id).unwrap(),
            "http://localhost:8000/api/task/a%2Fb%3Fc%23d"
        );
        assert_eq!(
            config.task_result_url(&id).unwrap(),
            "http://localhost:8000/api/task/a%2Fb%3Fc%23d/result"
        );
    }

    #[test]
    fn test_task_urls_keep_a_base_path() {
        let config = ApiClientConfig::default()
            .with_base_url("https://example.com/backend/")
            .validated()
            .unwrap();
        assert_eq!(
            config.task_result_url(&TaskId::new("42")).unwrap(),
            "https://example.com/backend/api/task/42/result"
        );
    }
}
