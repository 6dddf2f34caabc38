#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use vclip_landing_client::{ClientError, ClientResult, LandingBackend, UploadFile};
use vclip_landing_models::{
    ClipResult, StartProcessingResponse, TaskId, TaskResultResponse, TaskStatus,
    TaskStatusResponse, UploadResponse, VideoFile,
};

pub const BASE_URL: &str = "http://backend.test";

/// Canned reply for one backend call.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    Server(u16, Option<String>),
    /// Request failed before any response arrived
    Network,
    /// 2xx with a body that does not decode
    Garbled,
    /// Local file could not be read
    Unreadable,
}

impl<T> Reply<T> {
    fn into_result(self) -> ClientResult<T> {
        match self {
            Reply::Ok(value) => Ok(value),
            Reply::Server(status, message) => Err(ClientError::server(status, message)),
            Reply::Network => Err(ClientError::Network(transport_error())),
            Reply::Garbled => Err(ClientError::invalid_response("expected value at line 1")),
            Reply::Unreadable => Err(ClientError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "file vanished",
            ))),
        }
    }
}

/// A genuine `reqwest::Error` raised before anything is sent.
fn transport_error() -> reqwest::Error {
    reqwest::Client::new()
        .get("not a url")
        .build()
        .expect_err("a request without a valid URL cannot be built")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Upload(String),
    Webhook(String),
    StartProcessing(String),
    Status(TaskId),
    Result(TaskId),
}

/// In-memory backend driven by scripted replies.
///
/// Status replies are consumed in order; the last one repeats forever.
pub struct ScriptedBackend {
    upload: Mutex<Reply<UploadResponse>>,
    webhook: Mutex<Reply<()>>,
    start: Mutex<Reply<StartProcessingResponse>>,
    statuses: Mutex<VecDeque<Reply<TaskStatusResponse>>>,
    result: Mutex<Reply<TaskResultResponse>>,
    result_delay: Mutex<Duration>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            upload: Mutex::new(Reply::Ok(UploadResponse::uploaded())),
            webhook: Mutex::new(Reply::Ok(())),
            start: Mutex::new(Reply::Ok(StartProcessingResponse::processing("task-1"))),
            statuses: Mutex::new(VecDeque::from([processing()])),
            result: Mutex::new(Reply::Ok(TaskResultResponse::with_clips(two_clips()))),
            result_delay: Mutex::new(Duration::ZERO),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_upload(self, reply: Reply<UploadResponse>) -> Self {
        *self.upload.lock().unwrap() = reply;
        self
    }

    pub fn with_webhook(self, reply: Reply<()>) -> Self {
        *self.webhook.lock().unwrap() = reply;
        self
    }

    pub fn with_start(self, reply: Reply<StartProcessingResponse>) -> Self {
        *self.start.lock().unwrap() = reply;
        self
    }

    pub fn with_statuses(self, replies: Vec<Reply<TaskStatusResponse>>) -> Self {
        self.set_statuses(replies);
        self
    }

    pub fn with_result(self, reply: Reply<TaskResultResponse>) -> Self {
        *self.result.lock().unwrap() = reply;
        self
    }

    /// Make the result fetch take `delay` before answering.
    pub fn with_result_delay(self, delay: Duration) -> Self {
        *self.result_delay.lock().unwrap() = delay;
        self
    }

    pub fn set_start(&self, reply: Reply<StartProcessingResponse>) {
        *self.start.lock().unwrap() = reply;
    }

    pub fn set_statuses(&self, replies: Vec<Reply<TaskStatusResponse>>) {
        *self.statuses.lock().unwrap() = replies.into();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matches(c)).count()
    }

    pub fn upload_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::Upload(_)))
    }

    pub fn webhook_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::Webhook(_)))
    }

    pub fn start_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::StartProcessing(_)))
    }

    pub fn status_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::Status(_)))
    }

    pub fn result_calls(&self) -> usize {
        self.count(|c| matches!(c, Call::Result(_)))
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl LandingBackend for ScriptedBackend {
    async fn upload(&self, file: &UploadFile) -> ClientResult<UploadResponse> {
        self.record(Call::Upload(file.name().to_string()));
        self.upload.lock().unwrap().clone().into_result()
    }

    async fn notify_lead(&self, phone: &str) -> ClientResult<()> {
        self.record(Call::Webhook(phone.to_string()));
        self.webhook.lock().unwrap().clone().into_result()
    }

    async fn start_processing(&self, phone_number: &str) -> ClientResult<StartProcessingResponse> {
        self.record(Call::StartProcessing(phone_number.to_string()));
        self.start.lock().unwrap().clone().into_result()
    }

    async fn task_status(&self, task_id: &TaskId) -> ClientResult<TaskStatusResponse> {
        self.record(Call::Status(task_id.clone()));
        let reply = {
            let mut statuses = self.statuses.lock().unwrap();
            if statuses.len() > 1 {
                statuses.pop_front()
            } else {
                statuses.front().cloned()
            }
        };
        reply.unwrap_or_else(processing).into_result()
    }

    async fn task_result(&self, task_id: &TaskId) -> ClientResult<TaskResultResponse> {
        self.record(Call::Result(task_id.clone()));
        let delay = *self.result_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.result.lock().unwrap().clone().into_result()
    }

    fn download_base_url(&self) -> &str {
        BASE_URL
    }
}

pub fn processing() -> Reply<TaskStatusResponse> {
    Reply::Ok(TaskStatusResponse::new(TaskStatus::Processing))
}

pub fn success() -> Reply<TaskStatusResponse> {
    Reply::Ok(TaskStatusResponse::new(TaskStatus::Success))
}

pub fn failure(message: &str) -> Reply<TaskStatusResponse> {
    Reply::Ok(TaskStatusResponse::failure(message))
}

pub fn two_clips() -> Vec<ClipResult> {
    vec![
        ClipResult::new("clip_1.mp4", "/api/download/clip_1.mp4", 3.0),
        ClipResult::new("clip_2.mp4", "/api/download/clip_2.mp4", 12.5),
    ]
}

pub fn video(name: &str, size_bytes: u64, media_type: &str) -> UploadFile {
    UploadFile::new(
        format!("/videos/{name}"),
        VideoFile::new(name, size_bytes, media_type),
    )
}

pub fn mp4() -> UploadFile {
    video("talk.mp4", 20 * 1024 * 1024, "video/mp4")
}
