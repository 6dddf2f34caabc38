use std::io::Write;
use std::time::Duration;

use serde_json::json;
use vclip_landing_client::{ApiClientConfig, ClientError, LandingApiClient, UploadFile};
use vclip_landing_models::{TaskId, TaskStatus, UploadStatus, VideoFile};
use wiremock::matchers::{body_json, body_string_contains, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> LandingApiClient {
    let config = ApiClientConfig::default()
        .with_base_url(server.uri())
        .with_webhook_url(format!("{}/hook", server.uri()))
        .with_timeout(Duration::from_secs(5));
    LandingApiClient::new(config).expect("client builds")
}

fn video_on_disk() -> (tempfile::NamedTempFile, UploadFile) {
    let mut tmp = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
    tmp.write_all(b"not really a video").unwrap();
    let file = UploadFile::new(
        tmp.path(),
        VideoFile::new("talk.mp4", 18, "video/mp4"),
    );
    (tmp, file)
}

#[tokio::test]
async fn test_upload_posts_multipart_file_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("filename=\"talk.mp4\""))
        .and(body_string_contains("not really a video"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "UPLOADED"})))
        .expect(1)
        .mount(&server)
        .await;

    let (_tmp, file) = video_on_disk();
    let response = client_for(&server).upload(&file).await.expect("upload ok");
    assert_eq!(response.status, UploadStatus::Uploaded);
    assert!(response.task_id.is_none());
}

#[tokio::test]
async fn test_upload_legacy_processing_response_carries_task() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "PROCESSING", "task_id": "abc"})),
        )
        .mount(&server)
        .await;

    let (_tmp, file) = video_on_disk();
    let response = client_for(&server).upload(&file).await.unwrap();
    assert_eq!(response.status, UploadStatus::Processing);
    assert_eq!(response.task_id, Some(TaskId::new("abc")));
}

#[tokio::test]
async fn test_upload_error_status_keeps_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/upload"))
        .respond_with(
            ResponseTemplate::new(413).set_body_json(json!({"error": "Video too long"})),
        )
        .mount(&server)
        .await;

    let (_tmp, file) = video_on_disk();
    let err = client_for(&server).upload(&file).await.unwrap_err();
    match err {
        ClientError::Server { status, ref message } => {
            assert_eq!(status, 413);
            assert_eq!(message.as_deref(), Some("Video too long"));
        }
        other => panic!("expected server error, got {other:?}"),
    }
    assert_eq!(err.server_message(), Some("Video too long"));
}

#[tokio::test]
async fn test_upload_of_missing_file_is_io_error() {
    let server = MockServer::start().await;
    let file = UploadFile::new(
        "/definitely/not/here.mp4",
        VideoFile::new("here.mp4", 1, "video/mp4"),
    );
    let err = client_for(&server).upload(&file).await.unwrap_err();
    assert!(matches!(err, ClientError::Io(_)));
}

#[tokio::test]
async fn test_start_processing_sends_phone_number() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/start-processing"))
        .and(body_json(json!({"phone_number": "+1 5551234567"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "PROCESSING", "task_id": "t-9"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server)
        .start_processing("+1 5551234567")
        .await
        .unwrap();
    assert_eq!(response.started_task(), Some(&TaskId::new("t-9")));
}

#[tokio::test]
async fn test_task_status_and_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/task/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "SUCCESS"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/task/abc/result"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "short_clips": [
                {"filename": "clip_1.mp4", "url": "/api/download/clip_1.mp4", "size": 12.5},
                {"filename": "clip_2.mp4", "url": "/api/download/clip_2.mp4", "size": 3}
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let id = TaskId::new("abc");

    let status = client.task_status(&id).await.unwrap();
    assert_eq!(status.status, TaskStatus::Success);

    let clips = client.task_result(&id).await.unwrap().into_clips();
    assert_eq!(clips.len(), 2);
    assert_eq!(clips[0].filename, "clip_1.mp4");
    assert_eq!(clips[0].size_mb, 12.5);
    assert_eq!(clips[1].display_size(), "3.0 MB");
    assert_eq!(
        clips[0].download_url(client.base_url()),
        format!("{}/api/download/clip_1.mp4", server.uri())
    );
}

#[tokio::test]
async fn test_task_status_with_bad_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/task/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .task_status(&TaskId::new("abc"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse(_)));
    assert!(!err.is_network());
}

#[tokio::test]
async fn test_notify_lead_posts_phone() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_json(json!({"phone": "+44 2071234567"})))
        .respond_with(ResponseTemplate::new(200).set_body_string("Accepted"))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .notify_lead("+44 2071234567")
        .await
        .expect("webhook accepted");
}

#[tokio::test]
async fn test_notify_lead_reports_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&server)
        .await;

    let err = client_for(&server).notify_lead("5551234567").await.unwrap_err();
    assert!(matches!(err, ClientError::Server { status: 410, .. }));
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let config = ApiClientConfig::default()
        .with_base_url("http://127.0.0.1:1")
        .with_timeout(Duration::from_secs(2));
    let client = LandingApiClient::new(config).unwrap();

    let err = client.task_status(&TaskId::new("abc")).await.unwrap_err();
    assert!(err.is_network(), "got {err:?}");
}
