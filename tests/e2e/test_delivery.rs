use crate::e2e::helpers;

use helpers::mocks::{unreachable_s3_storage, RecordingStorage};
use chatterbox_worker::infrastructure::repositories::StorageRepository;
use helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn it_should_fall_back_to_inline_when_upload_fails() {
    let storage: Arc<dyn StorageRepository> = Arc::new(unreachable_s3_storage().await);
    let ctx = TestContext::with_storage(Some(storage), None).await.unwrap();

    let response = ctx
        .client
        .post("/runsync", &json!({ "id": "job-1", "input": { "text": "Hello world" } }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.as_ref().unwrap()["status"], "COMPLETED");

    let output = response.output();
    assert!(output["audio"].as_str().is_some_and(|a| !a.is_empty()));
    assert!(output.get("audio_url").is_none());
    assert!(output.get("error").is_none());
}

#[tokio::test]
async fn it_should_return_cdn_url_after_upload() {
    let storage = Arc::new(RecordingStorage::default());
    let ctx = TestContext::with_storage(
        Some(storage.clone() as Arc<dyn StorageRepository>),
        Some("https://cdn.example.com".to_string()),
    )
    .await
    .unwrap();

    let response = ctx
        .client
        .post("/runsync", &json!({ "id": "job-42", "input": { "text": "Hello world" } }))
        .await
        .unwrap();

    let output = response.output();
    assert_eq!(output["audio_url"], "https://cdn.example.com/tts/job-42.wav");
    assert!(output.get("audio").is_none());
    assert_eq!(output["format"], "wav");

    assert_eq!(
        storage.uploads(),
        vec![("tts/job-42.wav".to_string(), "audio/wav".to_string())]
    );
}

#[tokio::test]
async fn it_should_return_storage_url_without_cdn() {
    let storage = Arc::new(RecordingStorage::default());
    let ctx = TestContext::with_storage(Some(storage.clone() as Arc<dyn StorageRepository>), None)
        .await
        .unwrap();

    let response = ctx
        .client
        .post("/runsync", &json!({ "id": "job-7", "input": { "text": "Hi" } }))
        .await
        .unwrap();

    assert_eq!(
        response.output()["audio_url"],
        "https://storage.test/cdn/tts/job-7.wav"
    );
}

#[tokio::test]
async fn it_should_skip_upload_when_base64_is_requested() {
    let storage = Arc::new(RecordingStorage::default());
    let ctx = TestContext::with_storage(Some(storage.clone() as Arc<dyn StorageRepository>), None)
        .await
        .unwrap();

    let response = ctx
        .client
        .run_job(json!({ "text": "Hi", "return_base64": true }))
        .await
        .unwrap();

    assert!(response.output()["audio"].as_str().is_some());
    assert!(storage.uploads().is_empty());
}

#[test_context::test_context(TestContext)]
#[tokio::test]
async fn it_should_return_inline_audio_without_storage(ctx: &TestContext) {
    let response = ctx.client.run_job(json!({ "text": "Hi" })).await.unwrap();

    assert!(response.output()["audio"].as_str().is_some());
    assert!(response.output().get("audio_url").is_none());
}
