use crate::e2e::helpers;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use helpers::mocks::ENGINE_SAMPLE_RATE;
use helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Cursor;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_synthesize_hello_world_inline(ctx: &TestContext) {
    let response = ctx
        .client
        .run_job(json!({ "text": "Hello world" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_eq!(body["status"], "COMPLETED");

    let output = response.output();
    assert!(output.get("error").is_none());
    assert!(output.get("audio_url").is_none());
    assert_eq!(output["sample_rate"], ENGINE_SAMPLE_RATE);
    assert_eq!(output["format"], "wav");
    assert!(output["duration"].as_f64().unwrap() > 0.0);

    // The inline payload is a playable 16-bit mono WAV
    let bytes = BASE64.decode(output["audio"].as_str().unwrap()).unwrap();
    let reader = hound::WavReader::new(Cursor::new(bytes)).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, ENGINE_SAMPLE_RATE);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(reader.duration(), ENGINE_SAMPLE_RATE / 2);

    assert_eq!(ctx.engine.calls(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_echo_the_job_id(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/runsync", &json!({ "id": "job-123", "input": { "text": "Hi" } }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.body.as_ref().unwrap()["id"], "job-123");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_use_request_id_when_job_id_is_missing(ctx: &TestContext) {
    let response = ctx.client.run_job(json!({ "text": "Hi" })).await.unwrap();

    response.assert_status(StatusCode::OK);
    let request_id = response.header("x-request-id").unwrap();
    assert_eq!(response.body.as_ref().unwrap()["id"], request_id.as_str());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_blank_text_before_inference(ctx: &TestContext) {
    let response = ctx.client.run_job(json!({ "text": "   " })).await.unwrap();

    response.assert_status(StatusCode::OK);
    response.assert_job_error("Missing required parameter: text");
    assert_eq!(
        response.output(),
        &json!({ "error": "Missing required parameter: text" })
    );
    assert_eq!(ctx.engine.calls(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_missing_text(ctx: &TestContext) {
    let response = ctx
        .client
        .run_job(json!({ "exaggeration": 0.5 }))
        .await
        .unwrap();

    response.assert_job_error("Missing required parameter: text");
    assert_eq!(ctx.engine.calls(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unsupported_format_without_fetching(ctx: &TestContext) {
    let response = ctx
        .client
        .run_job(json!({
            "text": "Hi",
            "output_format": "flac",
            "audio_prompt": ctx.mock_engine.file_url("voice.wav")
        }))
        .await
        .unwrap();

    response.assert_job_error("format");
    assert_eq!(ctx.engine.calls(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_malformed_base64_prompt(ctx: &TestContext) {
    let response = ctx
        .client
        .run_job(json!({ "text": "Hi", "audio_prompt": "@@not-base64@@" }))
        .await
        .unwrap();

    response.assert_job_error("decode");
    assert_eq!(ctx.engine.calls(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_clone_voice_from_url(ctx: &TestContext) {
    let response = ctx
        .client
        .run_job(json!({
            "text": "Say it like me",
            "audio_prompt": ctx.mock_engine.file_url("voice.wav")
        }))
        .await
        .unwrap();

    assert_eq!(response.body.as_ref().unwrap()["status"], "COMPLETED");

    let sent = ctx.engine.last_request().unwrap();
    let prompt = BASE64
        .decode(sent["audio_prompt"].as_str().unwrap())
        .unwrap();
    let reader = hound::WavReader::new(Cursor::new(prompt)).unwrap();
    assert_eq!(reader.spec().sample_rate, 16_000);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_clone_voice_from_inline_prompt(ctx: &TestContext) {
    let prompt = BASE64.encode(helpers::mocks::sine_wav(22_050, 0.5));

    let response = ctx
        .client
        .run_job(json!({ "text": "Say it like me", "audio_prompt": prompt }))
        .await
        .unwrap();

    assert_eq!(response.body.as_ref().unwrap()["status"], "COMPLETED");
    let sent = ctx.engine.last_request().unwrap();
    assert_eq!(sent["audio_prompt"].as_str(), Some(prompt.as_str()));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_prompt_download_failure(ctx: &TestContext) {
    let response = ctx
        .client
        .run_job(json!({
            "text": "Hi",
            "audio_prompt": ctx.mock_engine.file_url("missing.wav")
        }))
        .await
        .unwrap();

    response.assert_job_error("Failed to download audio prompt");
    assert_eq!(ctx.engine.calls(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_prompt_that_is_not_audio(ctx: &TestContext) {
    let response = ctx
        .client
        .run_job(json!({
            "text": "Hi",
            "audio_prompt": ctx.mock_engine.file_url("notes.txt")
        }))
        .await
        .unwrap();

    response.assert_job_error("Unsupported audio prompt");
    assert_eq!(ctx.engine.calls(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_model_failure(ctx: &TestContext) {
    let response = ctx
        .client
        .run_job(json!({ "text": "this will fail" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    response.assert_job_error("TTS generation failed: CUDA out of memory");
    assert_eq!(ctx.engine.calls(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_forward_generation_parameters(ctx: &TestContext) {
    ctx.client
        .run_job(json!({ "text": "Hi", "exaggeration": 0.7, "cfg_weight": "0.3" }))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let sent = ctx.engine.last_request().unwrap();
    assert_eq!(sent["text"], "Hi");
    assert!((sent["exaggeration"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    assert!((sent["cfg_weight"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    assert!(sent.get("audio_prompt").is_none());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_non_numeric_parameters(ctx: &TestContext) {
    let response = ctx
        .client
        .run_job(json!({ "text": "Hi", "exaggeration": "loud" }))
        .await
        .unwrap();

    response.assert_job_error("exaggeration");
    assert_eq!(ctx.engine.calls(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_body_that_is_not_json(ctx: &TestContext) {
    let response = ctx.client.post_raw("/runsync", "{not json").await.unwrap();

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_error_message("Invalid input");
    assert_eq!(ctx.engine.calls(), 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_encode_mp3_when_ffmpeg_is_installed(ctx: &TestContext) {
    let ffmpeg_available = std::process::Command::new("ffmpeg")
        .arg("-version")
        .output()
        .is_ok_and(|output| output.status.success());
    if !ffmpeg_available {
        eprintln!("ffmpeg not found, skipping mp3 encoding check");
        return;
    }

    let response = ctx
        .client
        .run_job(json!({ "text": "Hello world", "output_format": "mp3" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let output = response.output();
    assert!(output.get("error").is_none(), "output: {}", output);
    assert_eq!(output["format"], "mp3");
    assert_eq!(output["sample_rate"], ENGINE_SAMPLE_RATE);
    assert!((output["duration"].as_f64().unwrap() - 0.5).abs() < 1e-6);

    let bytes = BASE64.decode(output["audio"].as_str().unwrap()).unwrap();
    assert!(!bytes.is_empty());
    // Either an ID3 tag or a bare MPEG frame sync
    assert!(bytes.starts_with(b"ID3") || (bytes[0] == 0xFF && bytes[1] & 0xE0 == 0xE0));
}
