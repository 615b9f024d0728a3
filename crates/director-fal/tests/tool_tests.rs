//! End-to-end tests of the text-to-video tool against a mock fal.ai.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use director_fal::{FalConfig, FalError, TextToVideoConfig, TextToVideoTool, VideoModel};

fn tool_for(server: &MockServer) -> TextToVideoTool {
    TextToVideoTool::new(FalConfig {
        api_key: "fal-test".to_string(),
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

#[tokio::test]
async fn test_default_model_and_saved_bytes() {
    let server = MockServer::start().await;
    let video_bytes = b"\x00\x00\x00\x18ftypmp42fake-video".to_vec();

    Mock::given(method("POST"))
        .and(path("/fal-ai/minimax-video"))
        .and(header("Authorization", "Key fal-test"))
        .and(body_json(json!({"prompt": "a fox in the snow", "duration": 5.0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "video": {"url": format!("{}/files/fox.mp4", server.uri())}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/fox.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(video_bytes.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let save_at = dir.path().join("fox.mp4");

    tool_for(&server)
        .text_to_video("a fox in the snow", &save_at, 5.0, &TextToVideoConfig::default())
        .await
        .unwrap();

    assert_eq!(std::fs::read(&save_at).unwrap(), video_bytes);
    assert!(!dir.path().join("fox.mp4.part").exists());
}

#[tokio::test]
async fn test_selected_model_and_overwrite() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/fal-ai/kling-video/v1.5/pro/text-to-video"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "video": {"url": format!("{}/files/out.mp4", server.uri())}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/out.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let save_at = dir.path().join("out.mp4");
    std::fs::write(&save_at, b"old contents that are longer").unwrap();

    let config = TextToVideoConfig {
        model_name: VideoModel::KlingV15Pro,
    };
    tool_for(&server)
        .text_to_video("city at night", &save_at, 10.0, &config)
        .await
        .unwrap();

    assert_eq!(std::fs::read(&save_at).unwrap(), b"new");
}

#[tokio::test]
async fn test_failed_download_leaves_no_file() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/fal-ai/minimax-video"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "video": {"url": format!("{}/files/missing.mp4", server.uri())}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/missing.mp4"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let save_at = dir.path().join("missing.mp4");

    let err = tool_for(&server)
        .text_to_video("nothing", &save_at, 5.0, &TextToVideoConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(err, FalError::RequestFailed(_)));
    assert!(!save_at.exists());
}

#[tokio::test]
async fn test_generation_error_propagates() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/fal-ai/minimax-video"))
        .respond_with(ResponseTemplate::new(422).set_body_string("prompt rejected"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let err = tool_for(&server)
        .text_to_video("x", &dir.path().join("x.mp4"), 5.0, &TextToVideoConfig::default())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("prompt rejected"));
}

#[test]
fn test_construction_requires_key() {
    let err = TextToVideoTool::new(FalConfig::default()).err().unwrap();
    assert!(err.is_missing_credential());
}
