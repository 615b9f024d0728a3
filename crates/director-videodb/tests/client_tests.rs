//! HTTP-level tests for the video service client.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use director_models::{CollectionId, SceneIndexId, VideoId};
use director_videodb::{
    IndexType, SceneExtraction, SearchFilters, SearchRequest, VideoDb, VideoDbClient,
    VideoDbConfig, VideoDbError,
};

fn client_for(server: &MockServer) -> VideoDbClient {
    let config = VideoDbConfig {
        api_key: "test-key".to_string(),
        base_url: server.uri(),
        timeout: Duration::from_secs(5),
        poll_interval: Duration::from_millis(10),
        max_poll_wait: Duration::from_millis(200),
    };
    VideoDbClient::new(config).unwrap()
}

#[tokio::test]
async fn test_get_video_sends_auth_and_collection() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/video/m-1"))
        .and(query_param("collection_id", "c-1"))
        .and(header("x-access-token", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "id": "m-1",
                "collection_id": "c-1",
                "name": "Front door",
                "stream_url": "https://stream/m-1.m3u8",
                "length": 90.5
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let video = client_for(&server)
        .get_video(&CollectionId::from("c-1"), &VideoId::from("m-1"))
        .await
        .unwrap();

    assert_eq!(video.name.as_deref(), Some("Front door"));
    assert_eq!(video.length, Some(90.5));
}

#[tokio::test]
async fn test_get_video_missing_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/video/m-404"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"success": false, "message": "Video not found"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .get_video(&CollectionId::from("c-1"), &VideoId::from("m-404"))
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(err.to_string().contains("m-404"));
}

#[tokio::test]
async fn test_index_scene_posts_extraction_config() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/video/m-1/index/scene"))
        .and(body_partial_json(json!({
            "extraction_type": "shot",
            "extraction_config": {"threshold": 20, "min_scene_len": 15, "frame_count": 4},
            "prompt": "describe"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"scene_index_id": "idx-1"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let extraction = SceneExtraction::ShotBased {
        threshold: 20,
        min_scene_len: 15,
        frame_count: 4,
    };
    let id = client_for(&server)
        .index_scene(&VideoId::from("m-1"), &extraction, "describe")
        .await
        .unwrap();

    assert_eq!(id, SceneIndexId::from("idx-1"));
}

#[tokio::test]
async fn test_index_scene_conflict_is_not_transient() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/video/m-1/index/scene"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"success": false, "message": "Scene index already exists"})),
        )
        .mount(&server)
        .await;

    let extraction = SceneExtraction::ShotBased {
        threshold: 20,
        min_scene_len: 15,
        frame_count: 4,
    };
    let err = client_for(&server)
        .index_scene(&VideoId::from("m-1"), &extraction, "describe")
        .await
        .unwrap_err();

    assert!(matches!(err, VideoDbError::AlreadyExists(_)));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn test_processing_job_is_polled_until_done() {
    let server = MockServer::start().await;
    let output_url = format!("{}/async-response/job-1", server.uri());

    Mock::given(method("GET"))
        .and(path("/video/m-1/index/scene/idx-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "status": "processing",
            "data": {"output_url": output_url}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/async-response/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "status": "processing"
        })))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/async-response/job-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "status": "done",
            "response": {
                "scene_index_records": [
                    {"start": 0.0, "end": 5.0, "description": "empty porch"}
                ]
            }
        })))
        .mount(&server)
        .await;

    let records = client_for(&server)
        .get_scene_index(&VideoId::from("m-1"), &SceneIndexId::from("idx-1"))
        .await
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].description, "empty porch");
}

#[tokio::test]
async fn test_processing_job_times_out() {
    let server = MockServer::start().await;
    let output_url = format!("{}/async-response/stuck", server.uri());

    Mock::given(method("GET"))
        .and(path("/video/m-1/index/scene"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "status": "processing",
            "data": {"output_url": output_url}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/async-response/stuck"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "processing"})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .list_scene_index(&VideoId::from("m-1"))
        .await
        .unwrap_err();

    assert!(matches!(err, VideoDbError::Timeout(_)));
}

#[tokio::test]
async fn test_list_scene_index_keeps_service_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/video/m-1/index/scene"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"scene_indexes": [
                {"scene_index_id": "idx-new", "name": "latest", "status": "done"},
                {"scene_index_id": "idx-old", "status": "done"}
            ]}
        })))
        .mount(&server)
        .await;

    let indexes = client_for(&server)
        .list_scene_index(&VideoId::from("m-1"))
        .await
        .unwrap();

    assert_eq!(indexes[0].scene_index_id, SceneIndexId::from("idx-new"));
    assert_eq!(indexes[1].name, None);
}

#[tokio::test]
async fn test_semantic_search_sends_filters_and_keeps_service_shots() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/video/m-1/search"))
        .and(body_partial_json(json!({
            "index_type": "scene",
            "search_type": "semantic",
            "query": "delivery driver",
            "result_threshold": 5,
            "score_threshold": 0.2,
            "dynamic_score_percentage": 20.0,
            "scene_index_id": "idx-1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"results": [{
                "video_id": "m-1",
                "title": "Front door",
                "length": 300.0,
                "docs": [
                    {"start": 10.0, "end": 15.0, "score": 1.0, "text": "driver walks up"},
                    {"start": 40.0, "end": 44.0, "score": 0.9, "text": "driver rings bell"},
                    {"start": 80.0, "end": 90.0, "score": 0.85, "text": "parcel left at door"}
                ]
            }]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = SearchRequest {
        query: "delivery driver".to_string(),
        index_type: IndexType::Scene,
        scene_index_id: Some(SceneIndexId::from("idx-1")),
        filters: SearchFilters::default(),
    };
    let results = client_for(&server)
        .semantic_search(&VideoId::from("m-1"), &request)
        .await
        .unwrap();

    let texts: Vec<_> = results.shots().iter().map(|s| s.text.as_str()).collect();
    assert_eq!(
        texts,
        vec!["driver walks up", "driver rings bell", "parcel left at door"]
    );
    assert_eq!(results.shots()[2].search_score, 0.85);
    assert_eq!(results.shots()[0].video_title.as_deref(), Some("Front door"));
}

#[tokio::test]
async fn test_compile_posts_shots_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/compile"))
        .and(body_partial_json(json!([
            {"video_id": "m-1", "collection_id": "c-1", "shots": [[10.0, 15.0]]},
            {"video_id": "m-1", "collection_id": "c-1", "shots": [[40.0, 44.0]]}
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"stream_url": "https://stream/compiled.m3u8"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let shots = vec![
        director_videodb::Shot {
            video_id: VideoId::from("m-1"),
            video_title: None,
            video_length: None,
            start: 10.0,
            end: 15.0,
            text: "a".into(),
            search_score: 0.9,
        },
        director_videodb::Shot {
            video_id: VideoId::from("m-1"),
            video_title: None,
            video_length: None,
            start: 40.0,
            end: 44.0,
            text: "b".into(),
            search_score: 0.8,
        },
    ];

    let url = client_for(&server)
        .compile(&CollectionId::from("c-1"), &shots)
        .await
        .unwrap();

    assert_eq!(url, "https://stream/compiled.m3u8");
}

#[tokio::test]
async fn test_service_failure_envelope_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/compile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "compile quota exceeded"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .compile(&CollectionId::from("c-1"), &[])
        .await
        .unwrap_err();

    assert!(err.to_string().contains("compile quota exceeded"));
}
