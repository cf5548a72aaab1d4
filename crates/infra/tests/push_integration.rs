//! End-to-end tests: pusher → client → Transit encoder → reqwest → mock API
//!
//! **Coverage:**
//! - Happy path: records split into batches, each acknowledged in order
//! - Wire contract: content type, bearer token, client id, command shape
//! - Error statuses: 4xx aborts the push and reports committed records
//! - Validation: sample command sent to `import/validate`
//!
//! **Infrastructure:**
//! - WireMock HTTP server standing in for the Import API
//! - Real `HttpTransport` and `TransitJsonEncoder`

mod support;

use serde_json::{json, Value};
use stitch_domain::constants::TRANSIT_CONTENT_TYPE;
use stitch_domain::{Record, StitchError};
use stitch_infra::client_from_config;
use support::{config_for, pusher_for, received_batches, record, ACCESS_TOKEN, CLIENT_ID};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn users() -> Vec<Record> {
    vec![
        record(json!({"id": 1, "name": "a"})),
        record(json!({"id": 2, "name": "b"})),
        record(json!({"id": 3, "name": "c"})),
    ]
}

fn keys() -> Vec<String> {
    vec!["id".to_string()]
}

async fn mount_push(server: &MockServer, template: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/v2/import/push"))
        .and(header("Content-Type", TRANSIT_CONTENT_TYPE))
        .and(header("Authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn pushes_users_in_two_batches() {
    let server = MockServer::start().await;
    mount_push(
        &server,
        ResponseTemplate::new(201).set_body_json(json!({"status": "OK", "message": "Batch accepted"})),
    )
    .await;

    let mut seen: Vec<Vec<Record>> = Vec::new();
    let result = pusher_for(&server, 2)
        .push_records_with("users", &keys(), users(), |batch| seen.push(batch.to_vec()))
        .await
        .expect("push succeeds");

    assert_eq!(result, Some(json!({"status": "OK", "message": "Batch accepted"})));
    assert_eq!(seen, vec![users()[..2].to_vec(), users()[2..].to_vec()]);

    let batches = received_batches(&server).await;
    assert_eq!(batches.iter().map(Vec::len).collect::<Vec<_>>(), vec![2, 1]);

    let first = &batches[0][0];
    assert_eq!(first["action"], "upsert");
    assert_eq!(first["table_name"], "users");
    assert_eq!(first["key_names"], json!(["id"]));
    assert_eq!(first["data"], json!({"id": 1, "name": "a"}));
    assert_eq!(first["client_id"], json!(CLIENT_ID));
}

#[tokio::test]
async fn sequences_increase_across_batches() {
    let server = MockServer::start().await;
    mount_push(&server, ResponseTemplate::new(200).set_body_json(json!({"status": "OK"}))).await;

    let records: Vec<Record> = (0..5).map(|id| record(json!({"id": id}))).collect();
    pusher_for(&server, 2).push_records("events", &keys(), records).await.expect("push succeeds");

    let sequences: Vec<i64> = received_batches(&server)
        .await
        .iter()
        .flatten()
        .map(|command| command["sequence"].as_i64().expect("integer sequence"))
        .collect();

    assert_eq!(sequences.len(), 5);
    assert!(sequences.windows(2).all(|pair| pair[0] < pair[1]), "sequences {sequences:?}");
}

#[tokio::test]
async fn reserved_strings_are_transit_escaped() {
    let server = MockServer::start().await;
    mount_push(&server, ResponseTemplate::new(200).set_body_json(json!({"status": "OK"}))).await;

    pusher_for(&server, 0)
        .push_records("notes", &keys(), vec![record(json!({"id": 1, "body": "~home"}))])
        .await
        .expect("push succeeds");

    let batches = received_batches(&server).await;
    assert_eq!(batches[0][0]["data"]["body"], "~~home");
}

#[tokio::test]
async fn unauthorized_aborts_push() {
    let server = MockServer::start().await;
    mount_push(&server, ResponseTemplate::new(401).set_body_string("Not authorized")).await;

    let mut callbacks = 0;
    let err = pusher_for(&server, 2)
        .push_records_with("users", &keys(), users(), |_| callbacks += 1)
        .await
        .unwrap_err();

    assert_eq!(callbacks, 0);
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.committed_records(), Some(0));
    assert!(err.is_client_error());
    assert!(err.to_string().contains("Not authorized"));
    // the second batch is never sent
    assert_eq!(received_batches(&server).await.len(), 1);
}

#[tokio::test]
async fn failure_after_first_batch_reports_committed_records() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/import/push"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "OK"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v2/import/push"))
        .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
        .mount(&server)
        .await;

    let err = pusher_for(&server, 2).push_records("users", &keys(), users()).await.unwrap_err();

    match err {
        StitchError::BatchFailed { batch_index, committed_records, ref source } => {
            assert_eq!(batch_index, 1);
            assert_eq!(committed_records, 2);
            assert_eq!(source.status(), Some(503));
        }
        other => panic!("expected batch failure, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_input_makes_no_request() {
    let server = MockServer::start().await;
    mount_push(&server, ResponseTemplate::new(200)).await;

    let result = pusher_for(&server, 2)
        .push_records("users", &keys(), Vec::<Record>::new())
        .await
        .expect("push succeeds");

    assert_eq!(result, None);
    assert!(received_batches(&server).await.is_empty());
}

#[tokio::test]
async fn validate_sends_sample_command() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/import/validate"))
        .and(header("Authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "OK"})))
        .expect(1)
        .mount(&server)
        .await;

    let pusher = pusher_for(&server, 2);
    let result = pusher.client().validate(None, true).await.expect("validate succeeds");

    assert_eq!(result, json!({"status": "OK"}));

    let batches = received_batches(&server).await;
    let sample = &batches[0][0];
    assert_eq!(sample["table_name"], "test");
    assert_eq!(sample["key_names"], json!(["id"]));
    assert_eq!(sample["client_id"], json!(CLIENT_ID));
    assert!(sample["data"].is_object());
}

#[tokio::test]
async fn validate_rejection_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/import/validate"))
        .respond_with(ResponseTemplate::new(400).set_body_string("{\"error\":\"bad key\"}"))
        .mount(&server)
        .await;

    let err = pusher_for(&server, 2).client().validate(None, true).await.unwrap_err();

    match err {
        StitchError::Api { ref sub_path, status, ref body, .. } => {
            assert_eq!(sub_path, "import/validate");
            assert_eq!(status, 400);
            assert!(body.contains("bad key"));
        }
        other => panic!("expected api error, got {other:?}"),
    }
}

#[tokio::test]
async fn client_from_config_talks_to_configured_base_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/import/validate"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_from_config(&config_for(&server)).expect("client");
    let result = client.validate(None, true).await.expect("validate succeeds");

    assert_eq!(result, Value::Null);
}
