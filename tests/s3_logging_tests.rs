//! Tests for the S3 logging endpoint service.

use integrations_fastly::mocks::{fixtures, MockAuth, MockResponse, MockTransport};
use integrations_fastly::transport::{HttpMethod, TransportError};
use integrations_fastly::{
    CreateS3Input, DeleteS3Input, FastlyClient, FastlyError, GetS3Input, ListS3sInput,
    S3Redundancy, S3ServerSideEncryption, UpdateS3Input,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use test_case::test_case;

const SERVICE: &str = "7i6HN3TK9wS159v2gPAZ8A";

fn client() -> (FastlyClient, Arc<MockTransport>) {
    let transport = Arc::new(MockTransport::new());
    let client = FastlyClient::builder()
        .api_key("test-key")
        .transport(transport.clone())
        .auth(Arc::new(MockAuth::default()))
        .build()
        .unwrap();
    (client, transport)
}

#[tokio::test]
async fn test_list_returns_endpoints_sorted_by_name() {
    let (client, transport) = client();
    transport.queue_json(&fixtures::s3_list(SERVICE, 1, &["zeta", "alpha", "mid"]));

    let endpoints = client.s3().list(&ListS3sInput::new(SERVICE, 1)).await.unwrap();

    let names: Vec<&str> = endpoints.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["alpha", "mid", "zeta"]);

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, HttpMethod::Get);
    assert_eq!(request.path, format!("/service/{}/version/1/logging/s3", SERVICE));
    assert!(request.body.is_none());
}

#[tokio::test]
async fn test_list_sort_is_stable_for_equal_names() {
    let (client, transport) = client();
    transport.queue_json(&json!([
        {"name": "b", "bucket_name": "first"},
        {"name": "a"},
        {"name": "b", "bucket_name": "second"},
    ]));

    let endpoints = client.s3().list(&ListS3sInput::new(SERVICE, 1)).await.unwrap();

    let buckets: Vec<Option<&str>> = endpoints.iter().map(|e| e.bucket_name.as_deref()).collect();
    assert_eq!(buckets, vec![None, Some("first"), Some("second")]);
}

#[tokio::test]
async fn test_list_empty() {
    let (client, transport) = client();
    transport.queue_json(&json!([]));

    let endpoints = client.s3().list(&ListS3sInput::new(SERVICE, 4)).await.unwrap();
    assert!(endpoints.is_empty());
}

#[test_case("", 1 ; "empty service")]
#[test_case(SERVICE, 0 ; "zero version")]
#[tokio::test]
async fn test_list_rejects_missing_scope_without_request(service: &str, version: u32) {
    let (client, transport) = client();

    let result = client.s3().list(&ListS3sInput::new(service, version)).await;

    let error = result.unwrap_err();
    assert!(error.is_validation());
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_validation_checks_service_before_version_before_name() {
    let (client, transport) = client();

    let error = client.s3().get(&GetS3Input::new("", 0, "")).await.unwrap_err();
    assert!(matches!(error, FastlyError::MissingService));

    let error = client.s3().get(&GetS3Input::new(SERVICE, 0, "")).await.unwrap_err();
    assert!(matches!(error, FastlyError::MissingVersion));

    let error = client.s3().get(&GetS3Input::new(SERVICE, 1, "")).await.unwrap_err();
    assert!(matches!(error, FastlyError::MissingName));

    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_create_posts_form_body() {
    let (client, transport) = client();
    transport.queue_json(&fixtures::s3(SERVICE, 2, "access-logs"));

    let mut input = CreateS3Input::new(SERVICE, 2)
        .name("access-logs")
        .bucket_name("fastly-logs")
        .credentials("AKIA", "s3cr3t/key");
    input.period = Some(3600);
    input.redundancy = Some(S3Redundancy::Reduced);

    let endpoint = client.s3().create(&input).await.unwrap();
    assert_eq!(endpoint.name, "access-logs");
    assert_eq!(endpoint.version, 2);

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.path, format!("/service/{}/version/2/logging/s3", SERVICE));
    assert_eq!(
        request.headers.get("Content-Type").map(String::as_str),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(
        request.body_text(),
        "name=access-logs&bucket_name=fastly-logs&access_key=AKIA&secret_key=s3cr3t%2Fkey\
         &period=3600&redundancy=reduced_redundancy"
    );
}

#[test_case(CreateS3Input::new(SERVICE, 1) ; "name unset")]
#[test_case(CreateS3Input::new(SERVICE, 1).name("") ; "name empty")]
#[tokio::test]
async fn test_create_without_name_is_rejected(input: CreateS3Input) {
    let (client, transport) = client();

    let error = client.s3().create(&input).await.unwrap_err();

    assert!(matches!(error, FastlyError::MissingName));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_create_with_only_name_sends_name_only() {
    let (client, transport) = client();
    transport.queue_json(&fixtures::s3(SERVICE, 1, "bare"));

    client
        .s3()
        .create(&CreateS3Input::new(SERVICE, 1).name("bare"))
        .await
        .unwrap();

    assert_eq!(transport.last_request().unwrap().body_text(), "name=bare");
}

#[tokio::test]
async fn test_create_kms_without_key_is_rejected() {
    let (client, transport) = client();

    let input = CreateS3Input::new(SERVICE, 1)
        .name("encrypted")
        .server_side_encryption(S3ServerSideEncryption::Kms);
    let error = client.s3().create(&input).await.unwrap_err();

    assert!(matches!(error, FastlyError::MissingKmsKeyId));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_create_kms_with_key_is_sent() {
    let (client, transport) = client();
    transport.queue_json(&json!({
        "service_id": SERVICE,
        "version": 1,
        "name": "encrypted",
        "server_side_encryption": "aws:kms",
        "server_side_encryption_kms_key_id": "1234"
    }));

    let input = CreateS3Input::new(SERVICE, 1)
        .name("encrypted")
        .server_side_encryption(S3ServerSideEncryption::Kms)
        .kms_key_id("1234");
    let endpoint = client.s3().create(&input).await.unwrap();

    assert_eq!(endpoint.server_side_encryption, Some(S3ServerSideEncryption::Kms));
    assert_eq!(
        transport.last_request().unwrap().body_text(),
        "name=encrypted&server_side_encryption_kms_key_id=1234&server_side_encryption=aws%3Akms"
    );
}

#[tokio::test]
async fn test_get_escapes_name_in_path() {
    let (client, transport) = client();
    transport.queue_json(&fixtures::s3(SERVICE, 3, "logs/with space"));

    let endpoint = client
        .s3()
        .get(&GetS3Input::new(SERVICE, 3, "logs/with space"))
        .await
        .unwrap();

    assert_eq!(endpoint.name, "logs/with space");
    assert_eq!(
        transport.last_request().unwrap().path,
        format!("/service/{}/version/3/logging/s3/logs%2Fwith%20space", SERVICE)
    );
}

#[tokio::test]
async fn test_get_escapes_semicolon_and_comma() {
    let (client, transport) = client();
    transport.queue_json(&fixtures::s3(SERVICE, 3, "a;b,c"));

    client
        .s3()
        .get(&GetS3Input::new(SERVICE, 3, "a;b,c"))
        .await
        .unwrap();

    assert_eq!(
        transport.last_request().unwrap().path,
        format!("/service/{}/version/3/logging/s3/a%3Bb%2Cc", SERVICE)
    );
}

#[tokio::test]
async fn test_get_decodes_string_numbers_and_timestamps() {
    let (client, transport) = client();
    transport.queue_json(&json!({
        "service_id": SERVICE,
        "version": "3",
        "name": "access-logs",
        "period": "3600",
        "gzip_level": "",
        "format_version": 2,
        "redundancy": "standard",
        "server_side_encryption": "",
        "created_at": "2020-06-01T12:00:00Z",
        "updated_at": null
    }));

    let endpoint = client
        .s3()
        .get(&GetS3Input::new(SERVICE, 3, "access-logs"))
        .await
        .unwrap();

    assert_eq!(endpoint.version, 3);
    assert_eq!(endpoint.period, 3600);
    assert_eq!(endpoint.gzip_level, 0);
    assert_eq!(endpoint.format_version, 2);
    assert_eq!(endpoint.redundancy, Some(S3Redundancy::Standard));
    assert_eq!(endpoint.server_side_encryption, None);
    assert!(endpoint.created_at.is_some());
    assert!(endpoint.updated_at.is_none());
}

#[tokio::test]
async fn test_get_not_found() {
    let (client, transport) = client();
    transport.queue_error(404, "Record not found");

    let error = client
        .s3()
        .get(&GetS3Input::new(SERVICE, 1, "missing"))
        .await
        .unwrap_err();

    match error {
        FastlyError::NotFound { message } => assert_eq!(message, "Record not found"),
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_update_puts_rename_under_name_key() {
    let (client, transport) = client();
    transport.queue_json(&fixtures::s3(SERVICE, 1, "renamed"));

    let mut input = UpdateS3Input::new(SERVICE, 1, "old name").new_name("renamed");
    input.gzip_level = Some(9);

    let endpoint = client.s3().update(&input).await.unwrap();
    assert_eq!(endpoint.name, "renamed");

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, HttpMethod::Put);
    assert_eq!(
        request.path,
        format!("/service/{}/version/1/logging/s3/old%20name", SERVICE)
    );
    assert_eq!(request.body_text(), "name=renamed&gzip_level=9");
}

#[tokio::test]
async fn test_update_kms_without_key_is_rejected() {
    let (client, transport) = client();

    let input = UpdateS3Input::new(SERVICE, 1, "encrypted")
        .server_side_encryption(S3ServerSideEncryption::Kms)
        .kms_key_id("");
    let error = client.s3().update(&input).await.unwrap_err();

    assert!(matches!(error, FastlyError::MissingKmsKeyId));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_update_missing_name_is_rejected() {
    let (client, transport) = client();

    let input = UpdateS3Input::new(SERVICE, 1, "").new_name("renamed");
    let error = client.s3().update(&input).await.unwrap_err();

    assert!(matches!(error, FastlyError::MissingName));
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_delete_ok() {
    let (client, transport) = client();
    transport.queue(MockResponse::status_ok());

    client
        .s3()
        .delete(&DeleteS3Input::new(SERVICE, 5, "access-logs"))
        .await
        .unwrap();

    let request = transport.last_request().unwrap();
    assert_eq!(request.method, HttpMethod::Delete);
    assert_eq!(
        request.path,
        format!("/service/{}/version/5/logging/s3/access-logs", SERVICE)
    );
}

#[tokio::test]
async fn test_delete_not_ok_status_is_error() {
    let (client, transport) = client();
    transport.queue_json(&json!({"status": "error", "msg": "Version is locked"}));

    let error = client
        .s3()
        .delete(&DeleteS3Input::new(SERVICE, 5, "access-logs"))
        .await
        .unwrap_err();

    match error {
        FastlyError::NotOk { message } => assert_eq!(message, "Version is locked"),
        other => panic!("Expected NotOk, got {:?}", other),
    }
}

#[tokio::test]
async fn test_delete_not_ok_without_message_reports_status() {
    let (client, transport) = client();
    transport.queue_json(&json!({"status": "pending"}));

    let error = client
        .s3()
        .delete(&DeleteS3Input::new(SERVICE, 5, "access-logs"))
        .await
        .unwrap_err();

    assert!(matches!(error, FastlyError::NotOk { message } if message == "pending"));
}

#[test_case(401, "authentication" ; "unauthorized")]
#[test_case(403, "authentication" ; "forbidden")]
#[test_case(404, "not_found" ; "not found")]
#[test_case(409, "api" ; "conflict")]
#[test_case(503, "api" ; "unavailable")]
#[tokio::test]
async fn test_error_statuses_are_mapped(status: u16, kind: &str) {
    let (client, transport) = client();
    transport.queue_error(status, "failure");

    let error = client
        .s3()
        .delete(&DeleteS3Input::new(SERVICE, 1, "access-logs"))
        .await
        .unwrap_err();

    assert_eq!(error.kind(), kind);
    assert_eq!(error.status_code(), Some(status));
}

#[tokio::test]
async fn test_transport_timeout_is_reported() {
    let (client, transport) = client();
    transport.queue_failure(TransportError::Timeout {
        timeout: Duration::from_secs(30),
    });

    let error = client.s3().list(&ListS3sInput::new(SERVICE, 1)).await.unwrap_err();
    assert!(matches!(error, FastlyError::Timeout { .. }));
}

#[tokio::test]
async fn test_metrics_record_operations_and_errors() {
    let (client, transport) = client();
    transport.queue_json(&json!([]));
    transport.queue_error(404, "Record not found");

    client.s3().list(&ListS3sInput::new(SERVICE, 1)).await.unwrap();
    let _ = client.s3().get(&GetS3Input::new(SERVICE, 1, "gone")).await;
    let _ = client.s3().get(&GetS3Input::new("", 1, "gone")).await;

    // Inputs rejected by validation never reach the metrics.
    let metrics = client.metrics().get_metrics();
    assert_eq!(metrics.total_requests, 2);
    assert_eq!(metrics.successful_requests, 1);
    assert_eq!(metrics.failed_requests, 1);
    assert_eq!(metrics.calls("s3.list"), 1);
    assert_eq!(metrics.calls("s3.get"), 1);
    assert_eq!(metrics.operations["s3.get"].failures, 1);
    assert_eq!(metrics.errors.get("not_found"), Some(&1));
    assert_eq!(metrics.errors.get("validation"), None);
}
