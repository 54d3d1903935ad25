//! Batch uploader aggregation against a mock HTTP server.

use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;

use common::document::CorpusDocument;
use prism_client::{import_documents_in_batches, ImportFailure, PrismClient, UploadOptions};

fn client_for(server: &MockServer) -> PrismClient {
    PrismClient::new(&server.base_url(), Duration::from_secs(5)).expect("client")
}

fn documents(count: usize) -> Vec<CorpusDocument> {
    (0..count)
        .map(|idx| CorpusDocument {
            title: format!("Doc {idx}"),
            content: "content".to_string(),
            domain: "bible/kjv".to_string(),
            metadata: json!({}),
        })
        .collect()
}

fn test_options(batch_size: usize) -> UploadOptions {
    UploadOptions {
        batch_size,
        embed: true,
        batch_pause: Duration::ZERO,
    }
}

async fn mock_health(server: &MockServer, status: u16) {
    server
        .mock_async(move |when, then| {
            when.method(GET).path("/health");
            then.status(status);
        })
        .await;
}

#[tokio::test]
async fn ten_documents_with_batch_size_five_issue_two_batches() {
    let server = MockServer::start_async().await;
    mock_health(&server, 200).await;
    let import = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/corpus/import");
            then.status(200).json_body(json!({
                "total": 5, "imported": 5, "failed": 0, "results": []
            }));
        })
        .await;

    let report = import_documents_in_batches(
        &client_for(&server),
        &documents(10),
        &test_options(5),
    )
    .await
    .expect("report");

    assert_eq!(import.hits_async().await, 2);
    assert_eq!(report.total_documents, 10);
    assert_eq!(report.total_batches, 2);
    assert_eq!(report.success_count, 10);
    assert_eq!(report.error_count, 0);
    assert!(report.failures.is_empty());
}

#[tokio::test]
async fn failed_health_check_aborts_before_any_batch() {
    let server = MockServer::start_async().await;
    mock_health(&server, 503).await;
    let import = server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/corpus/import");
            then.status(200).json_body(json!({}));
        })
        .await;

    let err = import_documents_in_batches(
        &client_for(&server),
        &documents(3),
        &test_options(2),
    )
    .await
    .expect_err("should fail");

    assert!(err.to_string().contains("not accessible"));
    assert_eq!(import.hits_async().await, 0);
}

#[tokio::test]
async fn batch_failure_is_recorded_and_run_continues() {
    let server = MockServer::start_async().await;
    mock_health(&server, 200).await;

    // First batch fails at the HTTP layer, second succeeds.
    let failing = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/corpus/import")
                .json_body_partial(r#"{"documents": [{"title": "Doc 0"}]}"#);
            then.status(500);
        })
        .await;
    let succeeding = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/corpus/import")
                .json_body_partial(r#"{"documents": [{"title": "Doc 2"}]}"#);
            then.status(200).json_body(json!({
                "total": 2, "imported": 2, "failed": 0, "results": []
            }));
        })
        .await;

    let report = import_documents_in_batches(
        &client_for(&server),
        &documents(4),
        &test_options(2),
    )
    .await
    .expect("report");

    assert_eq!(failing.hits_async().await, 1);
    assert_eq!(succeeding.hits_async().await, 1);
    assert_eq!(report.success_count, 2);
    assert_eq!(report.error_count, 2);
    assert_eq!(report.failures.len(), 1);
    match &report.failures[0] {
        ImportFailure::Batch { batch, message } => {
            assert_eq!(*batch, 1);
            assert!(message.contains("Batch 1 failed"));
        }
        other => panic!("expected batch failure, got {other:?}"),
    }
}

#[tokio::test]
async fn per_document_failures_are_harvested_from_responses() {
    let server = MockServer::start_async().await;
    mock_health(&server, 200).await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/corpus/import");
            then.status(200).json_body(json!({
                "total": 3,
                "imported": 2,
                "failed": 1,
                "results": [
                    {"title": "Doc 0", "success": true},
                    {"title": "Doc 1", "success": false, "error": "duplicate title"},
                    {"title": "Doc 2", "success": true}
                ]
            }));
        })
        .await;

    let report = import_documents_in_batches(
        &client_for(&server),
        &documents(3),
        &test_options(3),
    )
    .await
    .expect("report");

    assert_eq!(report.success_count, 2);
    assert_eq!(report.error_count, 1);
    assert_eq!(report.failures.len(), 1);
    match &report.failures[0] {
        ImportFailure::Document { title, message } => {
            assert_eq!(title, "Doc 1");
            assert_eq!(message, "duplicate title");
        }
        other => panic!("expected document failure, got {other:?}"),
    }
}

#[tokio::test]
async fn zero_batch_size_is_a_contract_violation() {
    let server = MockServer::start_async().await;
    mock_health(&server, 200).await;

    let err = import_documents_in_batches(
        &client_for(&server),
        &documents(1),
        &test_options(0),
    )
    .await
    .expect_err("should fail");

    assert!(err.to_string().contains("between 1 and 100"));
}

#[tokio::test]
async fn oversized_batch_size_is_a_contract_violation() {
    let server = MockServer::start_async().await;

    let err = import_documents_in_batches(
        &client_for(&server),
        &documents(1),
        &test_options(101),
    )
    .await
    .expect_err("should fail");

    assert!(err.to_string().contains("between 1 and 100"));
}

#[tokio::test]
async fn empty_document_list_yields_an_empty_report() {
    let server = MockServer::start_async().await;
    mock_health(&server, 200).await;

    let report = import_documents_in_batches(&client_for(&server), &[], &test_options(10))
        .await
        .expect("report");

    assert_eq!(report.total_documents, 0);
    assert_eq!(report.total_batches, 0);
    assert_eq!(report.success_count + report.error_count, 0);
}
