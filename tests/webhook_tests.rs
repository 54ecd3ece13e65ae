//! # Webhook Tests
//!
//! Posts AdmissionReviews to the webhook router and inspects the responses.

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use common::{alicloud_binding, dynamic_secret, invalid_reader, valid_reader, MockSecretReader};
use secretbinding_validator::admission::{
    create_webhook_router, SecretBindingValidator, Validator, WebhookState,
};
use secretbinding_validator::constants::SECRET_BINDING_WEBHOOK_PATH;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn review(operation: &str, object: Value, old_object: Value) -> Value {
    json!({
        "apiVersion": "admission.k8s.io/v1",
        "kind": "AdmissionReview",
        "request": {
            "uid": "705ab4f5-6393-11e8-b7cc-42010a800002",
            "kind": { "group": "core.gardener.cloud", "version": "v1beta1", "kind": "SecretBinding" },
            "resource": { "group": "core.gardener.cloud", "version": "v1beta1", "resource": "secretbindings" },
            "requestKind": { "group": "core.gardener.cloud", "version": "v1beta1", "kind": "SecretBinding" },
            "requestResource": { "group": "core.gardener.cloud", "version": "v1beta1", "resource": "secretbindings" },
            "name": "my-binding",
            "namespace": "garden-dev",
            "operation": operation,
            "userInfo": { "username": "admin" },
            "object": object,
            "oldObject": old_object,
            "dryRun": false,
            "options": null
        }
    })
}

fn binding_json() -> Value {
    serde_json::to_value(alicloud_binding().to_dynamic().unwrap()).unwrap()
}

async fn send(validator: Arc<dyn Validator>, body: &Value) -> (StatusCode, Vec<u8>) {
    let router = create_webhook_router(Arc::new(WebhookState::new(validator)));
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(SECRET_BINDING_WEBHOOK_PATH)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn post(validator: Arc<dyn Validator>, body: &Value) -> (StatusCode, Value) {
    let (status, bytes) = send(validator, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_create_with_valid_secret_is_allowed() {
    let validator = Arc::new(SecretBindingValidator::new(valid_reader()));

    let (status, body) = post(validator.clone(), &review("CREATE", binding_json(), Value::Null)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"]["allowed"], true);
    assert_eq!(body["response"]["uid"], "705ab4f5-6393-11e8-b7cc-42010a800002");
    assert_eq!(validator.reader().calls().len(), 1);
}

#[tokio::test]
async fn test_create_with_invalid_secret_is_denied_with_reason() {
    let validator = Arc::new(SecretBindingValidator::new(invalid_reader()));

    let (status, body) = post(validator, &review("CREATE", binding_json(), Value::Null)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"]["allowed"], false);
    let message = body["response"]["status"]["message"].as_str().unwrap();
    assert!(message.starts_with("[InvalidCredentials]"));
    assert!(message.contains("accessKeyID"));
}

#[tokio::test]
async fn test_fetch_failure_is_denied() {
    let validator = Arc::new(SecretBindingValidator::new(MockSecretReader::failing()));

    let (_, body) = post(validator, &review("CREATE", binding_json(), Value::Null)).await;

    assert_eq!(body["response"]["allowed"], false);
    assert_eq!(
        body["response"]["status"]["message"],
        "[SecretFetchFailed] fake err"
    );
}

#[tokio::test]
async fn test_update_without_type_change_is_allowed() {
    let validator = Arc::new(SecretBindingValidator::new(MockSecretReader::failing()));

    let (_, body) = post(validator.clone(), &review("UPDATE", binding_json(), binding_json())).await;

    assert_eq!(body["response"]["allowed"], true);
    assert!(validator.reader().calls().is_empty());
}

#[tokio::test]
async fn test_wrong_object_type_is_denied() {
    let validator = Arc::new(SecretBindingValidator::new(valid_reader()));
    let secret = serde_json::to_value(dynamic_secret()).unwrap();

    let (_, body) = post(validator, &review("CREATE", secret, Value::Null)).await;

    assert_eq!(body["response"]["allowed"], false);
    assert_eq!(
        body["response"]["status"]["message"],
        "[WrongObjectType] wrong object type v1, Kind=Secret"
    );
}

#[tokio::test]
async fn test_delete_is_allowed_without_validation() {
    let validator = Arc::new(SecretBindingValidator::new(MockSecretReader::failing()));

    let (_, body) = post(validator.clone(), &review("DELETE", Value::Null, binding_json())).await;

    assert_eq!(body["response"]["allowed"], true);
    assert!(validator.reader().calls().is_empty());
}

#[tokio::test]
async fn test_missing_object_is_denied() {
    let validator = Arc::new(SecretBindingValidator::new(valid_reader()));

    let (_, body) = post(validator, &review("CREATE", Value::Null, Value::Null)).await;

    assert_eq!(body["response"]["allowed"], false);
    let message = body["response"]["status"]["message"].as_str().unwrap();
    assert!(message.starts_with("[InvalidRequest]"));
}

#[tokio::test]
async fn test_review_without_request_is_bad_request() {
    let validator = Arc::new(SecretBindingValidator::new(valid_reader()));
    let body = json!({ "apiVersion": "admission.k8s.io/v1", "kind": "AdmissionReview" });

    let (status, _) = send(validator, &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
