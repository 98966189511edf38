//! Contract tests for `LinkingServiceClient` and `GateClient` against
//! wiremock servers.
//!
//! | Client | Method | Path | Test |
//! |--------|--------|------|------|
//! | linking | POST | `/post-deferred-linking-token` | `linking_*` |
//! | gate | POST | `/saveOptions` | `save_options_*` |
//! | gate | POST | `/deferredLinking` | `deferred_linking_*` |
//! | gate | POST | `/verify` | `verify_*` |
//! | gate | POST | `/v1/request` | `request_preview_*` |

use disclose_client::{
    ClientConfig, ClientError, DeferredLinkRequest, GateClient, LinkingServiceClient,
    VerifyResponse,
};
use disclose_core::{build_request, universal_link, AppMetadata, FailedCheck, SubjectId, VerificationConfig};
use disclose_zkp::PartialSubmission;
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn linking(server: &MockServer) -> LinkingServiceClient {
    LinkingServiceClient::new(ClientConfig::parse(&server.uri()).unwrap()).expect("client")
}

fn gate(server: &MockServer) -> GateClient {
    GateClient::new(ClientConfig::parse(&server.uri()).unwrap()).expect("client")
}

fn link_request() -> DeferredLinkRequest {
    DeferredLinkRequest {
        campaign_id: "self-playground".into(),
        campaign_user_id: "u-1".into(),
        self_app: "{\"appName\":\"Self Playground\"}".into(),
    }
}

// ── Linking service ─────────────────────────────────────────────────

#[tokio::test]
async fn linking_returns_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/post-deferred-linking-token"))
        .and(body_json(json!({
            "campaign_id": "self-playground",
            "campaign_user_id": "u-1",
            "self_app": "{\"appName\":\"Self Playground\"}"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": "tok-123"})))
        .expect(1)
        .mount(&server)
        .await;

    let token = linking(&server).fetch_token(&link_request()).await.unwrap();
    assert_eq!(token.unwrap().as_str(), "tok-123");
}

#[tokio::test]
async fn linking_empty_token_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/post-deferred-linking-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": ""})))
        .mount(&server)
        .await;

    assert!(linking(&server).fetch_token(&link_request()).await.unwrap().is_none());
}

#[tokio::test]
async fn linking_non_2xx_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/post-deferred-linking-token"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .expect(1)
        .mount(&server)
        .await;

    let err = linking(&server).fetch_token(&link_request()).await.unwrap_err();
    assert_eq!(err.status(), Some(503));
}

// ── Gate ────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_options_posts_normalized_config() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/saveOptions"))
        .and(body_partial_json(json!({
            "subjectId": "u-9",
            "options": {"nationality": true, "ofac": true}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Options saved successfully"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = VerificationConfig::playground_default();
    config.minimum_age = Some(0);
    gate(&server)
        .save_options(&SubjectId::new("u-9").unwrap(), &config)
        .await
        .unwrap();

    let received = &server.received_requests().await.unwrap()[0];
    let body: serde_json::Value = serde_json::from_slice(&received.body).unwrap();
    assert!(body["options"].get("minimumAge").is_none());
}

#[tokio::test]
async fn save_options_rejection_surfaces_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/saveOptions"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error": {"code": "VALIDATION_ERROR", "message": "Maximum 40 countries can be excluded"}
        })))
        .mount(&server)
        .await;

    let err = gate(&server)
        .save_options(&SubjectId::new("u-9").unwrap(), &VerificationConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 422, .. }));
}

#[tokio::test]
async fn deferred_linking_reads_data_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/deferredLinking"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": "tok-9"})))
        .mount(&server)
        .await;

    let token = gate(&server).deferred_linking(&link_request()).await.unwrap();
    assert_eq!(token.unwrap().as_str(), "tok-9");
}

#[tokio::test]
async fn verify_parses_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verify"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "result": true,
            "credentialSubject": {"nationality": "FRA", "name": "Not disclosed"},
            "verificationOptions": {"minimumAge": 18, "ofac": true, "excludedCountries": ["IRN"]}
        })))
        .mount(&server)
        .await;

    match gate(&server).verify(&PartialSubmission::default()).await.unwrap() {
        VerifyResponse::Success(success) => {
            assert_eq!(success.credential_subject["nationality"], "FRA");
            assert_eq!(success.verification_options.minimum_age, Some(18));
        }
        other => panic!("expected success, got {other:?}"),
    }
}

#[tokio::test]
async fn verify_parses_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verify"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": "error",
            "result": false,
            "message": "Verification failed",
            "failedCheck": "age",
            "details": {"isValid": true, "isMinimumAgeValid": false, "isOfacValid": true}
        })))
        .mount(&server)
        .await;

    match gate(&server).verify(&PartialSubmission::default()).await.unwrap() {
        VerifyResponse::Failure(failure) => {
            assert_eq!(failure.failed_check, FailedCheck::Age);
            assert!(!failure.details.is_minimum_age_valid);
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn verify_missing_fields_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verify"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": "BAD_REQUEST", "message": "Proof, publicSignals, attestationId and userContextData are required"}
        })))
        .mount(&server)
        .await;

    let err = gate(&server).verify(&PartialSubmission::default()).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn request_preview_posts_options_and_parses_reply() {
    let server = MockServer::start().await;
    let subject = SubjectId::new("u-7").unwrap();
    let config = VerificationConfig::playground_default();
    let request = build_request(&AppMetadata::playground(), &subject, &config);
    Mock::given(method("POST"))
        .and(path("/v1/request"))
        .and(body_partial_json(json!({
            "subjectId": "u-7",
            "options": { "nationality": true, "minimumAge": 18 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "request": request,
            "link": universal_link(&request),
            "digest": request.digest().to_hex(),
        })))
        .expect(1)
        .mount(&server)
        .await;

    let preview = gate(&server).request_preview(&subject, &config).await.unwrap();
    assert_eq!(preview.request, request);
    assert_eq!(preview.digest.len(), 64);
    assert!(preview.link.starts_with("https://redirect.self.xyz?selfApp="));
}

#[tokio::test]
async fn request_preview_rejection_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/request"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error": {"code": "VALIDATION_ERROR", "message": "Maximum 40 countries can be excluded"}
        })))
        .mount(&server)
        .await;

    let err = gate(&server)
        .request_preview(&SubjectId::new("u-7").unwrap(), &VerificationConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 422, .. }));
}
