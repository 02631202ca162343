// SPDX-FileCopyrightText: 2026 Tokenpay Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Full-stack tests: HTTP gateway → purchase service → HTTP verifier (mocked
//! upstream) → SQLite ledger on disk.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tokenpay_config::load_config_from_str;
use tokenpay_core::StorageAdapter;
use tokenpay_gateway::{GatewayState, ServerConfig, router};
use tokenpay_purchase::PurchaseService;
use tokenpay_storage::SqliteStorage;
use tokenpay_verifier::HttpProviderAdapter;
use tower::ServiceExt;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "e2e-token";

struct Stack {
    app: axum::Router,
    storage: Arc<SqliteStorage>,
    _dir: tempfile::TempDir,
}

async fn stack(upstream: &MockServer) -> Stack {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("tokenpay.db");
    let toml = format!(
        r#"
[gateway]
bearer_token = "{TOKEN}"

[storage]
database_path = "{}"

[verifier]
base_url = "{}"
api_key = "vk-e2e"
timeout_secs = 5

[defaults]
platform_owner_full_name = "Abebe Kebede"
cbe_account_suffix = "12345678"
"#,
        db_path.display(),
        upstream.uri()
    );
    let config = load_config_from_str(&toml).unwrap();

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await.unwrap();
    let verifier = Arc::new(HttpProviderAdapter::new(&config.verifier).unwrap());
    let service = Arc::new(PurchaseService::new(
        verifier,
        storage.clone(),
        config.defaults.to_user_config(),
        Duration::from_secs(config.verifier.timeout_secs),
    ));

    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
        bearer_token: config.gateway.bearer_token.clone(),
        max_concurrent_requests: config.gateway.max_concurrent_requests,
    };
    Stack {
        app: router(&server_config, GatewayState::new(service)),
        storage,
        _dir: dir,
    }
}

async fn purchase(app: &axum::Router, user: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post("/v1/purchases")
        .header("authorization", format!("Bearer {TOKEN}"))
        .header("x-user-id", user)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn telebirr_purchase_end_to_end() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verify-telebirr"))
        .and(header("x-api-key", "vk-e2e"))
        .and(body_json(json!({"reference": "CE1234ABCD"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "data": {
                "reference": "CE1234ABCD",
                "amount": "200.00 Birr",
                "payerName": "Sara Tesfaye",
                "receiverName": "ABEBE  KEBEDE",
                "txnDate": "2026-03-01 10:00:00",
                "statusText": "Completed"
            }
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let s = stack(&upstream).await;
    let body = json!({"provider": "telebirr", "reference": "CE1234ABCD", "packageId": 2});

    let (status, credited) = purchase(&s.app, "user-1", body.clone()).await;
    assert_eq!(status, StatusCode::OK, "{credited}");
    assert_eq!(credited["credited"], 200);
    assert_eq!(credited["tokens"], 200);

    let (status, again) = purchase(&s.app, "user-1", body).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(again["kind"], "CONFLICT");

    let stored = s
        .storage
        .find_receipt(tokenpay_core::Provider::Telebirr, "CE1234ABCD")
        .await
        .unwrap()
        .expect("receipt persisted");
    assert_eq!(stored.user_id, "user-1");
    assert_eq!(stored.status.as_deref(), Some("Completed"));
    assert_eq!(stored.credited_tokens, 200);
    assert!(stored.raw_data.contains("\"receiverName\":\"ABEBE  KEBEDE\""));
}

#[tokio::test]
async fn cbe_purchase_uses_default_suffix() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verify-cbe"))
        .and(body_json(json!({"reference": "FT24330ABCDE", "accountSuffix": "12345678"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "data": {
                "reference": "FT24330ABCDE",
                "amount": 50,
                "payerName": "Sara Tesfaye",
                "receiverName": "Someone Else PLC",
                "receiverAccount": "1****6789",
                "txnDate": "2026-03-01"
            }
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let s = stack(&upstream).await;
    let (status, credited) = purchase(
        &s.app,
        "user-1",
        json!({"provider": "cbe", "reference": "FT24330ABCDE", "packageId": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{credited}");
    assert_eq!(s.storage.token_balance("user-1").await.unwrap(), 50);
}

#[tokio::test]
async fn upstream_rejection_is_bad_request_and_outage_is_internal() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/verify-telebirr"))
        .and(body_json(json!({"reference": "CE0000404"})))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "ok": false,
            "error": "Receipt not found"
        })))
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/verify-telebirr"))
        .and(body_json(json!({"reference": "CE0000503"})))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&upstream)
        .await;

    let s = stack(&upstream).await;

    let (status, err) = purchase(
        &s.app,
        "user-1",
        json!({"provider": "telebirr", "reference": "CE0000404", "packageId": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["message"], "Receipt not found");

    let (status, err) = purchase(
        &s.app,
        "user-1",
        json!({"provider": "telebirr", "reference": "CE0000503", "packageId": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(err, json!({"kind": "INTERNAL", "message": "internal error"}));
    assert_eq!(s.storage.token_balance("user-1").await.unwrap(), 0);
}
