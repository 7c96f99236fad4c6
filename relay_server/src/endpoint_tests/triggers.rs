use actix_web::http::StatusCode;
use mockall::predicate::eq;
use relay_engine::{
    test_utils::{order, MemoryStorage, ScriptedForwarder, ScriptedOrderSource},
    ForwardResult,
    OrderId,
    OrderSourceError,
};
use serde_json::json;

use super::{
    helpers::{configure_with, json, post_request, relay, TARGET},
    mocks::MockOrderSource,
};

fn ids(ids: &[&str]) -> Vec<OrderId> {
    ids.iter().map(|s| OrderId::new(*s)).collect()
}

#[actix_web::test]
async fn poll_once_delivers_and_rejects() {
    let _ = env_logger::try_init().ok();
    let storage = MemoryStorage::new();
    let forwarder = ScriptedForwarder::new();
    forwarder.respond("102", ForwardResult::rejected(502, "rejected", Some(json!({"ok": false}))));
    let api = relay(ScriptedOrderSource::new(vec![order(101), order(102)]), &forwarder, &storage);

    let (status, body) = post_request("/run/poll-once", configure_with(api.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["ok"], true);
    assert_eq!(body["forwarded_attempts"], 2);
    assert_eq!(body["delivered"], 1);
    assert_eq!(
        body["results"][0],
        json!({
            "order_id": "101",
            "attempted": true,
            "delivered": true,
            "marked": true,
            "status": "delivered",
            "http_status": 200,
            "detail": "delivered",
            "target_response": {"ok": true}
        })
    );
    assert_eq!(body["results"][1]["order_id"], "102");
    assert_eq!(body["results"][1]["status"], "rejected");
    assert_eq!(body["results"][1]["http_status"], 502);
    assert_eq!(body["results"][1]["target_response"], json!({"ok": false}));
    assert_eq!(storage.saved(), Some(ids(&["101"])));

    let (_, body) = post_request("/run/poll-once", configure_with(api)).await;
    let body = json(&body);
    assert_eq!(body["forwarded_attempts"], 1);
    assert_eq!(body["results"][0]["status"], "already_sent");
    assert_eq!(body["results"][0]["attempted"], false);
    assert_eq!(forwarder.calls(), ids(&["101", "102", "102"]));
}

#[actix_web::test]
async fn poll_once_without_configuration() {
    let _ = env_logger::try_init().ok();
    let mut source = MockOrderSource::new();
    source
        .expect_list_recent()
        .times(1)
        .returning(|_| Err(OrderSourceError::Configuration("RELAY_COMMERCE_BASE_URL".into())));
    let forwarder = ScriptedForwarder::new();
    let api = relay(source, &forwarder, &MemoryStorage::new());
    let (status, body) = post_request("/run/poll-once", configure_with(api)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json(&body), json!({"ok": false, "error": "RELAY_COMMERCE_BASE_URL is required"}));
    assert!(forwarder.calls().is_empty());
}

#[actix_web::test]
async fn poll_once_upstream_failure() {
    let _ = env_logger::try_init().ok();
    let mut source = MockOrderSource::new();
    source
        .expect_list_recent()
        .with(eq(10))
        .returning(|_| Err(OrderSourceError::Upstream { status: 500, message: "boom".into() }));
    let storage = MemoryStorage::with_ids(&["1"]);
    let api = relay(source, &ScriptedForwarder::new(), &storage);
    let (status, body) = post_request("/run/poll-once", configure_with(api)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json(&body), json!({"ok": false, "error": "Commerce fetch failed (500): boom"}));
    assert_eq!(storage.write_count(), 0);
}

#[actix_web::test]
async fn forward_order_delivers() {
    let _ = env_logger::try_init().ok();
    let mut source = MockOrderSource::new();
    source.expect_fetch_by_id().with(eq(OrderId::new("42"))).times(1).returning(|_| Ok(order(42)));
    let storage = MemoryStorage::new();
    let forwarder = ScriptedForwarder::new();
    let api = relay(source, &forwarder, &storage);
    let (status, body) = post_request("/run/forward/42", configure_with(api)).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["ok"], true);
    assert_eq!(body["order_id"], "42");
    assert_eq!(body["status"], "delivered");
    assert_eq!(body["marked"], true);
    assert_eq!(body["target_response"], json!({"ok": true}));
    assert_eq!(storage.saved(), Some(ids(&["42"])));
}

#[actix_web::test]
async fn forward_order_ignores_the_ledger() {
    let _ = env_logger::try_init().ok();
    let storage = MemoryStorage::with_ids(&["42"]);
    let forwarder = ScriptedForwarder::new();
    let api = relay(ScriptedOrderSource::new(vec![order(42)]), &forwarder, &storage);
    let (status, _) = post_request("/run/forward/42", configure_with(api)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(forwarder.calls(), ids(&["42"]));
    assert_eq!(storage.saved(), Some(ids(&["42"])));
}

#[actix_web::test]
async fn forward_order_rejected() {
    let _ = env_logger::try_init().ok();
    let storage = MemoryStorage::new();
    let forwarder = ScriptedForwarder::new();
    forwarder.respond("42", ForwardResult::rejected(500, "Target responded with 500 Internal Server Error", None));
    let api = relay(ScriptedOrderSource::new(vec![order(42)]), &forwarder, &storage);
    let (status, body) = post_request("/run/forward/42", configure_with(api)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let body = json(&body);
    assert_eq!(body["ok"], false);
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["http_status"], 500);
    assert_eq!(body["detail"], "Target responded with 500 Internal Server Error");
    assert_eq!(storage.saved(), None);
}

#[actix_web::test]
async fn forward_order_unreachable_target() {
    let _ = env_logger::try_init().ok();
    let forwarder = ScriptedForwarder::new();
    forwarder.respond("7", ForwardResult::unreachable(format!("Target unreachable: {TARGET} refused the connection")));
    let api = relay(ScriptedOrderSource::new(vec![order(7)]), &forwarder, &MemoryStorage::new());
    let (status, body) = post_request("/run/forward/7", configure_with(api)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let body = json(&body);
    assert_eq!(body["status"], "unreachable");
    assert!(body.get("http_status").is_none());
}

#[actix_web::test]
async fn forward_unknown_order() {
    let _ = env_logger::try_init().ok();
    let forwarder = ScriptedForwarder::new();
    let api = relay(ScriptedOrderSource::default(), &forwarder, &MemoryStorage::new());
    let (status, body) = post_request("/run/forward/999", configure_with(api)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json(&body), json!({"ok": false, "error": "Order 999 was not found"}));
    assert!(forwarder.calls().is_empty());
}
