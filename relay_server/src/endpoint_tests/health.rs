use actix_web::http::StatusCode;
use relay_engine::{
    test_utils::{order, MemoryStorage, ScriptedForwarder, ScriptedOrderSource},
    OrderSourceError,
};
use serde_json::json;

use super::helpers::{configure_with, get_request, json, post_request, relay, TARGET};

#[actix_web::test]
async fn health_reports_ledger_and_target() {
    let _ = env_logger::try_init().ok();
    let storage = MemoryStorage::with_ids(&["5", "6"]);
    let api = relay(ScriptedOrderSource::default(), &ScriptedForwarder::new(), &storage);
    let (status, body) = get_request("/health", configure_with(api)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json(&body),
        json!({
            "ok": true,
            "sent_count": 2,
            "ledger_pending": false,
            "target_url": TARGET,
            "sent_file": "memory",
            "poll_interval_ms": 15000,
            "last_cycle": null
        })
    );
}

#[actix_web::test]
async fn health_shows_the_last_cycle() {
    let _ = env_logger::try_init().ok();
    let storage = MemoryStorage::new();
    let api = relay(ScriptedOrderSource::new(vec![order(2), order(1)]), &ScriptedForwarder::new(), &storage);
    let (status, _) = post_request("/run/poll-once", configure_with(api.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get_request("/health", configure_with(api)).await;
    let health = json(&body);
    assert_eq!(health["sent_count"], 2);
    let cycle = &health["last_cycle"];
    assert_eq!(cycle["trigger"], "manual");
    assert_eq!(cycle["orders_seen"], 2);
    assert_eq!(cycle["attempted"], 2);
    assert_eq!(cycle["delivered"], 2);
    assert_eq!(cycle["not_marked"], 0);
    assert!(cycle.get("error").is_none());
    assert!(cycle["finished_at"].is_string());
}

#[actix_web::test]
async fn health_shows_a_failed_cycle() {
    let _ = env_logger::try_init().ok();
    let source = ScriptedOrderSource::new(vec![order(1)]);
    source.fail_with(Some(OrderSourceError::Upstream { status: 503, message: "maintenance".into() }));
    let api = relay(source, &ScriptedForwarder::new(), &MemoryStorage::new());
    let (status, _) = post_request("/run/poll-once", configure_with(api.clone())).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let (status, body) = get_request("/health", configure_with(api)).await;
    assert_eq!(status, StatusCode::OK);
    let health = json(&body);
    assert_eq!(health["ok"], true);
    assert_eq!(health["sent_count"], 0);
    assert_eq!(health["last_cycle"]["error"], "Commerce fetch failed (503): maintenance");
}
