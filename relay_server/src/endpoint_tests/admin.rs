use actix_web::http::StatusCode;
use relay_engine::{
    test_utils::{MemoryStorage, ScriptedForwarder, ScriptedOrderSource},
    OrderId,
};
use serde_json::json;

use super::helpers::{configure_with, get_request, json, post_request, relay};

#[actix_web::test]
async fn sent_ids_in_insertion_order() {
    let _ = env_logger::try_init().ok();
    let storage = MemoryStorage::with_ids(&["3", "1", "2"]);
    let api = relay(ScriptedOrderSource::default(), &ScriptedForwarder::new(), &storage);
    let (status, body) = get_request("/admin/sent", configure_with(api)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), json!({"ok": true, "sent_order_ids": ["3", "1", "2"]}));
}

#[actix_web::test]
async fn reset_clears_the_ledger() {
    let _ = env_logger::try_init().ok();
    let storage = MemoryStorage::with_ids(&["3", "1"]);
    let api = relay(ScriptedOrderSource::default(), &ScriptedForwarder::new(), &storage);
    let (status, body) = post_request("/admin/sent/reset", configure_with(api.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json(&body), json!({"ok": true, "message": "sent_order_ids cleared"}));
    assert_eq!(storage.saved(), Some(Vec::<OrderId>::new()));

    let (_, body) = get_request("/admin/sent", configure_with(api)).await;
    assert_eq!(json(&body)["sent_order_ids"], json!([]));
}

#[actix_web::test]
async fn reset_reports_write_failures() {
    let _ = env_logger::try_init().ok();
    let storage = MemoryStorage::with_ids(&["3"]);
    storage.fail_writes(true);
    let api = relay(ScriptedOrderSource::default(), &ScriptedForwarder::new(), &storage);
    let (status, body) = post_request("/admin/sent/reset", configure_with(api)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let body = json(&body);
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "Could not write the sent ledger. injected write failure");
}
