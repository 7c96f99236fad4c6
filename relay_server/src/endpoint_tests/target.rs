use actix_web::{http::StatusCode, test::TestRequest, web::ServiceConfig};
use relay_engine::test_utils::order;
use serde_json::json;

use super::helpers::{json, send};
use crate::{integrations::http_forwarder::forward_payload, routes::dummy_target};

fn configure(cfg: &mut ServiceConfig) {
    cfg.service(dummy_target);
}

#[actix_web::test]
async fn dummy_target_acknowledges_orders() {
    let _ = env_logger::try_init().ok();
    let payload = forward_payload(&order(7), "entity_id");
    let req = TestRequest::post().uri("/target/orders").set_json(&payload);
    let (status, body) = send(req, configure).await;
    assert_eq!(status, StatusCode::OK);
    let body = json(&body);
    assert_eq!(body["ok"], true);
    assert!(body["ref"].as_str().is_some_and(|r| r.starts_with("TGT-")), "{body}");
    assert_eq!(body["received"], json!({"order_id": 7, "increment_id": "000000007"}));
}

#[actix_web::test]
async fn dummy_target_needs_json() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post()
        .uri("/target/orders")
        .insert_header(("content-type", "text/plain"))
        .set_payload("hi");
    let (status, _) = send(req, configure).await;
    assert!(status.is_client_error(), "{status}");
}
