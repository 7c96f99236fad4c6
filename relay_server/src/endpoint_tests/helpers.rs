use std::sync::Arc;

use actix_web::{http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use log::debug;
use relay_engine::{
    test_utils::{MemoryStorage, ScriptedForwarder},
    Forwarder,
    LedgerStorage,
    OrderSource,
    RelayApi,
    RelayOptions,
    SentLedger,
};
use serde_json::Value;

use crate::{config::ServerOptions, server::configure_relay_routes};

pub const TARGET: &str = "http://localhost:3000/target/orders";

pub fn relay<S: OrderSource>(
    source: S,
    forwarder: &ScriptedForwarder,
    storage: &MemoryStorage,
) -> Arc<RelayApi<S, ScriptedForwarder, MemoryStorage>> {
    let forwarder = forwarder.clone();
    Arc::new(RelayApi::new(source, forwarder, SentLedger::load(storage.clone()), RelayOptions::new(TARGET)))
}

/// Registers the relay routes for `api`, with the background poll reported as running every 15s.
pub fn configure_with<S, F, L>(api: Arc<RelayApi<S, F, L>>) -> impl FnOnce(&mut ServiceConfig)
where
    S: OrderSource + 'static,
    F: Forwarder + 'static,
    L: LedgerStorage + 'static,
{
    move |cfg: &mut ServiceConfig| {
        let options = ServerOptions { poll_interval: Some(std::time::Duration::from_secs(15)) };
        cfg.app_data(web::Data::from(api)).app_data(web::Data::new(options));
        configure_relay_routes::<S, F, L>(cfg);
    }
}

pub async fn get_request<F>(path: &str, configure: F) -> (StatusCode, String)
where
    F: FnOnce(&mut ServiceConfig),
{
    send(TestRequest::get().uri(path), configure).await
}

pub async fn post_request<F>(path: &str, configure: F) -> (StatusCode, String)
where
    F: FnOnce(&mut ServiceConfig),
{
    send(TestRequest::post().uri(path), configure).await
}

pub async fn send<F>(req: TestRequest, configure: F) -> (StatusCode, String)
where
    F: FnOnce(&mut ServiceConfig),
{
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let res = test::call_service(&service, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    (status, String::from_utf8_lossy(&body).into_owned())
}

pub fn json(body: &str) -> Value {
    serde_json::from_str(body).unwrap_or_else(|e| panic!("Response is not JSON. {e}: {body}"))
}
