use std::{sync::Arc, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, web::ServiceConfig, App, HttpServer};
use log::*;
use relay_engine::{Forwarder, JsonFileStorage, LedgerStorage, OrderSource, RelayApi, SentLedger};

use crate::{
    config::{ServerConfig, ServerOptions},
    errors::ServerError,
    integrations::{HttpForwarder, MageosOrderSource},
    poll_worker::start_poll_worker,
    routes::{dummy_target, ForwardOrderRoute, HealthRoute, PollOnceRoute, ResetSentRoute, SentIdsRoute},
};

/// Request bodies larger than this are refused.
pub const JSON_PAYLOAD_LIMIT: usize = 2 * 1024 * 1024;

pub type MageosRelay = RelayApi<MageosOrderSource, HttpForwarder, JsonFileStorage>;

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let relay = Arc::new(create_relay_api(&config)?);
    log_startup_banner(&config, &relay).await;
    let _worker = config.poll_interval.map(|period| start_poll_worker(relay.clone(), period));
    let srv = create_server_instance(config, relay)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

/// Loads the sent ledger and wires the Mage-OS source and the HTTP forwarder into a relay.
pub fn create_relay_api(config: &ServerConfig) -> Result<MageosRelay, ServerError> {
    let source =
        MageosOrderSource::new(config.mageos.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let forwarder = HttpForwarder::new(config.http_timeout, &config.order_id_field)
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let ledger = SentLedger::load(JsonFileStorage::new(&config.sent_file));
    Ok(RelayApi::new(source, forwarder, ledger, config.relay_options()))
}

pub fn create_server_instance(config: ServerConfig, relay: Arc<MageosRelay>) -> Result<Server, ServerError> {
    let relay = web::Data::from(relay);
    let options = config.server_options();
    let dummy_target_enabled = config.dummy_target;
    let srv = HttpServer::new(move || {
        let app = App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("relay::access_log"))
            .app_data(relay.clone())
            .app_data(web::Data::new(options))
            .app_data(web::JsonConfig::default().limit(JSON_PAYLOAD_LIMIT))
            .configure(configure_relay_routes::<MageosOrderSource, HttpForwarder, JsonFileStorage>);
        if dummy_target_enabled {
            app.service(dummy_target)
        } else {
            app
        }
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((config.host.as_str(), config.port))?
    .run();
    Ok(srv)
}

/// Registers every route that talks to the relay. The relay itself and the [`ServerOptions`] must be supplied as app
/// data.
pub fn configure_relay_routes<S, F, L>(cfg: &mut ServiceConfig)
where
    S: OrderSource + 'static,
    F: Forwarder + 'static,
    L: LedgerStorage + 'static,
{
    cfg.service(HealthRoute::<S, F, L>::new())
        .service(SentIdsRoute::<S, F, L>::new())
        .service(ResetSentRoute::<S, F, L>::new())
        .service(PollOnceRoute::<S, F, L>::new())
        .service(ForwardOrderRoute::<S, F, L>::new());
}

async fn log_startup_banner(config: &ServerConfig, relay: &MageosRelay) {
    let base = format!("http://{}:{}", config.host, config.port);
    info!("📡️ Order relay listening on {base}");
    info!("📡️ Health:       GET  {base}/health");
    info!("📡️ Manual poll:  POST {base}/run/poll-once");
    info!("📡️ Forward one:  POST {base}/run/forward/{{order_id}}");
    info!("📡️ Sent ids:     GET  {base}/admin/sent");
    info!("📡️ Reset sent:   POST {base}/admin/sent/reset");
    if config.dummy_target {
        info!("📡️ Dummy target: POST {base}/target/orders");
    }
    info!("📡️ Forwarding to {}", relay.destination());
    info!("📡️ Sent ledger: {} ({} ids)", relay.ledger_location().await, relay.sent_count().await);
    match config.poll_interval {
        Some(period) => info!("📡️ Auto-poll enabled: every {} ms", period.as_millis()),
        None => info!("📡️ Auto-poll disabled (RELAY_POLL_INTERVAL_MS=0). Use /run/poll-once manually."),
    }
}
