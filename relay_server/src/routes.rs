//! Request handler definitions
//!
//! Define each route and its handler here. Handlers that are more than a few lines MUST go into a separate module.
//! Keep this module neat and tidy 🙏
//!
//! Every handler that touches the relay is generic over the order source, the forwarder and the ledger storage, so the
//! endpoint tests can run them against scripted collaborators.
//!
//! A note about performance:
//! Each worker thread processes its requests sequentially, so handlers must never block. Poll cycles and forwards are
//! async all the way down, and a manual trigger that arrives while the timer's cycle is running simply waits its turn
//! on the relay's cycle lock without holding up the worker.
use actix_web::{post, web, HttpResponse};
use chrono::Utc;
use log::*;
use relay_engine::{poll_objects::Trigger, Forwarder, LedgerStorage, OrderId, OrderSource, RelayApi};
use serde_json::Value;

use crate::{
    config::ServerOptions,
    data_objects::{
        ForwardResponse,
        HealthResponse,
        JsonResponse,
        PollOnceResponse,
        ReceivedOrder,
        SentIdsResponse,
        TargetReceipt,
    },
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

type Relay<S, F, L> = web::Data<RelayApi<S, F, L>>;

// ----------------------------------------------   Health  ----------------------------------------------------
route!(health => Get "/health" impl OrderSource, Forwarder, LedgerStorage);
pub async fn health<S, F, L>(api: Relay<S, F, L>, options: web::Data<ServerOptions>) -> HttpResponse
where
    S: OrderSource,
    F: Forwarder,
    L: LedgerStorage,
{
    trace!("💻️ Received health check request");
    let response = HealthResponse {
        ok: true,
        sent_count: api.sent_count().await,
        ledger_pending: api.ledger_pending().await,
        target_url: api.destination().to_string(),
        sent_file: api.ledger_location().await,
        poll_interval_ms: options.poll_interval_ms(),
        last_cycle: api.last_cycle().await,
    };
    HttpResponse::Ok().json(response)
}

//----------------------------------------------   Admin  ----------------------------------------------------
route!(sent_ids => Get "/admin/sent" impl OrderSource, Forwarder, LedgerStorage);
pub async fn sent_ids<S, F, L>(api: Relay<S, F, L>) -> HttpResponse
where
    S: OrderSource,
    F: Forwarder,
    L: LedgerStorage,
{
    trace!("💻️ Received request for the sent ledger");
    HttpResponse::Ok().json(SentIdsResponse { ok: true, sent_order_ids: api.sent_ids().await })
}

route!(reset_sent => Post "/admin/sent/reset" impl OrderSource, Forwarder, LedgerStorage);
pub async fn reset_sent<S, F, L>(api: Relay<S, F, L>) -> Result<HttpResponse, ServerError>
where
    S: OrderSource,
    F: Forwarder,
    L: LedgerStorage,
{
    info!("💻️ Received request to clear the sent ledger");
    api.reset_ledger().await.map_err(|e| {
        error!("💻️ Could not clear the sent ledger. {e}");
        ServerError::from(e)
    })?;
    Ok(HttpResponse::Ok().json(JsonResponse::success("sent_order_ids cleared")))
}

//----------------------------------------------   Triggers  ----------------------------------------------------
route!(poll_once => Post "/run/poll-once" impl OrderSource, Forwarder, LedgerStorage);
pub async fn poll_once<S, F, L>(api: Relay<S, F, L>) -> Result<HttpResponse, ServerError>
where
    S: OrderSource,
    F: Forwarder,
    L: LedgerStorage,
{
    debug!("💻️ Received manual poll request");
    let report = api.poll_once(Trigger::Manual).await?;
    Ok(HttpResponse::Ok().json(PollOnceResponse::from(report)))
}

route!(forward_order => Post "/run/forward/{order_id}" impl OrderSource, Forwarder, LedgerStorage);
pub async fn forward_order<S, F, L>(
    path: web::Path<String>,
    api: Relay<S, F, L>,
) -> Result<HttpResponse, ServerError>
where
    S: OrderSource,
    F: Forwarder,
    L: LedgerStorage,
{
    let order_id = path.into_inner().trim().to_string();
    if order_id.is_empty() {
        return Err(ServerError::InvalidRequestPath("An order id is required".into()));
    }
    debug!("💻️ Received manual forward request for order {order_id}");
    let outcome = api.forward_order(&OrderId::new(order_id)).await?;
    let response = ForwardResponse::from(outcome);
    if response.ok {
        Ok(HttpResponse::Ok().json(response))
    } else {
        Ok(HttpResponse::BadGateway().json(response))
    }
}

//----------------------------------------------   Dummy target  ----------------------------------------------------
/// Stands in for the downstream system in demos. It accepts anything and says thank you.
#[post("/target/orders")]
pub async fn dummy_target(body: web::Json<Value>) -> HttpResponse {
    let received = ReceivedOrder {
        order_id: body.get("order_id").cloned(),
        increment_id: body.get("increment_id").cloned(),
    };
    let label = received.increment_id.as_ref().or(received.order_id.as_ref()).cloned().unwrap_or(Value::Null);
    info!("🎯️ Dummy target received order {label}");
    let receipt = TargetReceipt { ok: true, reference: format!("TGT-{}", Utc::now().timestamp_millis()), received };
    HttpResponse::Ok().json(receipt)
}
