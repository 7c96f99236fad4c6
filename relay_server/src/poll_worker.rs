use std::{sync::Arc, time::Duration};

use log::*;
use relay_engine::{poll_objects::Trigger, Forwarder, LedgerStorage, OrderSource, RelayApi};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};

/// Starts the background poll. Do not await the returned JoinHandle, as it will run indefinitely.
///
/// The first cycle runs one `period` after start. A cycle that overruns the period delays the next tick instead of
/// triggering a burst of catch-up cycles. The worker runs on the current thread's local task set, so it must be
/// started from within the actix system.
pub fn start_poll_worker<S, F, L>(api: Arc<RelayApi<S, F, L>>, period: Duration) -> JoinHandle<()>
where
    S: OrderSource + 'static,
    F: Forwarder + 'static,
    L: LedgerStorage + 'static,
{
    actix_web::rt::spawn(async move {
        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("🕰️ Poll worker started. Polling every {}ms", period.as_millis());
        loop {
            timer.tick().await;
            trace!("🕰️ Running scheduled poll");
            match api.poll_once(Trigger::Timer).await {
                Ok(report) if report.attempted_count() > 0 => {
                    info!("🕰️ Attempted forwards: {}", report.attempted_count());
                },
                Ok(_) => {},
                Err(e) => {
                    // The full cycle summary was already logged by the relay
                    error!("🕰️ Scheduled poll failed. {e}");
                },
            }
        }
    })
}
