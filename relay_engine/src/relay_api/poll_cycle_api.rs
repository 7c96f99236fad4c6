use std::{fmt::Debug, time::Duration};

use log::*;
use tokio::sync::{Mutex, RwLock};

use super::{
    errors::RelayError,
    poll_objects::{CycleSummary, PollOutcome, PollReport, Trigger},
};
use crate::{
    ledger::SentLedger,
    order_types::{Order, OrderId, DEFAULT_ORDER_ID_FIELD},
    traits::{ForwardResult, Forwarder, LedgerStorage, OrderSource, OrderSourceError},
};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct RelayOptions {
    /// Where orders are forwarded to.
    pub destination: String,
    /// The number of recent orders fetched per cycle.
    pub page_size: u32,
    /// The order field holding the identifier.
    pub id_field: String,
    /// Upper bound for a single order source call.
    pub source_timeout: Duration,
    /// Upper bound for a single forward.
    pub forward_timeout: Duration,
}

impl RelayOptions {
    pub fn new<S: Into<String>>(destination: S) -> Self {
        Self {
            destination: destination.into(),
            page_size: DEFAULT_PAGE_SIZE,
            id_field: DEFAULT_ORDER_ID_FIELD.to_string(),
            source_timeout: DEFAULT_CALL_TIMEOUT,
            forward_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

/// `RelayApi` drives the fetch → filter → forward → mark flow and owns the sent ledger.
///
/// Everything that can change the ledger (poll cycles, manual forwards and resets) runs under a single lock, so a
/// timer-triggered cycle and a manual trigger never forward the same order twice. Read-only queries do not take that
/// lock and are answered while a cycle is running.
pub struct RelayApi<S, F, L> {
    source: S,
    forwarder: F,
    ledger: RwLock<SentLedger<L>>,
    cycle_lock: Mutex<()>,
    last_cycle: RwLock<Option<CycleSummary>>,
    options: RelayOptions,
}

impl<S, F, L> Debug for RelayApi<S, F, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RelayApi({})", self.options.destination)
    }
}

impl<S, F, L> RelayApi<S, F, L> {
    pub fn new(source: S, forwarder: F, ledger: SentLedger<L>, options: RelayOptions) -> Self {
        Self {
            source,
            forwarder,
            ledger: RwLock::new(ledger),
            cycle_lock: Mutex::new(()),
            last_cycle: RwLock::new(None),
            options,
        }
    }

    pub fn destination(&self) -> &str {
        &self.options.destination
    }

    pub async fn last_cycle(&self) -> Option<CycleSummary> {
        self.last_cycle.read().await.clone()
    }
}

impl<S, F, L> RelayApi<S, F, L>
where
    S: OrderSource,
    F: Forwarder,
    L: LedgerStorage,
{
    /// Runs one poll cycle over the most recent page of orders.
    ///
    /// Orders are handled one at a time, in the order the source returned them. A failure to fetch the page fails the
    /// whole cycle. Anything that goes wrong with an individual order is reported in its [`PollOutcome`] and the cycle
    /// moves on to the next order.
    pub async fn poll_once(&self, trigger: Trigger) -> Result<PollReport, RelayError> {
        let _guard = self.cycle_lock.lock().await;
        trace!("🔁️ [{trigger}] Poll cycle started");
        let result = self.run_cycle().await;
        let summary = CycleSummary::new(trigger, &result);
        match &result {
            Ok(report) if report.attempted_count() > 0 => info!("🔁️ {summary}"),
            Ok(_) => debug!("🔁️ {summary}"),
            Err(_) => error!("🔁️ {summary}"),
        }
        *self.last_cycle.write().await = Some(summary);
        result
    }

    /// Fetches a single order and forwards it, whether or not it is already in the ledger. The order is marked as sent
    /// if the forward succeeds.
    pub async fn forward_order(&self, order_id: &OrderId) -> Result<PollOutcome, RelayError> {
        debug!("🔁️ Manual forward of order {order_id} requested");
        let order = self.fetch_order(order_id).await?;
        let canonical = order.order_id(&self.options.id_field).unwrap_or_else(|| {
            warn!("🔁️ Order {order_id} has no '{}' field. Using the requested id instead.", self.options.id_field);
            order_id.clone()
        });
        let _guard = self.cycle_lock.lock().await;
        let outcome = self.deliver(canonical, &order).await;
        info!("🔁️ Manual forward of order {order_id}: {}", outcome.detail);
        Ok(outcome)
    }

    pub async fn reset_ledger(&self) -> Result<(), RelayError> {
        let _guard = self.cycle_lock.lock().await;
        self.ledger.write().await.reset()?;
        Ok(())
    }

    pub async fn is_sent(&self, order_id: &OrderId) -> bool {
        self.ledger.read().await.contains(order_id)
    }

    pub async fn sent_ids(&self) -> Vec<OrderId> {
        self.ledger.read().await.snapshot()
    }

    pub async fn sent_count(&self) -> usize {
        self.ledger.read().await.len()
    }

    /// True when marks are held in memory that the last ledger write failed to store.
    pub async fn ledger_pending(&self) -> bool {
        self.ledger.read().await.is_dirty()
    }

    pub async fn ledger_location(&self) -> String {
        self.ledger.read().await.location()
    }

    async fn run_cycle(&self) -> Result<PollReport, RelayError> {
        if let Err(e) = self.ledger.write().await.flush_pending() {
            warn!("🔁️ The sent ledger is still behind its in-memory state. {e}");
        }
        let orders = self.fetch_page().await?;
        trace!("🔁️ {} orders in this page", orders.len());
        let mut outcomes = Vec::with_capacity(orders.len());
        for order in &orders {
            let outcome = match order.order_id(&self.options.id_field) {
                None => {
                    warn!("🔁️ Skipping an order without a usable '{}' field", self.options.id_field);
                    PollOutcome::missing_identifier(&self.options.id_field)
                },
                Some(order_id) => {
                    let (sent, stored) = {
                        let ledger = self.ledger.read().await;
                        (ledger.contains(&order_id), !ledger.is_dirty())
                    };
                    if sent {
                        trace!("🔁️ Order {order_id} was already sent");
                        PollOutcome::already_sent(order_id, stored)
                    } else {
                        self.deliver(order_id, order).await
                    }
                },
            };
            outcomes.push(outcome);
        }
        Ok(PollReport::new(outcomes))
    }

    /// Forward the order and mark it as sent on success. The caller must hold the cycle lock.
    async fn deliver(&self, order_id: OrderId, order: &Order) -> PollOutcome {
        let result = self.forward_with_timeout(&order_id, order).await;
        if !result.is_delivered() {
            warn!("🔁️ Order {order_id} was not delivered ({}). {}", result.status, result.detail);
            return PollOutcome::failed(order_id, result);
        }
        let marked = self.ledger.write().await.mark_sent(order_id.clone());
        match marked {
            Ok(()) => {
                debug!("🔁️ Order {order_id} delivered and marked as sent");
                PollOutcome::delivered(order_id, result)
            },
            Err(e) => {
                warn!("🔁️ Order {order_id} was delivered, but could not be marked as sent. {e}");
                PollOutcome::delivered_not_marked(order_id, result, &e)
            },
        }
    }

    async fn forward_with_timeout(&self, order_id: &OrderId, order: &Order) -> ForwardResult {
        let timeout = self.options.forward_timeout;
        let forward = self.forwarder.forward(order, &self.options.destination);
        match tokio::time::timeout(timeout, forward).await {
            Ok(result) => result,
            Err(_) => {
                debug!("🔁️ Forwarding order {order_id} timed out");
                ForwardResult::unreachable(format!("Target unreachable: no response within {}ms", timeout.as_millis()))
            },
        }
    }

    async fn fetch_page(&self) -> Result<Vec<Order>, OrderSourceError> {
        let timeout = self.options.source_timeout;
        tokio::time::timeout(timeout, self.source.list_recent(self.options.page_size))
            .await
            .map_err(|_| OrderSourceError::Timeout(timeout))?
    }

    async fn fetch_order(&self, order_id: &OrderId) -> Result<Order, OrderSourceError> {
        let timeout = self.options.source_timeout;
        tokio::time::timeout(timeout, self.source.fetch_by_id(order_id))
            .await
            .map_err(|_| OrderSourceError::Timeout(timeout))?
    }
}
