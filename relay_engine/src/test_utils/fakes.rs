use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use serde_json::{json, Value};

use crate::{
    order_types::{Order, OrderId, DEFAULT_ORDER_ID_FIELD},
    traits::{ForwardResult, Forwarder, LedgerError, LedgerStorage, OrderSource, OrderSourceError},
};

/// An order with the given `entity_id` and a few typical Mage-OS fields.
pub fn order<V: Into<Value>>(entity_id: V) -> Order {
    let entity_id = entity_id.into();
    let increment_id = format!("{:0>9}", OrderId::from_json(&entity_id).map(|id| id.0).unwrap_or_default());
    order_with(json!({
        "entity_id": entity_id,
        "increment_id": increment_id,
        "status": "pending",
        "grand_total": 42.5,
        "customer_email": "alice@example.com",
        "created_at": "2024-05-01 10:00:00"
    }))
}

/// Panics if `value` is not an object.
pub fn order_with(value: Value) -> Order {
    Order::from_value(value).expect("orders must be JSON objects")
}

//--------------------------------------   MemoryStorage   ---------------------------------------------------------
#[derive(Debug, Default)]
struct MemoryState {
    saved: Option<Vec<OrderId>>,
    fail_reads: bool,
    fail_writes: bool,
    writes: usize,
}

/// In-memory [`LedgerStorage`]. Clones share state, so a test can keep a handle after moving one into a ledger.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ids(ids: &[&str]) -> Self {
        let storage = Self::new();
        storage.state.lock().unwrap().saved = Some(ids.iter().map(|s| OrderId::new(*s)).collect());
        storage
    }

    pub fn fail_reads(&self, fail: bool) {
        self.state.lock().unwrap().fail_reads = fail;
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().unwrap().fail_writes = fail;
    }

    pub fn saved(&self) -> Option<Vec<OrderId>> {
        self.state.lock().unwrap().saved.clone()
    }

    pub fn write_count(&self) -> usize {
        self.state.lock().unwrap().writes
    }
}

impl LedgerStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Vec<OrderId>>, LedgerError> {
        let state = self.state.lock().unwrap();
        if state.fail_reads {
            return Err(LedgerError::Corrupt("injected read failure".into()));
        }
        Ok(state.saved.clone())
    }

    fn save(&self, ids: &[OrderId]) -> Result<(), LedgerError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err(LedgerError::Write("injected write failure".into()));
        }
        state.saved = Some(ids.to_vec());
        state.writes += 1;
        Ok(())
    }

    fn location(&self) -> String {
        "memory".into()
    }
}

//--------------------------------------  ScriptedOrderSource  -----------------------------------------------------
/// An [`OrderSource`] that serves whatever page it was last given.
#[derive(Debug, Clone, Default)]
pub struct ScriptedOrderSource {
    orders: Arc<Mutex<Vec<Order>>>,
    failure: Arc<Mutex<Option<OrderSourceError>>>,
    list_calls: Arc<Mutex<usize>>,
    delay: Option<Duration>,
}

impl ScriptedOrderSource {
    pub fn new(orders: Vec<Order>) -> Self {
        let source = Self::default();
        source.set_orders(orders);
        source
    }

    /// Every call sleeps for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_orders(&self, orders: Vec<Order>) {
        *self.orders.lock().unwrap() = orders;
    }

    pub fn fail_with(&self, error: Option<OrderSourceError>) {
        *self.failure.lock().unwrap() = error;
    }

    pub fn list_calls(&self) -> usize {
        *self.list_calls.lock().unwrap()
    }
}

impl OrderSource for ScriptedOrderSource {
    async fn list_recent(&self, page_size: u32) -> Result<Vec<Order>, OrderSourceError> {
        *self.list_calls.lock().unwrap() += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(e) = self.failure.lock().unwrap().clone() {
            return Err(e);
        }
        Ok(self.orders.lock().unwrap().iter().take(page_size as usize).cloned().collect())
    }

    async fn fetch_by_id(&self, order_id: &OrderId) -> Result<Order, OrderSourceError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(e) = self.failure.lock().unwrap().clone() {
            return Err(e);
        }
        self.orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.order_id(DEFAULT_ORDER_ID_FIELD).as_ref() == Some(order_id))
            .cloned()
            .ok_or_else(|| OrderSourceError::NotFound(order_id.to_string()))
    }
}

//--------------------------------------  ScriptedForwarder  -------------------------------------------------------
/// A [`Forwarder`] that delivers everything, except for orders with a scripted response.
#[derive(Debug, Clone, Default)]
pub struct ScriptedForwarder {
    responses: Arc<Mutex<HashMap<OrderId, ForwardResult>>>,
    calls: Arc<Mutex<Vec<OrderId>>>,
    delay: Option<Duration>,
}

impl ScriptedForwarder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn respond<I: Into<OrderId>>(&self, order_id: I, result: ForwardResult) {
        self.responses.lock().unwrap().insert(order_id.into(), result);
    }

    /// Ids of every order forwarded so far, in call order.
    pub fn calls(&self) -> Vec<OrderId> {
        self.calls.lock().unwrap().clone()
    }
}

impl Forwarder for ScriptedForwarder {
    async fn forward(&self, order: &Order, _destination: &str) -> ForwardResult {
        let order_id = order.order_id(DEFAULT_ORDER_ID_FIELD).unwrap_or_else(|| OrderId::new("?"));
        self.calls.lock().unwrap().push(order_id.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = self.responses.lock().unwrap().get(&order_id).cloned();
        scripted.unwrap_or_else(|| ForwardResult::delivered(200, Some(json!({"ok": true}))))
    }
}
