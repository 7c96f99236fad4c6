//! The seams between the relay engine and the outside world.
//!
//! * [`OrderSource`] lists and fetches orders from the commerce platform.
//! * [`Forwarder`] delivers a single order to the downstream target.
//! * [`LedgerStorage`] persists the set of delivered order ids.
mod forwarder;
mod ledger_storage;
mod order_source;

pub use forwarder::{DeliveryStatus, ForwardResult, Forwarder};
pub use ledger_storage::{LedgerError, LedgerStorage};
pub use order_source::{OrderSource, OrderSourceError};
