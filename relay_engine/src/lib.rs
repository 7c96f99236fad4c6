//! Order Relay Engine
//!
//! The engine decides which orders have been durably delivered to the downstream target. It is provider-agnostic:
//! orders come from an [`OrderSource`], are delivered by a [`Forwarder`], and delivered identifiers are recorded in a
//! [`SentLedger`] backed by any [`LedgerStorage`].
//!
//! The library is divided into three sections:
//! 1. The sent ledger ([`mod@ledger`]). An insertion-ordered set of order ids that is flushed to storage in full after
//!    every successful mark. A missing or corrupt ledger loads as an empty one.
//! 2. The collaborator traits ([`mod@traits`]) that the server implements for the commerce API and the HTTP
//!    forwarder.
//! 3. The relay API ([`RelayApi`]). Runs poll cycles (fetch, filter, forward, mark), manual single-order forwards, and
//!    ledger administration, serializing everything that touches the ledger.
//!
//! Delivery is at-least-once. A crash between a successful forward and the ledger write resends that order on the
//! next cycle.
pub mod ledger;
pub mod order_types;
mod relay_api;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use ledger::{JsonFileStorage, SentLedger};
pub use order_types::{Order, OrderId, DEFAULT_ORDER_ID_FIELD};
pub use relay_api::{
    errors::RelayError,
    poll_cycle_api::{RelayApi, RelayOptions},
    poll_objects,
};
pub use traits::{
    DeliveryStatus,
    ForwardResult,
    Forwarder,
    LedgerError,
    LedgerStorage,
    OrderSource,
    OrderSourceError,
};
