//! # Relay API
//!
//! [`poll_cycle_api::RelayApi`] is the programmatic API for the relay. It owns the sent ledger and the two
//! collaborators (an [`crate::OrderSource`] and a [`crate::Forwarder`]) and exposes:
//!
//! * `poll_once`, one fetch → filter → forward → mark cycle over the most recent page of orders;
//! * `forward_order`, a manual forward of a single order, regardless of the ledger;
//! * ledger administration and introspection (`reset_ledger`, `sent_ids`, `sent_count`, `last_cycle`).
//!
//! ```rust,ignore
//! let ledger = SentLedger::load(JsonFileStorage::new("data/sent.json"));
//! let api = RelayApi::new(source, forwarder, ledger, RelayOptions::new("http://localhost:3000/target/orders"));
//! let report = api.poll_once(Trigger::Manual).await?;
//! println!("{} orders forwarded", report.delivered_count());
//! ```
pub mod errors;
pub mod poll_cycle_api;
pub mod poll_objects;
