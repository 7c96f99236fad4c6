//! # Order relay server
//! This crate hosts the server side of the order relay. It is responsible for:
//! * Polling the Mage-OS order API on a timer and forwarding orders that have not been sent yet to the target system.
//! * Recording forwarded orders in the sent ledger, so that restarts do not resend them.
//! * Exposing a small HTTP control surface for manual triggers and ledger administration.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `GET /health`: Ledger size, target URL, ledger file and a summary of the last poll cycle.
//! * `GET /admin/sent`: The ids in the sent ledger.
//! * `POST /admin/sent/reset`: Clears the sent ledger.
//! * `POST /run/poll-once`: Runs one poll cycle and reports the outcome for every order in the page.
//! * `POST /run/forward/{order_id}`: Fetches a single order and forwards it, whether or not it was sent before.
//! * `POST /target/orders`: A dummy target system for demos. Disable it with `RELAY_DUMMY_TARGET=false`.

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod poll_worker;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
