//! Implementations of the engine's collaborator traits for the outside world: the Mage-OS order API as an
//! [`relay_engine::OrderSource`], and an HTTP POST to the target system as a [`relay_engine::Forwarder`].
pub mod http_forwarder;
pub mod mageos;

pub use http_forwarder::HttpForwarder;
pub use mageos::MageosOrderSource;
