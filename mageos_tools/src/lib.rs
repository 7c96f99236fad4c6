//! A minimal REST client for the Mage-OS (Magento 2) order API.
//!
//! The client expects a base URL of the form `https://<domain>/rest/<store_code>/V1` and an integration access token,
//! which is sent as a bearer credential on every request.
mod api;
mod config;
mod error;

pub mod data_objects;
pub mod helpers;

pub use api::MageosApi;
pub use config::MageosConfig;
pub use error::MageosApiError;
