//! Fakes for the relay collaborators. Enabled by the `test_utils` feature.
mod fakes;
mod prepare_env;

pub use fakes::{order, order_with, MemoryStorage, ScriptedForwarder, ScriptedOrderSource};
pub use prepare_env::{prepare_test_env, random_ledger_path};
