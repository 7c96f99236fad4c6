use std::path::{Path, PathBuf};

use log::*;

pub fn prepare_test_env() {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
}

/// A fresh ledger path inside `dir`. The file itself is not created.
pub fn random_ledger_path<P: AsRef<Path>>(dir: P) -> PathBuf {
    dir.as_ref().join(format!("sent_{}.json", rand::random::<u64>()))
}
