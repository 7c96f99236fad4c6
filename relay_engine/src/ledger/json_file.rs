use std::{
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

use log::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::{
    order_types::OrderId,
    traits::{LedgerError, LedgerStorage},
};

#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerFile {
    #[serde(default)]
    sent_order_ids: Vec<Value>,
}

/// Stores the ledger as `{"sent_order_ids": [...]}` in a single JSON file.
///
/// Writes go to a temporary file in the same directory, which is synced and then renamed over the ledger, so an
/// interrupted write never leaves a half-written ledger behind.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

impl LedgerStorage for JsonFileStorage {
    fn load(&self) -> Result<Option<Vec<OrderId>>, LedgerError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LedgerError::Read(format!("{}: {e}", self.path.display()))),
        };
        let file = serde_json::from_str::<LedgerFile>(&raw)
            .map_err(|e| LedgerError::Corrupt(format!("{}: {e}", self.path.display())))?;
        let ids = file
            .sent_order_ids
            .iter()
            .filter_map(|v| {
                let id = OrderId::from_json(v);
                if id.is_none() {
                    warn!("📒️ Ignoring invalid entry in the sent ledger: {v}");
                }
                id
            })
            .collect();
        Ok(Some(ids))
    }

    fn save(&self, ids: &[OrderId]) -> Result<(), LedgerError> {
        let dir = self.parent_dir();
        let write_err = |e: std::io::Error| LedgerError::Write(format!("{}: {e}", self.path.display()));
        fs::create_dir_all(&dir).map_err(write_err)?;
        let file = LedgerFile { sent_order_ids: ids.iter().map(|id| Value::String(id.0.clone())).collect() };
        let mut contents =
            serde_json::to_string_pretty(&file).map_err(|e| LedgerError::Write(format!("Serialization failed. {e}")))?;
        contents.push('\n');
        let mut tmp = NamedTempFile::new_in(&dir).map_err(write_err)?;
        tmp.write_all(contents.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        trace!("📒️ Wrote {} ids to {}", ids.len(), self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
