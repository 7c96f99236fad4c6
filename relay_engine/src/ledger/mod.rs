//! The sent ledger: the durable set of order ids that have been confirmed delivered.
//!
//! The in-memory set is authoritative for the running process. Every mutation rewrites the whole set to storage before
//! returning, and a load that fails for any reason yields an empty ledger, so startup always succeeds. Losing the ledger file
//! means recent orders are forwarded once more.
mod json_file;

use std::collections::HashSet;

use log::*;

pub use json_file::JsonFileStorage;

use crate::{
    order_types::OrderId,
    traits::{LedgerError, LedgerStorage},
};

pub struct SentLedger<S> {
    storage: S,
    ids: Vec<OrderId>,
    index: HashSet<OrderId>,
    // The last write failed, so storage is behind memory.
    dirty: bool,
}

impl<S> std::fmt::Debug for SentLedger<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SentLedger({} ids, dirty: {})", self.ids.len(), self.dirty)
    }
}

impl<S> SentLedger<S>
where S: LedgerStorage
{
    pub fn load(storage: S) -> Self {
        let stored = match storage.load() {
            Ok(Some(ids)) => ids,
            Ok(None) => {
                info!("📒️ No sent ledger at {}. Starting with an empty ledger.", storage.location());
                Vec::new()
            },
            Err(e) => {
                warn!(
                    "📒️ {e} Starting with an empty ledger at {}. Recent orders may be forwarded again.",
                    storage.location()
                );
                Vec::new()
            },
        };
        let mut ledger = Self { storage, ids: Vec::with_capacity(stored.len()), index: HashSet::new(), dirty: false };
        for id in stored {
            ledger.insert(id);
        }
        debug!("📒️ Loaded {} sent order ids", ledger.len());
        ledger
    }

    pub fn contains(&self, order_id: &OrderId) -> bool {
        self.index.contains(order_id)
    }

    /// Adds the id and synchronously writes the entire set to storage.
    ///
    /// If the write fails, the error is returned and the id stays marked in memory. It reaches storage with the next
    /// successful write. Marking an id that is already present does not write, unless an earlier write failed.
    pub fn mark_sent(&mut self, order_id: OrderId) -> Result<(), LedgerError> {
        let added = self.insert(order_id.clone());
        if !added && !self.dirty {
            trace!("📒️ Order {order_id} is already in the ledger");
            return Ok(());
        }
        self.flush()?;
        debug!("📒️ Order {order_id} marked as sent. {} ids in the ledger", self.len());
        Ok(())
    }

    /// Retries the write left behind by an earlier failure. Does nothing when storage is up to date.
    pub fn flush_pending(&mut self) -> Result<(), LedgerError> {
        if !self.dirty {
            return Ok(());
        }
        self.flush()?;
        info!("📒️ Pending marks written to {}. {} ids in the ledger", self.storage.location(), self.len());
        Ok(())
    }

    /// Clears the ledger and persists the empty set.
    pub fn reset(&mut self) -> Result<(), LedgerError> {
        let count = self.len();
        self.ids.clear();
        self.index.clear();
        self.flush()?;
        info!("📒️ Sent ledger reset. {count} ids removed");
        Ok(())
    }

    /// The ids in the order they were marked.
    pub fn snapshot(&self) -> Vec<OrderId> {
        self.ids.clone()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn location(&self) -> String {
        self.storage.location()
    }

    fn insert(&mut self, order_id: OrderId) -> bool {
        if self.index.insert(order_id.clone()) {
            self.ids.push(order_id);
            true
        } else {
            false
        }
    }

    fn flush(&mut self) -> Result<(), LedgerError> {
        match self.storage.save(&self.ids) {
            Ok(()) => {
                self.dirty = false;
                Ok(())
            },
            Err(e) => {
                self.dirty = true;
                error!("📒️ {e}");
                Err(e)
            },
        }
    }
}
