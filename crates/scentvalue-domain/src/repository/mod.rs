//! Ledger store trait and the in-memory implementation

use std::collections::VecDeque;

use scentvalue_types::Result;

use crate::model::LedgerEntry;

/// Backing storage for the batch ledger
pub trait LedgerStore {
    /// Record a new entry. It becomes the first element returned by `list`.
    fn append(&mut self, entry: LedgerEntry) -> Result<()>;

    /// Remove every entry
    fn clear(&mut self) -> Result<()>;

    /// All entries, newest first
    fn list(&self) -> Result<Vec<LedgerEntry>>;

    fn count(&self) -> Result<usize> {
        Ok(self.list()?.len())
    }
}

/// Session-only store; contents are lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    entries: VecDeque<LedgerEntry>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn append(&mut self, entry: LedgerEntry) -> Result<()> {
        self.entries.push_front(entry);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        Ok(())
    }

    fn list(&self) -> Result<Vec<LedgerEntry>> {
        Ok(self.entries.iter().cloned().collect())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.entries.len())
    }
}

impl<S: LedgerStore + ?Sized> LedgerStore for Box<S> {
    fn append(&mut self, entry: LedgerEntry) -> Result<()> {
        (**self).append(entry)
    }

    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }

    fn list(&self) -> Result<Vec<LedgerEntry>> {
        (**self).list()
    }

    fn count(&self) -> Result<usize> {
        (**self).count()
    }
}
