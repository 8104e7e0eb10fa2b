//! Persistent ledger store
//!
//! Keeps the batch ledger in a JSON file so one-shot CLI invocations can
//! share a batch. The in-memory store lives in `scentvalue-domain`.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use scentvalue_domain::{LedgerEntry, LedgerStore};
use scentvalue_types::{Error, Result};
use tracing::debug;

/// JSON-file ledger store, newest entry first in the file
pub struct FileLedgerStore {
    store_path: PathBuf,
    entries: Vec<LedgerEntry>,
}

impl FileLedgerStore {
    /// Create or load a ledger file
    pub fn open(store_path: PathBuf) -> Result<Self> {
        if let Some(parent) = store_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let entries = if store_path.exists() {
            let file = File::open(&store_path)?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).map_err(|e| {
                Error::Store(format!("{} is not a valid ledger: {}", store_path.display(), e))
            })?
        } else {
            Vec::new()
        };

        debug!(path = %store_path.display(), count = entries.len(), "ledger file opened");
        Ok(Self { store_path, entries })
    }

    /// Write `entries` to disk, then adopt them as the in-memory state.
    ///
    /// On a failed write memory keeps the previous entries.
    fn commit(&mut self, entries: Vec<LedgerEntry>) -> Result<()> {
        let file = File::create(&self.store_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &entries)?;
        writer.flush()?;
        self.entries = entries;
        debug!(path = %self.store_path.display(), count = self.entries.len(), "ledger file written");
        Ok(())
    }
}

impl LedgerStore for FileLedgerStore {
    fn append(&mut self, entry: LedgerEntry) -> Result<()> {
        let mut entries = Vec::with_capacity(self.entries.len() + 1);
        entries.push(entry);
        entries.extend(self.entries.iter().cloned());
        self.commit(entries)
    }

    fn clear(&mut self) -> Result<()> {
        self.commit(Vec::new())
    }

    fn list(&self) -> Result<Vec<LedgerEntry>> {
        Ok(self.entries.clone())
    }

    fn count(&self) -> Result<usize> {
        Ok(self.entries.len())
    }
}
