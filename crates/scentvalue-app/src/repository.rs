//! Ledger store selection

use std::path::PathBuf;

use scentvalue_domain::{BatchLedger, LedgerStore, MemoryLedgerStore};
use scentvalue_store::FileLedgerStore;
use scentvalue_types::Result;
use tracing::debug;

use crate::config::Config;

/// Ledger over whichever store the caller picked
pub type AppLedger = BatchLedger<Box<dyn LedgerStore>>;

/// Open the file-backed ledger store at the configured path
pub fn open_file_store(config: &Config) -> Result<FileLedgerStore> {
    let path = config.ledger_path()?;
    open_file_store_at(path)
}

/// Open the file-backed ledger store at a custom path
pub fn open_file_store_at(path: PathBuf) -> Result<FileLedgerStore> {
    debug!(path = %path.display(), "opening ledger file");
    FileLedgerStore::open(path)
}

/// Ledger for one-shot commands: always file-backed
pub fn open_persistent_ledger(config: &Config, path_override: Option<PathBuf>) -> Result<AppLedger> {
    let store: Box<dyn LedgerStore> = match path_override {
        Some(path) => Box::new(open_file_store_at(path)?),
        None => Box::new(open_file_store(config)?),
    };
    Ok(BatchLedger::new(store, config.pricing()))
}

/// Ledger for an interactive session: in memory unless a file is given
pub fn open_session_ledger(config: &Config, path_override: Option<PathBuf>) -> Result<AppLedger> {
    let store: Box<dyn LedgerStore> = match path_override {
        Some(path) => Box::new(open_file_store_at(path)?),
        None => Box::new(MemoryLedgerStore::new()),
    };
    Ok(BatchLedger::new(store, config.pricing()))
}
