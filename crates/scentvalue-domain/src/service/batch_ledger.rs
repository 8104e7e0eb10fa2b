//! Batch ledger - the ordered collection of priced entries awaiting export

use scentvalue_types::Result;
use tracing::debug;

use crate::model::{LedgerEntry, PricingConfig};
use crate::repository::{LedgerStore, MemoryLedgerStore};

/// Newest-first collection of priced entries
pub struct BatchLedger<S: LedgerStore = MemoryLedgerStore> {
    store: S,
    pricing: PricingConfig,
}

impl BatchLedger<MemoryLedgerStore> {
    /// Ledger that lives only as long as the current session
    pub fn in_memory(pricing: PricingConfig) -> Self {
        Self::new(MemoryLedgerStore::new(), pricing)
    }
}

impl<S: LedgerStore> BatchLedger<S> {
    pub fn new(store: S, pricing: PricingConfig) -> Self {
        Self { store, pricing }
    }

    pub fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    /// Price a gross reading and put it at the front of the ledger.
    ///
    /// Returns `Ok(None)` without touching the ledger when the weight is NaN,
    /// infinite, zero or negative. A blank label becomes `Item {count + 1}`.
    pub fn add_entry(&mut self, gross_weight: f64, label: Option<&str>) -> Result<Option<LedgerEntry>> {
        if !gross_weight.is_finite() || gross_weight <= 0.0 {
            debug!(gross_weight, "rejected non-positive weight");
            return Ok(None);
        }

        let label = match label {
            Some(l) if !l.trim().is_empty() => l.to_string(),
            _ => format!("Item {}", self.store.count()? + 1),
        };

        let entry = LedgerEntry::new(label, gross_weight, &self.pricing);
        self.store.append(entry.clone())?;
        debug!(id = entry.id(), label = entry.label(), price = entry.price(), "ledger entry added");
        Ok(Some(entry))
    }

    /// Remove every entry. Irreversible.
    pub fn clear(&mut self) -> Result<()> {
        self.store.clear()
    }

    /// Entries, newest first
    pub fn entries(&self) -> Result<Vec<LedgerEntry>> {
        self.store.list()
    }

    pub fn count(&self) -> Result<usize> {
        self.store.count()
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.count()? == 0)
    }

    /// Sum of all entry prices, recomputed on every call
    pub fn total(&self) -> Result<f64> {
        Ok(self.store.list()?.iter().map(LedgerEntry::price).sum())
    }
}
