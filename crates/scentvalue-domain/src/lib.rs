//! Domain layer - weight resolution, pricing, and the batch ledger

pub mod model;
pub mod repository;
pub mod service;

pub use model::{LedgerEntry, PricingConfig};
pub use repository::{LedgerStore, MemoryLedgerStore};
pub use service::{calculate_price, resolve_weight, BatchLedger, Valuation, WeightError};
