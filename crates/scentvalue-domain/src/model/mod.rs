//! Domain model types

pub mod ledger_entry;
pub mod pricing;

pub use ledger_entry::LedgerEntry;
pub use pricing::PricingConfig;
