//! Domain services

pub mod batch_ledger;
pub mod pricing;
pub mod weight_resolver;

pub use batch_ledger::BatchLedger;
pub use pricing::{calculate_price, Valuation};
pub use weight_resolver::{resolve_weight, WeightError};
