//! Domain models for the ledger. These carry typed dates; the `shared` crate
//! holds their wire-format counterparts.

pub mod autopay;
pub mod budget;
pub mod entry;
pub mod goal;
pub mod user;

pub use autopay::{AutopayPlan, NewAutopayPlan};
pub use budget::Budget;
pub use entry::{FinanceEntry, NewFinanceEntry};
pub use goal::{Goal, NewGoal};
pub use user::User;
