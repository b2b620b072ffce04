//! Billing domain module.
//!
//! Priced bill lines, the bill grand total and the read-only snapshot handed to
//! document export. Pure domain logic: storage lives in `shopbill-infra`.

pub mod line;
pub mod snapshot;
pub mod total;

pub use line::BillLineItem;
pub use snapshot::BillSnapshot;
pub use total::{grand_total, grand_total_value};
