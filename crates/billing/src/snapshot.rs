use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::line::BillLineItem;
use crate::total::grand_total;

/// Read-only view of a bill handed to document export.
///
/// The grand total is computed from the same lines the snapshot carries, so a
/// snapshot is always internally consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillSnapshot {
    snapshot_id: Uuid,
    taken_at: DateTime<Utc>,
    lines: Vec<BillLineItem>,
    grand_total: String,
}

impl BillSnapshot {
    pub fn capture(lines: Vec<BillLineItem>) -> Self {
        Self::capture_at(lines, Utc::now())
    }

    pub fn capture_at(lines: Vec<BillLineItem>, taken_at: DateTime<Utc>) -> Self {
        let grand_total = grand_total(&lines);
        Self {
            snapshot_id: Uuid::now_v7(),
            taken_at,
            lines,
            grand_total,
        }
    }

    pub fn snapshot_id(&self) -> Uuid {
        self.snapshot_id
    }

    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    pub fn lines(&self) -> &[BillLineItem] {
        &self.lines
    }

    pub fn grand_total(&self) -> &str {
        &self.grand_total
    }

    /// Export refuses empty bills.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
