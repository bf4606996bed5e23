use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::{types::*, AnalyticsResult};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Days-past-due classification of an open invoice. Upper bounds are
/// inclusive: exactly 30 days overdue is still `Current`, and invoices not
/// yet due (negative days) land there too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgingBucket {
    #[serde(rename = "0-30")]
    Current,
    #[serde(rename = "31-60")]
    Late,
    #[serde(rename = "61-90")]
    VeryLate,
    #[serde(rename = "90+")]
    Delinquent,
}

impl AgingBucket {
    pub fn for_days_overdue(days: i64) -> Self {
        if days <= 30 {
            Self::Current
        } else if days <= 60 {
            Self::Late
        } else if days <= 90 {
            Self::VeryLate
        } else {
            Self::Delinquent
        }
    }
}

impl std::fmt::Display for AgingBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Current => "0-30",
            Self::Late => "31-60",
            Self::VeryLate => "61-90",
            Self::Delinquent => "90+",
        };
        write!(f, "{}", s)
    }
}

/// Open AR summed by days overdue. All four buckets are always present, even
/// when zero, so dashboards render a stable shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingOutput {
    #[serde(rename = "0-30")]
    pub current: Money,
    #[serde(rename = "31-60")]
    pub late: Money,
    #[serde(rename = "61-90")]
    pub very_late: Money,
    #[serde(rename = "90+")]
    pub delinquent: Money,
}

impl AgingOutput {
    fn add(&mut self, bucket: AgingBucket, amount: Money) {
        match bucket {
            AgingBucket::Current => self.current += amount,
            AgingBucket::Late => self.late += amount,
            AgingBucket::VeryLate => self.very_late += amount,
            AgingBucket::Delinquent => self.delinquent += amount,
        }
    }

    pub fn total(&self) -> Money {
        self.current + self.late + self.very_late + self.delinquent
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Bucket open receivables (unpaid/overdue invoices) by days past due at
/// `now`. An open invoice with no due date is skipped individually and its id
/// reported, never fatal to the batch.
pub fn compute_aging(
    invoices: &[Invoice],
    now: DateTime<Utc>,
) -> AnalyticsResult<ComputationOutput<AgingOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let mut skipped: Vec<String> = Vec::new();

    let mut buckets = AgingOutput::default();

    for inv in invoices.iter().filter(|inv| inv.counts_as_receivable()) {
        match inv.due_date {
            Some(due) => {
                let days_overdue = now.signed_duration_since(due).num_days();
                buckets.add(AgingBucket::for_days_overdue(days_overdue), inv.amount);
            }
            None => skipped.push(inv.id.clone()),
        }
    }

    if !skipped.is_empty() {
        warnings.push(format!(
            "{} open invoice(s) have no due date and were left out of the aging buckets.",
            skipped.len()
        ));
    }

    Ok(with_metadata(
        "Open invoices bucketed by (now - due_date) in days; bounds inclusive, 30 days exactly is 0-30",
        &serde_json::json!({ "as_of": now }),
        warnings,
        skipped,
        start.elapsed().as_micros() as u64,
        buckets,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
