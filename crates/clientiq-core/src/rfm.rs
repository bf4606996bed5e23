use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::Instant;

use crate::{types::*, AnalyticsResult};

/// Recency sentinel for clients with invoices but no usable date; ranks them
/// last on recency.
pub const STALE_RECENCY_DAYS: i64 = 9999;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Customer-value segment derived from the R/F/M scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    Champion,
    Loyal,
    Potential,
    #[serde(rename = "At Risk")]
    AtRisk,
    Lost,
    Other,
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Champion => "Champion",
            Self::Loyal => "Loyal",
            Self::Potential => "Potential",
            Self::AtRisk => "At Risk",
            Self::Lost => "Lost",
            Self::Other => "Other",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RfmRecord {
    pub client_id: String,
    pub client_name: String,
    pub recency_days: i64,
    pub frequency: u64,
    /// Billed total across all statuses. Deliberately not the revenue of the
    /// profitability ranker: RFM measures billing activity, not collected cash.
    pub monetary: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_invoice_date: Option<DateTime<Utc>>,
    #[serde(rename = "R")]
    pub r: u8,
    #[serde(rename = "F")]
    pub f: u8,
    #[serde(rename = "M")]
    pub m: u8,
    pub rfm_score: u8,
    pub segment: Segment,
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Quintile score of `v` within an ascending-sorted population.
///
/// Position is the first index holding a value >= v (binary search); a value
/// beyond the maximum takes the last index. Score is floor(pos / (n-1) * 5)
/// + 1, clamped to 1..=5.
fn quintile_score<T: Ord>(sorted: &[T], v: &T) -> u8 {
    let n = sorted.len();
    if n == 0 {
        return 1;
    }
    let mut pos = sorted.partition_point(|x| x < v);
    if pos >= n {
        pos = n - 1;
    }
    let score = (pos * 5) / std::cmp::max(n - 1, 1) + 1;
    score.clamp(1, 5) as u8
}

/// Recency scores invert: fewer days since last activity means a better rank.
fn inverted(score: u8) -> u8 {
    6 - score
}

/// Map a score triple to its segment. Rules are evaluated in a fixed order
/// and the first match wins; they are not mutually exclusive.
pub fn segment_for(r: u8, f: u8, m: u8) -> Segment {
    if r >= 4 && f >= 4 && m >= 4 {
        Segment::Champion
    } else if f >= 4 && m >= 4 {
        Segment::Loyal
    } else if r >= 4 && f >= 2 {
        Segment::Potential
    } else if r <= 2 && (f >= 3 || m >= 3) {
        Segment::AtRisk
    } else if r <= 2 && f <= 2 && m <= 2 {
        Segment::Lost
    } else {
        Segment::Other
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

struct RawMetrics<'a> {
    client: &'a Client,
    recency_days: i64,
    frequency: u64,
    monetary: Money,
    last_invoice_date: Option<DateTime<Utc>>,
}

/// Score every invoiced client on Recency / Frequency / Monetary and assign a
/// segment. Clients with zero invoices are excluded outright; invoices
/// referencing a client outside the snapshot are reported as skipped.
pub fn compute_rfm(
    clients: &[Client],
    invoices: &[Invoice],
    now: DateTime<Utc>,
) -> AnalyticsResult<ComputationOutput<Vec<RfmRecord>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let mut skipped: Vec<String> = Vec::new();

    let known: HashSet<&str> = clients.iter().map(|c| c.id.as_str()).collect();
    let mut invoices_by_client: HashMap<&str, Vec<&Invoice>> = HashMap::new();
    for inv in invoices {
        if known.contains(inv.client_id.as_str()) {
            invoices_by_client
                .entry(inv.client_id.as_str())
                .or_default()
                .push(inv);
        } else {
            skipped.push(inv.id.clone());
        }
    }
    if !skipped.is_empty() {
        warnings.push(format!(
            "{} invoice(s) reference a client outside this snapshot and were excluded.",
            skipped.len()
        ));
    }

    let mut raw: Vec<RawMetrics<'_>> = Vec::new();
    for client in clients {
        let Some(invs) = invoices_by_client.get(client.id.as_str()) else {
            continue; // zero-invoice clients get no synthetic row
        };

        // invoice_date preferred, paid_date as fallback signal
        let last_invoice_date = invs
            .iter()
            .filter_map(|inv| inv.invoice_date.or(inv.paid_date))
            .max();
        let recency_days = match last_invoice_date {
            Some(d) => now.signed_duration_since(d).num_days(),
            None => STALE_RECENCY_DAYS,
        };

        raw.push(RawMetrics {
            client,
            recency_days,
            frequency: invs.len() as u64,
            monetary: invs.iter().map(|inv| inv.amount).sum(),
            last_invoice_date,
        });
    }

    let mut rec_vals: Vec<i64> = raw.iter().map(|x| x.recency_days).collect();
    let mut freq_vals: Vec<u64> = raw.iter().map(|x| x.frequency).collect();
    let mut mon_vals: Vec<Money> = raw.iter().map(|x| x.monetary).collect();
    rec_vals.sort_unstable();
    freq_vals.sort_unstable();
    mon_vals.sort_unstable();

    let mut rows: Vec<RfmRecord> = raw
        .into_iter()
        .map(|x| {
            let r = inverted(quintile_score(&rec_vals, &x.recency_days));
            let f = quintile_score(&freq_vals, &x.frequency);
            let m = quintile_score(&mon_vals, &x.monetary);
            RfmRecord {
                client_id: x.client.id.clone(),
                client_name: x.client.name.clone(),
                recency_days: x.recency_days,
                frequency: x.frequency,
                monetary: x.monetary,
                last_invoice_date: x.last_invoice_date,
                r,
                f,
                m,
                rfm_score: r + f + m,
                segment: segment_for(r, f, m),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.rfm_score
            .cmp(&a.rfm_score)
            .then_with(|| b.monetary.cmp(&a.monetary))
    });

    Ok(with_metadata(
        "Quintile-scored Recency/Frequency/Monetary per invoiced client; recency inverted; fixed-order segment rules",
        &serde_json::json!({ "as_of": now, "stale_recency_days": STALE_RECENCY_DAYS }),
        warnings,
        skipped,
        start.elapsed().as_micros() as u64,
        rows,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
