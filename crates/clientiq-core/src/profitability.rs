use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::Instant;

use crate::kpis::{aggregate_invoices, margin_percent};
use crate::{types::*, AnalyticsResult};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientProfitability {
    pub client_id: String,
    pub client_name: String,
    pub tier: ClientTier,
    pub region: String,
    pub revenue: Money,
    pub hours_worked: Hours,
    pub profit: Money,
    pub margin_percent: Decimal,
    pub profit_per_hour: Money,
    pub outstanding_ar: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_invoice_date: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Rank clients by collected revenue.
///
/// Every client in the snapshot appears exactly once, zero-invoice clients
/// included (their derived fields are zero and the last invoice date absent).
/// Invoices and projects referencing a client outside the snapshot are kept
/// out of the rollups and reported as skipped. The sort is stable: revenue
/// ties keep the incoming client order.
pub fn compute_profitability(
    clients: &[Client],
    projects: &[Project],
    invoices: &[Invoice],
    config: &AnalyticsConfig,
) -> AnalyticsResult<ComputationOutput<Vec<ClientProfitability>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let mut skipped: Vec<String> = Vec::new();

    config.validate()?;

    let mut invoices_by_client: HashMap<&str, Vec<&Invoice>> = HashMap::new();
    let mut projects_by_client: HashMap<&str, Vec<&Project>> = HashMap::new();
    let known: HashSet<&str> = clients.iter().map(|c| c.id.as_str()).collect();

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
    for proj in projects {
        if known.contains(proj.client_id.as_str()) {
            projects_by_client
                .entry(proj.client_id.as_str())
                .or_default()
                .push(proj);
        } else {
            skipped.push(proj.id.clone());
        }
    }
    if !skipped.is_empty() {
        warnings.push(format!(
            "{} record(s) reference a client outside this snapshot and were excluded.",
            skipped.len()
        ));
    }

    let mut rows: Vec<ClientProfitability> = Vec::with_capacity(clients.len());
    for client in clients {
        let client_invoices = invoices_by_client
            .get(client.id.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();
        let client_projects = projects_by_client
            .get(client.id.as_str())
            .map(Vec::as_slice)
            .unwrap_or_default();

        let totals = aggregate_invoices(client_invoices.iter().copied());
        let hours_worked: Hours = client_projects.iter().map(|p| p.hours_worked).sum();

        let profit = totals.total_revenue * config.profit_factor();
        let profit_per_hour = if hours_worked > Decimal::ZERO {
            profit / hours_worked
        } else {
            Decimal::ZERO
        };

        let last_invoice_date = client_invoices
            .iter()
            .filter_map(|inv| inv.invoice_date)
            .max();

        rows.push(ClientProfitability {
            client_id: client.id.clone(),
            client_name: client.name.clone(),
            tier: client.tier,
            region: client.region.clone(),
            revenue: totals.total_revenue,
            hours_worked,
            profit,
            margin_percent: margin_percent(profit, totals.total_revenue),
            profit_per_hour,
            outstanding_ar: totals.outstanding_ar,
            last_invoice_date,
        });
    }

    // sort_by is stable, so revenue ties preserve snapshot order
    rows.sort_by(|a, b| b.revenue.cmp(&a.revenue));

    Ok(with_metadata(
        "Per-client revenue/AR rollup with flat-overhead profit, ranked by revenue descending; every client included",
        config,
        warnings,
        skipped,
        start.elapsed().as_micros() as u64,
        rows,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
