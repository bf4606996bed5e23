use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::kpis::{aggregate_invoices, margin_percent};
use crate::{types::*, AnalyticsResult};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Drill-down totals for a single client's detail view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSummary {
    pub client_id: String,
    pub client_name: String,
    pub total_revenue: Money,
    pub total_hours: Hours,
    pub outstanding_ar: Money,
    pub profit: Money,
    pub margin_percent: Decimal,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Summarise one client. The caller may pass the whole snapshot; records
/// belonging to other clients are ignored, not faults.
pub fn compute_client_summary(
    client: &Client,
    projects: &[Project],
    invoices: &[Invoice],
    config: &AnalyticsConfig,
) -> AnalyticsResult<ComputationOutput<ClientSummary>> {
    let start = Instant::now();

    config.validate()?;

    let totals = aggregate_invoices(invoices.iter().filter(|inv| inv.client_id == client.id));
    let total_hours: Hours = projects
        .iter()
        .filter(|p| p.client_id == client.id)
        .map(|p| p.hours_worked)
        .sum();

    let profit = totals.total_revenue * config.profit_factor();

    let result = ClientSummary {
        client_id: client.id.clone(),
        client_name: client.name.clone(),
        total_revenue: totals.total_revenue,
        total_hours,
        outstanding_ar: totals.outstanding_ar,
        profit,
        margin_percent: margin_percent(profit, totals.total_revenue),
    };

    Ok(with_metadata(
        "Single-client rollup: collected revenue, project hours, open AR, flat-overhead profit",
        config,
        Vec::new(),
        Vec::new(),
        start.elapsed().as_micros() as u64,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
