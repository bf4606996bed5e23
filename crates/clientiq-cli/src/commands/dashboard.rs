use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use clientiq_core::kpis::compute_kpis;
use clientiq_core::profitability::compute_profitability;
use clientiq_core::revenue::compute_revenue_by_month;
use clientiq_core::rfm::compute_rfm;

use super::{build_config, load_snapshot, parse_now};

/// Arguments for the KPI dashboard
#[derive(Args)]
pub struct KpisArgs {
    /// Path to snapshot JSON (or pipe via stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Overhead rate override (0.25 = 25%)
    #[arg(long)]
    pub overhead_rate: Option<Decimal>,

    /// Days-sales-outstanding to report
    #[arg(long)]
    pub dso: Option<Decimal>,
}

/// Arguments for the profitability ranking
#[derive(Args)]
pub struct ProfitabilityArgs {
    /// Path to snapshot JSON (or pipe via stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Overhead rate override (0.25 = 25%)
    #[arg(long)]
    pub overhead_rate: Option<Decimal>,
}

/// Arguments for RFM scoring
#[derive(Args)]
pub struct RfmArgs {
    /// Path to snapshot JSON (or pipe via stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Evaluation timestamp, RFC 3339 (defaults to the wall clock)
    #[arg(long)]
    pub now: Option<String>,
}

/// Arguments for the monthly revenue series
#[derive(Args)]
pub struct RevenueArgs {
    /// Path to snapshot JSON (or pipe via stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Evaluation timestamp, RFC 3339 (defaults to the wall clock)
    #[arg(long)]
    pub now: Option<String>,

    /// Overhead rate override (0.25 = 25%)
    #[arg(long)]
    pub overhead_rate: Option<Decimal>,
}

pub fn run_kpis(args: KpisArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot = load_snapshot(&args.input)?;
    let config = build_config(args.overhead_rate, args.dso);
    let output = compute_kpis(&snapshot.invoices, &config)?;
    Ok(serde_json::to_value(&output)?)
}

pub fn run_profitability(args: ProfitabilityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot = load_snapshot(&args.input)?;
    let config = build_config(args.overhead_rate, None);
    let output = compute_profitability(
        &snapshot.clients,
        &snapshot.projects,
        &snapshot.invoices,
        &config,
    )?;
    Ok(serde_json::to_value(&output)?)
}

pub fn run_rfm(args: RfmArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot = load_snapshot(&args.input)?;
    let now = parse_now(&args.now)?;
    let output = compute_rfm(&snapshot.clients, &snapshot.invoices, now)?;
    Ok(serde_json::to_value(&output)?)
}

pub fn run_revenue_by_month(args: RevenueArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot = load_snapshot(&args.input)?;
    let now = parse_now(&args.now)?;
    let config = build_config(args.overhead_rate, None);
    let output = compute_revenue_by_month(&snapshot.invoices, now, &config)?;
    Ok(serde_json::to_value(&output)?)
}
