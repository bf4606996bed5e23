use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use clientiq_core::summary::compute_client_summary;
use clientiq_core::AnalyticsError;

use super::{build_config, load_snapshot};

/// Arguments for the single-client drill-down
#[derive(Args)]
pub struct SummaryArgs {
    /// Path to snapshot JSON (or pipe via stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Client identifier to summarise
    #[arg(long)]
    pub client_id: String,

    /// Overhead rate override (0.25 = 25%)
    #[arg(long)]
    pub overhead_rate: Option<Decimal>,
}

pub fn run_summary(args: SummaryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot = load_snapshot(&args.input)?;
    let client = snapshot
        .clients
        .iter()
        .find(|c| c.id == args.client_id)
        .ok_or_else(|| AnalyticsError::UnknownClient(args.client_id.clone()))?;
    let config = build_config(args.overhead_rate, None);
    let output =
        compute_client_summary(client, &snapshot.projects, &snapshot.invoices, &config)?;
    Ok(serde_json::to_value(&output)?)
}
