use clap::Args;
use serde_json::Value;

use clientiq_core::aging::compute_aging;

use super::{load_snapshot, parse_now};

/// Arguments for AR aging
#[derive(Args)]
pub struct AgingArgs {
    /// Path to snapshot JSON (or pipe via stdin)
    #[arg(long)]
    pub input: Option<String>,

    /// Evaluation timestamp, RFC 3339 (defaults to the wall clock)
    #[arg(long)]
    pub now: Option<String>,
}

pub fn run_aging(args: AgingArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let snapshot = load_snapshot(&args.input)?;
    let now = parse_now(&args.now)?;
    let output = compute_aging(&snapshot.invoices, now)?;
    Ok(serde_json::to_value(&output)?)
}
