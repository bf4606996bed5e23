pub mod clients;
pub mod dashboard;
pub mod receivables;
pub mod sample;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use clientiq_core::{AnalyticsConfig, AnalyticsError, TenantSnapshot};

use crate::input;

/// Load a snapshot from --input, falling back to piped stdin.
pub fn load_snapshot(
    input_path: &Option<String>,
) -> Result<TenantSnapshot, Box<dyn std::error::Error>> {
    if let Some(ref path) = input_path {
        input::file::read_json(path)
    } else if let Some(data) = input::stdin::read_stdin()? {
        Ok(serde_json::from_value(data)?)
    } else {
        Err("Provide --input <snapshot.json> or pipe a snapshot via stdin".into())
    }
}

/// Evaluation timestamp: --now pins it (RFC 3339) for reproducible output,
/// otherwise the wall clock applies.
pub fn parse_now(now: &Option<String>) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    match now {
        Some(s) => Ok(DateTime::parse_from_rfc3339(s)
            .map_err(|e| AnalyticsError::DateError(format!("invalid --now '{}': {}", s, e)))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

/// Assemble the analytics assumptions from CLI overrides.
pub fn build_config(overhead_rate: Option<Decimal>, dso: Option<Decimal>) -> AnalyticsConfig {
    let mut config = AnalyticsConfig::default();
    if let Some(rate) = overhead_rate {
        config.overhead_rate = rate;
    }
    if let Some(days) = dso {
        config.days_sales_outstanding = days;
    }
    config
}
