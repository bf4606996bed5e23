use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::{AnalyticsError, AnalyticsResult};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.25 = 25%). Never as percentages.
pub type Rate = Decimal;

/// Hour counts (billed or worked)
pub type Hours = Decimal;

/// Client pricing tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ClientTier {
    Enterprise,
    #[serde(rename = "SMB")]
    Smb,
    Freelance,
}

impl std::fmt::Display for ClientTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Enterprise => "Enterprise",
            Self::Smb => "SMB",
            Self::Freelance => "Freelance",
        };
        write!(f, "{}", s)
    }
}

/// Invoice payment status. `Unknown` absorbs unrecognized values so one bad
/// record cannot abort deserialization of a whole snapshot; it counts toward
/// neither revenue nor outstanding AR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Unpaid,
    Paid,
    Overdue,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    pub name: String,
    pub tier: ClientTier,
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    pub hourly_rate: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    /// Foreign reference to the owning client, not ownership.
    pub client_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub hourly_rate: Money,
    /// Snapshot of cumulative hours, not derived from invoices.
    #[serde(default)]
    pub hours_worked: Hours,
}

/// A billing record. Amounts default to zero and dates are optional so a
/// malformed record degrades per-field instead of failing the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub client_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default)]
    pub amount: Money,
    #[serde(default)]
    pub hours_billed: Hours,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<DateTime<Utc>>,
    pub status: InvoiceStatus,
}

impl Invoice {
    /// Paid-date / status consistency is NOT assumed: revenue comes from the
    /// status field alone, and a dangling paid_date is ignored.
    pub fn counts_as_revenue(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }

    pub fn counts_as_receivable(&self) -> bool {
        matches!(self.status, InvoiceStatus::Unpaid | InvoiceStatus::Overdue)
    }
}

/// One tenant's complete record set, as handed over by the persistence layer.
/// The analytics core treats this as an immutable snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantSnapshot {
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub invoices: Vec<Invoice>,
}

/// Tunable assumptions shared by every operation that prices profit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Fraction of revenue consumed by overhead (0.25 = 25%).
    pub overhead_rate: Rate,
    /// DSO is reported as configuration, not derived from the data.
    pub days_sales_outstanding: Decimal,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            overhead_rate: dec!(0.25),
            days_sales_outstanding: dec!(45.0),
        }
    }
}

impl AnalyticsConfig {
    pub fn validate(&self) -> AnalyticsResult<()> {
        if self.overhead_rate < Decimal::ZERO || self.overhead_rate >= Decimal::ONE {
            return Err(AnalyticsError::InvalidInput {
                field: "overhead_rate".into(),
                reason: format!("must be in [0, 1), got {}", self.overhead_rate),
            });
        }
        if self.days_sales_outstanding < Decimal::ZERO {
            return Err(AnalyticsError::InvalidInput {
                field: "days_sales_outstanding".into(),
                reason: "must be non-negative".into(),
            });
        }
        Ok(())
    }

    /// Share of revenue retained as profit: 1 − overhead_rate.
    pub fn profit_factor(&self) -> Rate {
        Decimal::ONE - self.overhead_rate
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    /// Identifiers of records excluded by per-record fault containment.
    pub skipped_records: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    skipped_records: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        skipped_records,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unknown_status_tolerated() {
        let json = r#"{
            "id": "inv-1",
            "client_id": "c-1",
            "amount": "100",
            "status": "disputed"
        }"#;
        let inv: Invoice = serde_json::from_str(json).unwrap();
        assert_eq!(inv.status, InvoiceStatus::Unknown);
        assert!(!inv.counts_as_revenue());
        assert!(!inv.counts_as_receivable());
        // missing hours default to zero
        assert_eq!(inv.hours_billed, Decimal::ZERO);
    }

    #[test]
    fn test_default_config() {
        let cfg = AnalyticsConfig::default();
        assert_eq!(cfg.overhead_rate, dec!(0.25));
        assert_eq!(cfg.days_sales_outstanding, dec!(45.0));
        assert_eq!(cfg.profit_factor(), dec!(0.75));
        cfg.validate().unwrap();
    }

    #[test]
    fn test_config_rejects_full_overhead() {
        let cfg = AnalyticsConfig {
            overhead_rate: Decimal::ONE,
            ..Default::default()
        };
        match cfg.validate().unwrap_err() {
            AnalyticsError::InvalidInput { field, .. } => assert_eq!(field, "overhead_rate"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_tier_wire_names() {
        assert_eq!(serde_json::to_string(&ClientTier::Smb).unwrap(), "\"SMB\"");
        assert_eq!(
            serde_json::to_string(&ClientTier::Enterprise).unwrap(),
            "\"Enterprise\""
        );
    }
}
