use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::{types::*, AnalyticsResult};

/// Trailing window for the monthly revenue series.
const LOOKBACK_DAYS: i64 = 365;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueByMonth {
    /// Calendar month of the paid date, formatted YYYY-MM.
    pub month: String,
    pub revenue: Money,
    pub profit: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Collected revenue by calendar month over the trailing year.
///
/// Only paid invoices count, keyed by their paid date. A paid invoice with no
/// paid date carries no placement signal and is skipped individually.
pub fn compute_revenue_by_month(
    invoices: &[Invoice],
    now: DateTime<Utc>,
    config: &AnalyticsConfig,
) -> AnalyticsResult<ComputationOutput<Vec<RevenueByMonth>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();
    let mut skipped: Vec<String> = Vec::new();

    config.validate()?;
    let window_start = now - Duration::days(LOOKBACK_DAYS);

    let mut monthly: BTreeMap<String, Money> = BTreeMap::new();
    for inv in invoices.iter().filter(|inv| inv.counts_as_revenue()) {
        match inv.paid_date {
            Some(paid) if paid >= window_start => {
                let key = paid.format("%Y-%m").to_string();
                *monthly.entry(key).or_default() += inv.amount;
            }
            Some(_) => {} // outside the window, not a fault
            None => skipped.push(inv.id.clone()),
        }
    }

    if !skipped.is_empty() {
        warnings.push(format!(
            "{} paid invoice(s) have no paid date and were left out of the monthly series.",
            skipped.len()
        ));
    }

    let factor = config.profit_factor();
    let rows: Vec<RevenueByMonth> = monthly
        .into_iter()
        .map(|(month, revenue)| RevenueByMonth {
            month,
            revenue,
            profit: revenue * factor,
        })
        .collect();

    Ok(with_metadata(
        "Paid invoices grouped by paid-date month over the trailing 365 days",
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InvoiceStatus;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap()
    }

    fn paid_invoice(id: &str, amount: Decimal, paid: Option<DateTime<Utc>>) -> Invoice {
        Invoice {
            id: id.into(),
            client_id: "c-1".into(),
            project_id: None,
            amount,
            hours_billed: Decimal::ZERO,
            invoice_date: None,
            due_date: None,
            paid_date: paid,
            status: InvoiceStatus::Paid,
        }
    }

    #[test]
    fn test_grouped_by_month_ascending() {
        let invoices = vec![
            paid_invoice(
                "i-1",
                dec!(100),
                Some(Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap()),
            ),
            paid_invoice(
                "i-2",
                dec!(200),
                Some(Utc.with_ymd_and_hms(2024, 3, 25, 0, 0, 0).unwrap()),
            ),
            paid_invoice(
                "i-3",
                dec!(400),
                Some(Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap()),
            ),
        ];
        let out = compute_revenue_by_month(&invoices, now(), &AnalyticsConfig::default()).unwrap();
        assert_eq!(
            out.result,
            vec![
                RevenueByMonth {
                    month: "2024-03".into(),
                    revenue: dec!(300),
                    profit: dec!(225.00),
                },
                RevenueByMonth {
                    month: "2024-05".into(),
                    revenue: dec!(400),
                    profit: dec!(300.00),
                },
            ]
        );
    }

    #[test]
    fn test_old_and_unpaid_excluded() {
        let mut unpaid = paid_invoice("i-unpaid", dec!(999), Some(now()));
        unpaid.status = InvoiceStatus::Unpaid;
        let invoices = vec![
            unpaid,
            paid_invoice(
                "i-old",
                dec!(500),
                Some(Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap()),
            ),
        ];
        let out = compute_revenue_by_month(&invoices, now(), &AnalyticsConfig::default()).unwrap();
        assert!(out.result.is_empty());
        assert!(out.skipped_records.is_empty());
    }

    #[test]
    fn test_paid_without_paid_date_skipped() {
        let invoices = vec![paid_invoice("i-limbo", dec!(100), None)];
        let out = compute_revenue_by_month(&invoices, now(), &AnalyticsConfig::default()).unwrap();
        assert!(out.result.is_empty());
        assert_eq!(out.skipped_records, vec!["i-limbo".to_string()]);
    }
}
