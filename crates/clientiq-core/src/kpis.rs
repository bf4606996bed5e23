use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::{types::*, AnalyticsResult};

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiOutput {
    pub total_revenue: Money,
    pub gross_profit: Money,
    pub gross_margin_percent: Decimal,
    pub outstanding_ar: Money,
    pub days_sales_outstanding: Decimal,
    pub billable_hours: Hours,
}

/// Raw sums over an invoice slice, before any profit assumptions are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub total_revenue: Money,
    pub outstanding_ar: Money,
    pub billable_hours: Hours,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Sum an invoice slice into revenue, outstanding AR, and billable hours.
///
/// Revenue counts only paid invoices; AR counts unpaid and overdue ones;
/// hours count every invoice regardless of status (hours reflect work
/// performed, not payment state). Also reused by the profitability ranker and
/// the client drill-down.
pub fn aggregate_invoices<'a, I>(invoices: I) -> InvoiceTotals
where
    I: IntoIterator<Item = &'a Invoice>,
{
    let mut totals = InvoiceTotals::default();
    for inv in invoices {
        if inv.counts_as_revenue() {
            totals.total_revenue += inv.amount;
        } else if inv.counts_as_receivable() {
            totals.outstanding_ar += inv.amount;
        }
        totals.billable_hours += inv.hours_billed;
    }
    totals
}

/// Profit margin as a percentage; zero when revenue is zero.
pub fn margin_percent(profit: Money, revenue: Money) -> Decimal {
    if revenue > Decimal::ZERO {
        profit / revenue * dec!(100)
    } else {
        Decimal::ZERO
    }
}

/// Compute dashboard KPIs over a tenant's invoices.
pub fn compute_kpis(
    invoices: &[Invoice],
    config: &AnalyticsConfig,
) -> AnalyticsResult<ComputationOutput<KpiOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    config.validate()?;

    let totals = aggregate_invoices(invoices);
    let gross_profit = totals.total_revenue * config.profit_factor();
    let gross_margin_percent = margin_percent(gross_profit, totals.total_revenue);

    let unknown = invoices
        .iter()
        .filter(|inv| inv.status == InvoiceStatus::Unknown)
        .count();
    if unknown > 0 {
        warnings.push(format!(
            "{unknown} invoice(s) have an unrecognized status; excluded from revenue and AR but counted in billable hours."
        ));
    }

    let result = KpiOutput {
        total_revenue: totals.total_revenue,
        gross_profit,
        gross_margin_percent,
        outstanding_ar: totals.outstanding_ar,
        days_sales_outstanding: config.days_sales_outstanding,
        billable_hours: totals.billable_hours,
    };

    Ok(with_metadata(
        "Revenue from paid invoices; AR from unpaid/overdue; gross profit at a flat overhead rate; DSO reported from configuration",
        config,
        warnings,
        Vec::new(),
        start.elapsed().as_micros() as u64,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InvoiceStatus;
    use pretty_assertions::assert_eq;

    fn invoice(id: &str, amount: Decimal, hours: Decimal, status: InvoiceStatus) -> Invoice {
        Invoice {
            id: id.into(),
            client_id: "c-1".into(),
            project_id: None,
            amount,
            hours_billed: hours,
            invoice_date: None,
            due_date: None,
            paid_date: None,
            status,
        }
    }

    #[test]
    fn test_kpis_paid_and_unpaid_mix() {
        let invoices = vec![
            invoice("i-1", dec!(1000), dec!(10), InvoiceStatus::Paid),
            invoice("i-2", dec!(500), dec!(5), InvoiceStatus::Unpaid),
            invoice("i-3", dec!(250), dec!(2.5), InvoiceStatus::Overdue),
        ];
        let out = compute_kpis(&invoices, &AnalyticsConfig::default()).unwrap();
        let k = &out.result;

        assert_eq!(k.total_revenue, dec!(1000));
        assert_eq!(k.outstanding_ar, dec!(750));
        assert_eq!(k.gross_profit, dec!(750));
        assert_eq!(k.gross_margin_percent, dec!(75));
        // hours count every invoice regardless of status
        assert_eq!(k.billable_hours, dec!(17.5));
        assert_eq!(k.days_sales_outstanding, dec!(45.0));
    }

    #[test]
    fn test_kpis_empty_set_all_zero() {
        let out = compute_kpis(&[], &AnalyticsConfig::default()).unwrap();
        assert_eq!(out.result.total_revenue, Decimal::ZERO);
        assert_eq!(out.result.outstanding_ar, Decimal::ZERO);
        assert_eq!(out.result.billable_hours, Decimal::ZERO);
        // no divide-by-zero: margin defined as zero
        assert_eq!(out.result.gross_margin_percent, Decimal::ZERO);
    }

    #[test]
    fn test_kpis_overhead_rate_injected() {
        let invoices = vec![invoice("i-1", dec!(1000), dec!(8), InvoiceStatus::Paid)];
        let config = AnalyticsConfig {
            overhead_rate: dec!(0.40),
            days_sales_outstanding: dec!(30),
        };
        let out = compute_kpis(&invoices, &config).unwrap();
        assert_eq!(out.result.gross_profit, dec!(600.00));
        assert_eq!(out.result.gross_margin_percent, dec!(60));
        assert_eq!(out.result.days_sales_outstanding, dec!(30));
    }

    #[test]
    fn test_unknown_status_warned_not_counted() {
        let invoices = vec![
            invoice("i-1", dec!(100), dec!(1), InvoiceStatus::Paid),
            invoice("i-2", dec!(900), dec!(9), InvoiceStatus::Unknown),
        ];
        let out = compute_kpis(&invoices, &AnalyticsConfig::default()).unwrap();
        assert_eq!(out.result.total_revenue, dec!(100));
        assert_eq!(out.result.outstanding_ar, Decimal::ZERO);
        assert_eq!(out.result.billable_hours, dec!(10));
        assert!(out.warnings.iter().any(|w| w.contains("unrecognized")));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = AnalyticsConfig {
            overhead_rate: dec!(1.5),
            ..Default::default()
        };
        assert!(compute_kpis(&[], &config).is_err());
    }
}
