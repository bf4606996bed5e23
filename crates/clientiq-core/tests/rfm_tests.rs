use chrono::{DateTime, Duration, TimeZone, Utc};
use clientiq_core::profitability::compute_profitability;
use clientiq_core::rfm::{compute_rfm, Segment, STALE_RECENCY_DAYS};
use clientiq_core::{AnalyticsConfig, Client, ClientTier, Invoice, InvoiceStatus};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// RFM scorer tests
// ===========================================================================

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

fn client(id: &str) -> Client {
    Client {
        id: id.into(),
        name: format!("Client {id}"),
        tier: ClientTier::Smb,
        region: "Latin America".into(),
        contact_email: None,
        contact_phone: None,
        hourly_rate: dec!(110),
        created_at: None,
    }
}

fn invoice(id: &str, client_id: &str, amount: Decimal, days_ago: i64) -> Invoice {
    Invoice {
        id: id.into(),
        client_id: client_id.into(),
        project_id: None,
        amount,
        hours_billed: Decimal::ZERO,
        invoice_date: Some(now() - Duration::days(days_ago)),
        due_date: None,
        paid_date: None,
        status: InvoiceStatus::Paid,
    }
}

/// Five clients with strictly increasing activity on all three axes.
fn graded_population() -> (Vec<Client>, Vec<Invoice>) {
    let clients: Vec<Client> = ["c1", "c2", "c3", "c4", "c5"]
        .iter()
        .map(|id| client(id))
        .collect();
    let mut invoices = Vec::new();
    for (i, id) in ["c1", "c2", "c3", "c4", "c5"].iter().enumerate() {
        let days_ago = (150 - i * 30) as i64; // c1 stale, c5 fresh
        for k in 0..=i {
            invoices.push(invoice(
                &format!("{id}-{k}"),
                id,
                dec!(250) * Decimal::from(i as u32 + 1),
                days_ago,
            ));
        }
    }
    (clients, invoices)
}

#[test]
fn test_scores_stay_in_range() {
    let (clients, invoices) = graded_population();
    let out = compute_rfm(&clients, &invoices, now()).unwrap();
    for row in &out.result {
        assert!((1..=5).contains(&row.r), "R out of range: {}", row.r);
        assert!((1..=5).contains(&row.f), "F out of range: {}", row.f);
        assert!((1..=5).contains(&row.m), "M out of range: {}", row.m);
        assert!((3..=15).contains(&row.rfm_score));
        assert_eq!(row.rfm_score, row.r + row.f + row.m);
    }
}

#[test]
fn test_population_extremes_score_one_and_five() {
    let (clients, invoices) = graded_population();
    let out = compute_rfm(&clients, &invoices, now()).unwrap();

    let best = out.result.iter().find(|r| r.client_id == "c5").unwrap();
    assert_eq!((best.r, best.f, best.m), (5, 5, 5));
    assert_eq!(best.segment, Segment::Champion);

    let worst = out.result.iter().find(|r| r.client_id == "c1").unwrap();
    assert_eq!((worst.r, worst.f, worst.m), (1, 1, 1));
    assert_eq!(worst.segment, Segment::Lost);
}

#[test]
fn test_output_sorted_by_score_then_monetary() {
    let (clients, invoices) = graded_population();
    let out = compute_rfm(&clients, &invoices, now()).unwrap();
    for pair in out.result.windows(2) {
        assert!((pair[0].rfm_score, pair[0].monetary) >= (pair[1].rfm_score, pair[1].monetary));
    }
}

#[test]
fn test_zero_invoice_client_in_profitability_but_not_rfm() {
    let clients = vec![client("active"), client("dormant")];
    let invoices = vec![invoice("i-1", "active", dec!(100), 10)];

    let rfm = compute_rfm(&clients, &invoices, now()).unwrap();
    assert!(rfm.result.iter().all(|r| r.client_id != "dormant"));

    let prof =
        compute_profitability(&clients, &[], &invoices, &AnalyticsConfig::default()).unwrap();
    let dormant = prof.result.iter().find(|r| r.client_id == "dormant").unwrap();
    assert_eq!(dormant.revenue, Decimal::ZERO);
}

#[test]
fn test_recency_falls_back_to_paid_date_per_invoice() {
    // paid_date stands in only when an invoice has no invoice_date
    let clients = vec![client("a")];
    let mut dateless = invoice("i-1", "a", dec!(100), 0);
    dateless.invoice_date = None;
    dateless.paid_date = Some(now() - Duration::days(7));
    let invoices = vec![dateless, invoice("i-2", "a", dec!(100), 45)];
    let out = compute_rfm(&clients, &invoices, now()).unwrap();
    assert_eq!(out.result[0].recency_days, 7);
}

#[test]
fn test_dateless_client_ranks_last_on_recency() {
    let clients = vec![client("fresh"), client("limbo")];
    let mut dateless = invoice("i-limbo", "limbo", dec!(100), 0);
    dateless.invoice_date = None;
    let invoices = vec![invoice("i-fresh", "fresh", dec!(100), 3), dateless];

    let out = compute_rfm(&clients, &invoices, now()).unwrap();
    let limbo = out.result.iter().find(|r| r.client_id == "limbo").unwrap();
    let fresh = out.result.iter().find(|r| r.client_id == "fresh").unwrap();
    assert_eq!(limbo.recency_days, STALE_RECENCY_DAYS);
    assert!(limbo.r < fresh.r);
}

#[test]
fn test_monetary_ignores_payment_status() {
    // RFM's monetary metric is billing activity, not collected cash; compare
    // against the profitability ranker's paid-only revenue.
    let clients = vec![client("a")];
    let mut open = invoice("i-2", "a", dec!(800), 5);
    open.status = InvoiceStatus::Overdue;
    let invoices = vec![invoice("i-1", "a", dec!(200), 10), open];

    let rfm = compute_rfm(&clients, &invoices, now()).unwrap();
    assert_eq!(rfm.result[0].monetary, dec!(1000));

    let prof =
        compute_profitability(&clients, &[], &invoices, &AnalyticsConfig::default()).unwrap();
    assert_eq!(prof.result[0].revenue, dec!(200));
}

#[test]
fn test_idempotent_over_unmodified_snapshot() {
    let (clients, invoices) = graded_population();
    let a = compute_rfm(&clients, &invoices, now()).unwrap();
    let b = compute_rfm(&clients, &invoices, now()).unwrap();
    assert_eq!(
        serde_json::to_value(&a.result).unwrap(),
        serde_json::to_value(&b.result).unwrap()
    );
}
