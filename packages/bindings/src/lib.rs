use chrono::{DateTime, Utc};
use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use clientiq_core::{AnalyticsConfig, TenantSnapshot};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Request envelope shared by every binding: the tenant snapshot plus
/// optional evaluation timestamp and assumption overrides.
#[derive(Deserialize)]
struct AnalyticsRequest {
    snapshot: TenantSnapshot,
    #[serde(default)]
    now: Option<DateTime<Utc>>,
    #[serde(default)]
    config: Option<AnalyticsConfig>,
}

impl AnalyticsRequest {
    fn parse(input_json: &str) -> NapiResult<Self> {
        serde_json::from_str(input_json).map_err(to_napi_error)
    }

    fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }

    fn config(&self) -> AnalyticsConfig {
        self.config.clone().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_kpis(input_json: String) -> NapiResult<String> {
    let req = AnalyticsRequest::parse(&input_json)?;
    let output = clientiq_core::kpis::compute_kpis(&req.snapshot.invoices, &req.config())
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compute_aging(input_json: String) -> NapiResult<String> {
    let req = AnalyticsRequest::parse(&input_json)?;
    let output = clientiq_core::aging::compute_aging(&req.snapshot.invoices, req.now())
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compute_profitability(input_json: String) -> NapiResult<String> {
    let req = AnalyticsRequest::parse(&input_json)?;
    let output = clientiq_core::profitability::compute_profitability(
        &req.snapshot.clients,
        &req.snapshot.projects,
        &req.snapshot.invoices,
        &req.config(),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compute_rfm(input_json: String) -> NapiResult<String> {
    let req = AnalyticsRequest::parse(&input_json)?;
    let output = clientiq_core::rfm::compute_rfm(
        &req.snapshot.clients,
        &req.snapshot.invoices,
        req.now(),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compute_revenue_by_month(input_json: String) -> NapiResult<String> {
    let req = AnalyticsRequest::parse(&input_json)?;
    let output = clientiq_core::revenue::compute_revenue_by_month(
        &req.snapshot.invoices,
        req.now(),
        &req.config(),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Clients
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_client_summary(input_json: String, client_id: String) -> NapiResult<String> {
    let req = AnalyticsRequest::parse(&input_json)?;
    let client = req
        .snapshot
        .clients
        .iter()
        .find(|c| c.id == client_id)
        .ok_or_else(|| to_napi_error(format!("Unknown client: {client_id}")))?;
    let output = clientiq_core::summary::compute_client_summary(
        client,
        &req.snapshot.projects,
        &req.snapshot.invoices,
        &req.config(),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
