use std::time::Instant;

use tracing::debug;

use crate::api::ledger::{ApiError, LedgerApi};
use crate::models::HealthReport;

/// Probe the ledger service and time the roundtrip
pub async fn check_health<A: LedgerApi>(api: &A, base_url: &str) -> Result<HealthReport, ApiError> {
    let start_time = Instant::now();
    let message = api.health_check().await?;
    let roundtrip_ms = start_time.elapsed().as_millis() as u64;
    debug!("Health check answered in {}ms", roundtrip_ms);

    Ok(HealthReport {
        base_url: base_url.to_string(),
        message,
        roundtrip_ms,
    })
}

pub fn format_health_report(report: &HealthReport) -> String {
    format!(
        "Pong! 🏓\n  Service:   {}\n  Status:    {}\n  Roundtrip: {}ms",
        report.base_url, report.message, report.roundtrip_ms
    )
}
