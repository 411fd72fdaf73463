use crate::api::ledger::LedgerApi;
use crate::services::ping_service;
use crate::utils::describe_failure;

pub async fn execute<A: LedgerApi>(api: &A, base_url: &str) -> Result<String, String> {
    let report = ping_service::check_health(api, base_url)
        .await
        .map_err(|e| describe_failure(&e))?;
    Ok(ping_service::format_health_report(&report))
}
