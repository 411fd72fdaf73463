//! Health check models

/// Result of probing the ledger service
#[derive(Debug)]
pub struct HealthReport {
    pub base_url: String,
    pub message: String,
    pub roundtrip_ms: u64,
}
