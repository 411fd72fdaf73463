use crate::api::ledger::ApiError;

/// Banner shown in place of data that failed to load
pub const GENERIC_FAILURE: &str = "Something went wrong!";

/// Turn a ledger failure into the one-line banner the operator sees.
///
/// Only the transport category is surfaced; server detail stays in the logs.
pub fn describe_failure(error: &ApiError) -> String {
    match error {
        ApiError::RequestError(_) => {
            "⚠️ Network Error: Could not reach the ledger service. Please try again.".to_string()
        }
        ApiError::Unauthorized(_) | ApiError::Forbidden(_) => {
            "⚠️ Access Denied: The ledger service rejected the API key.".to_string()
        }
        _ => format!("❌ {}", GENERIC_FAILURE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_detail_is_not_shown() {
        let message = describe_failure(&ApiError::BadRequest("column balance is null".to_string()));
        assert_eq!(message, "❌ Something went wrong!");
    }

    #[test]
    fn test_transport_failures_are_called_out() {
        let message = describe_failure(&ApiError::RequestError("connection refused".to_string()));
        assert!(message.contains("Network Error"));
    }
}
