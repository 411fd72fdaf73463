use serde::{Deserialize, Serialize};

/// Borrower account as served by `GET /users/enabled`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Borrower {
    pub user_id: String,
    pub name: String,
    pub mobile: String,
    pub balance: f64,
    pub interest: f64,
    /// `DD-MM-YYYY HH:mm:ss`
    pub start_date: String,
    /// `DD-MM-YYYY HH:mm:ss`
    pub end_date: String,
    #[serde(default)]
    pub remarks: bool,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

fn enabled_default() -> bool {
    true
}

/// Reference to a borrower by id only, as nested in transaction payloads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowerRef {
    pub user_id: String,
}

/// A recorded payment.
///
/// The per-borrower listing omits the owning borrower, while the create
/// endpoint echoes it back nested under `user`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub transaction_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<BorrowerRef>,
    pub amount_paid: f64,
    pub transaction_date: String,
    pub balance: f64,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Request body for POST /users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBorrower {
    pub name: String,
    pub mobile: String,
    pub balance: f64,
    /// Always midnight: `DD-MM-YYYY 00:00:00`
    pub start_date: String,
}

/// Request body for POST /transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub user: BorrowerRef,
    pub amount_paid: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Request body for DELETE /users/{user_id}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBorrowerRequest {
    pub user_id: String,
    pub balance: f64,
    pub amount: f64,
}

impl DeleteBorrowerRequest {
    /// The service settles the outstanding balance as the closing amount.
    pub fn for_borrower(borrower: &Borrower) -> Self {
        Self {
            user_id: borrower.user_id.clone(),
            balance: borrower.balance,
            amount: borrower.balance,
        }
    }
}

/// Error body some endpoints return alongside a non-2xx status.
/// Only the human-readable message is surfaced.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorResponse {
    pub message: Option<String>,
}

/// Failure of a single ledger service call
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// 400 Bad Request
    BadRequest(String),
    /// 401 Unauthorized (usually a wrong API key)
    Unauthorized(String),
    /// 403 Forbidden
    Forbidden(String),
    /// 404 Not Found
    NotFound(String),
    /// 5xx Server Error
    ServerError(u16, String),
    /// Other HTTP errors
    HttpError(u16, String),
    /// Network/request error
    RequestError(String),
    /// Deserialization error
    DeserializationError(String),
}

impl ApiError {
    /// HTTP status carried by the failure, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::BadRequest(_) => Some(400),
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Forbidden(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::ServerError(code, _) | ApiError::HttpError(code, _) => Some(*code),
            ApiError::RequestError(_) | ApiError::DeserializationError(_) => None,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::ServerError(code, msg) => write!(f, "Server Error ({}): {}", code, msg),
            ApiError::HttpError(code, msg) => write!(f, "HTTP Error ({}): {}", code, msg),
            ApiError::RequestError(msg) => write!(f, "Request Error: {}", msg),
            ApiError::DeserializationError(msg) => write!(f, "Deserialization Error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_borrower_decodes_camel_case() {
        let json = r#"{
            "userId": "8f1c",
            "mobile": "9876543210",
            "name": "Rahul",
            "startDate": "01-02-2024 00:00:00",
            "endDate": "01-02-2025 00:00:00",
            "balance": 5000.0,
            "interest": 125.5,
            "remarks": true,
            "enabled": true
        }"#;

        let borrower: Borrower = serde_json::from_str(json).expect("decode failed");
        assert_eq!(borrower.user_id, "8f1c");
        assert_eq!(borrower.balance, 5000.0);
        assert!(borrower.remarks);
    }

    #[test]
    fn test_error_body_keeps_message_only() {
        let json = r#"{
            "timestamp": "x",
            "status": 400,
            "error": "Bad Request",
            "message": "Mobile exists"
        }"#;
        let body: ErrorResponse = serde_json::from_str(json).expect("decode failed");
        assert_eq!(body.message.as_deref(), Some("Mobile exists"));
    }

    #[test]
    fn test_listed_transaction_has_no_owner() {
        let json = r#"{
            "transactionId": "t-1",
            "transactionDate": "03-02-2024 10:15:00",
            "comment": null,
            "amountPaid": 150.0,
            "balance": 4850.0
        }"#;

        let tx: Transaction = serde_json::from_str(json).expect("decode failed");
        assert_eq!(tx.user, None);
        assert_eq!(tx.comment, None);
    }

    #[test]
    fn test_created_transaction_carries_owner() {
        let json = r#"{
            "transactionId": "t-2",
            "user": {"userId": "8f1c", "name": "Rahul", "balance": 10.0},
            "transactionDate": "03-02-2024 10:15:00",
            "comment": "cash",
            "amountPaid": 150.0,
            "balance": 4850.0
        }"#;

        let tx: Transaction = serde_json::from_str(json).expect("decode failed");
        assert_eq!(tx.user.map(|u| u.user_id), Some("8f1c".to_string()));
    }

    #[test]
    fn test_new_transaction_omits_missing_comment() {
        let body = NewTransaction {
            user: BorrowerRef { user_id: "8f1c".to_string() },
            amount_paid: 150.0,
            comment: None,
        };

        let value = serde_json::to_value(&body).expect("encode failed");
        assert_eq!(value["user"]["userId"], "8f1c");
        assert_eq!(value["amountPaid"], 150.0);
        assert!(value.get("comment").is_none());
    }

    #[test]
    fn test_delete_request_settles_balance() {
        let borrower = Borrower {
            user_id: "b1".to_string(),
            name: "Asha".to_string(),
            mobile: "9123456780".to_string(),
            balance: 320.0,
            interest: 0.0,
            start_date: "01-01-2024 00:00:00".to_string(),
            end_date: "01-01-2025 00:00:00".to_string(),
            remarks: false,
            enabled: true,
        };

        let req = DeleteBorrowerRequest::for_borrower(&borrower);
        assert_eq!(req.amount, req.balance);
        assert_eq!(req.user_id, "b1");
    }
}
