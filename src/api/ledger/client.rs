use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client as HttpClient, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::models::{
    ApiError, Borrower, DeleteBorrowerRequest, ErrorResponse, NewBorrower, NewTransaction,
    Transaction,
};

const API_KEY_HEADER: &str = "x-api-key";

/// Operations the console needs from the ledger service.
///
/// Each method maps to exactly one HTTP request. Implementations do not
/// retry, cache or validate.
#[allow(async_fn_in_trait)]
pub trait LedgerApi {
    /// GET /users/enabled
    async fn list_enabled_borrowers(&self) -> Result<Vec<Borrower>, ApiError>;

    /// POST /users
    async fn create_borrower(&self, body: &NewBorrower) -> Result<Borrower, ApiError>;

    /// DELETE /users/{user_id}
    async fn delete_borrower(&self, body: &DeleteBorrowerRequest) -> Result<(), ApiError>;

    /// GET /transactions/user/{user_id}
    async fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>, ApiError>;

    /// POST /transactions
    async fn create_transaction(&self, body: &NewTransaction) -> Result<Transaction, ApiError>;

    /// GET /users/healthCheck
    async fn health_check(&self) -> Result<String, ApiError>;
}

/// Ledger service client over HTTP/JSON
pub struct LedgerClient {
    http_client: HttpClient,
    api_key: String,
    base_url: String,
}

impl LedgerClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Create default headers carrying the static API key
    fn create_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let key_value = HeaderValue::from_str(&self.api_key).map_err(|e| {
            ApiError::RequestError(format!("Failed to create api key header: {}", e))
        })?;
        headers.insert(HeaderName::from_static(API_KEY_HEADER), key_value);

        Ok(headers)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Parse error response based on HTTP status code
    async fn handle_error_response(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> ApiError {
        let status_code = status.as_u16();
        let body_text = response.text().await.unwrap_or_default();

        match status_code {
            400 => {
                // Spring puts the useful part under "message"
                let message = serde_json::from_str::<ErrorResponse>(&body_text)
                    .ok()
                    .and_then(|e| e.message);
                ApiError::BadRequest(message.unwrap_or(body_text))
            }
            401 => ApiError::Unauthorized(body_text),
            403 => ApiError::Forbidden(body_text),
            404 => ApiError::NotFound(body_text),
            500..=599 => {
                warn!("Ledger server error {}: {}", status_code, body_text);
                ApiError::ServerError(status_code, body_text)
            }
            _ => ApiError::HttpError(status_code, body_text),
        }
    }

    /// Send a prepared request and turn any non-2xx answer into an `ApiError`
    async fn execute(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let headers = self.create_headers()?;

        let response = request
            .headers(headers)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))
    }
}

impl LedgerApi for LedgerClient {
    async fn list_enabled_borrowers(&self) -> Result<Vec<Borrower>, ApiError> {
        let url = self.url("/users/enabled");
        debug!("GET {}", url);

        let response = self.execute(self.http_client.get(&url)).await?;
        Self::decode(response).await
    }

    async fn create_borrower(&self, body: &NewBorrower) -> Result<Borrower, ApiError> {
        let url = self.url("/users");
        debug!("POST {} ({})", url, body.name);

        let response = self.execute(self.http_client.post(&url).json(body)).await?;
        Self::decode(response).await
    }

    async fn delete_borrower(&self, body: &DeleteBorrowerRequest) -> Result<(), ApiError> {
        let url = self.url(&format!("/users/{}", body.user_id));
        debug!("DELETE {}", url);

        // The service answers with a plain-text confirmation; nothing to decode.
        self.execute(self.http_client.delete(&url).json(body)).await?;
        Ok(())
    }

    async fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>, ApiError> {
        let url = self.url(&format!("/transactions/user/{}", user_id));
        debug!("GET {}", url);

        let response = self.execute(self.http_client.get(&url)).await?;
        Self::decode(response).await
    }

    async fn create_transaction(&self, body: &NewTransaction) -> Result<Transaction, ApiError> {
        let url = self.url("/transactions");
        debug!("POST {} (user {})", url, body.user.user_id);

        let response = self.execute(self.http_client.post(&url).json(body)).await?;
        Self::decode(response).await
    }

    async fn health_check(&self) -> Result<String, ApiError> {
        let url = self.url("/users/healthCheck");

        let response = self.execute(self.http_client.get(&url)).await?;
        response
            .text()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to read response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_dropped() {
        let client = LedgerClient::new("http://localhost:8080/".to_string(), "key".to_string());
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url("/users/enabled"), "http://localhost:8080/users/enabled");
    }

    #[test]
    fn test_headers_carry_api_key() {
        let client = LedgerClient::new("http://localhost".to_string(), "secret-key".to_string());
        let headers = client.create_headers().expect("headers");
        assert_eq!(headers.get(API_KEY_HEADER).unwrap(), "secret-key");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn test_invalid_api_key_is_a_request_error() {
        let client = LedgerClient::new("http://localhost".to_string(), "bad\nkey".to_string());
        assert!(matches!(client.create_headers(), Err(ApiError::RequestError(_))));
    }
}
