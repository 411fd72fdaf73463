//! Data models for the ledger console
//!
//! Plain types shared by the services: cache keys and query status, the
//! sort specification, dialog forms, and health check results.

pub mod cache;
pub mod form;
pub mod ping;
pub mod sort;

// Re-export commonly used types for convenience
pub use cache::{CacheKey, Collection, QueryStatus};
pub use form::{BorrowerForm, FieldError, FormField, TransactionForm};
pub use ping::HealthReport;
pub use sort::{SortField, SortState, ViewQuery};
