pub mod client;
pub mod models;
#[cfg(test)]
pub mod fake;

pub use client::{LedgerApi, LedgerClient};
pub use models::{
    ApiError, Borrower, BorrowerRef, DeleteBorrowerRequest, NewBorrower, NewTransaction,
    Transaction,
};
