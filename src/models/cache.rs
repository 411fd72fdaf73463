//! Cache key and query status models

use crate::api::ledger::{Borrower, Transaction};

/// Names one cached ledger collection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Every enabled borrower, in server order
    AllBorrowers,
    /// Payment history of one borrower
    TransactionsOf(String),
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::AllBorrowers => write!(f, "all-borrowers"),
            CacheKey::TransactionsOf(user_id) => write!(f, "transactions/{}", user_id),
        }
    }
}

/// Lifecycle of a cached collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Payload held for a key
#[derive(Debug, Clone, PartialEq)]
pub enum Collection {
    Borrowers(Vec<Borrower>),
    Transactions(Vec<Transaction>),
}

impl Collection {
    pub fn len(&self) -> usize {
        match self {
            Collection::Borrowers(items) => items.len(),
            Collection::Transactions(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_borrowers(&self) -> Option<&[Borrower]> {
        match self {
            Collection::Borrowers(items) => Some(items),
            Collection::Transactions(_) => None,
        }
    }

    pub fn as_transactions(&self) -> Option<&[Transaction]> {
        match self {
            Collection::Transactions(items) => Some(items),
            Collection::Borrowers(_) => None,
        }
    }
}
