//! In-memory ledger used by unit tests

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use super::client::LedgerApi;
use super::models::{
    ApiError, Borrower, BorrowerRef, DeleteBorrowerRequest, NewBorrower, NewTransaction,
    Transaction,
};

/// Build a borrower with sensible defaults for the remaining fields
pub fn borrower(user_id: &str, name: &str, balance: f64) -> Borrower {
    Borrower {
        user_id: user_id.to_string(),
        name: name.to_string(),
        mobile: "9876543210".to_string(),
        balance,
        interest: 0.0,
        start_date: "01-01-2024 00:00:00".to_string(),
        end_date: "01-01-2025 00:00:00".to_string(),
        remarks: false,
        enabled: true,
    }
}

#[derive(Default)]
pub struct FakeLedger {
    pub borrowers: RefCell<Vec<Borrower>>,
    pub transactions: RefCell<HashMap<String, Vec<Transaction>>>,
    /// Served (front first) by `list_enabled_borrowers` before falling back to `borrowers`
    pub queued_listings: RefCell<VecDeque<Vec<Borrower>>>,
    pub fail_reads: Cell<bool>,
    pub fail_writes: Cell<bool>,
    pub borrower_reads: Cell<usize>,
    pub transaction_reads: Cell<usize>,
    pub writes: Cell<usize>,
    next_id: Cell<u32>,
}

impl FakeLedger {
    pub fn with_borrowers(borrowers: Vec<Borrower>) -> Self {
        Self {
            borrowers: RefCell::new(borrowers),
            ..Self::default()
        }
    }

    pub fn network_calls(&self) -> usize {
        self.borrower_reads.get() + self.transaction_reads.get() + self.writes.get()
    }

    fn read_failure(&self) -> Result<(), ApiError> {
        if self.fail_reads.get() {
            return Err(ApiError::ServerError(500, "boom".to_string()));
        }
        Ok(())
    }

    fn write_failure(&self) -> Result<(), ApiError> {
        self.writes.set(self.writes.get() + 1);
        if self.fail_writes.get() {
            return Err(ApiError::BadRequest("rejected".to_string()));
        }
        Ok(())
    }

    fn mint_id(&self, prefix: &str) -> String {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        format!("{}-{}", prefix, id)
    }
}

impl LedgerApi for FakeLedger {
    async fn list_enabled_borrowers(&self) -> Result<Vec<Borrower>, ApiError> {
        self.borrower_reads.set(self.borrower_reads.get() + 1);
        // Snapshot at call time, answer after a suspension point
        let snapshot = self
            .queued_listings
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| self.borrowers.borrow().clone());
        tokio::task::yield_now().await;
        self.read_failure()?;
        Ok(snapshot)
    }

    async fn create_borrower(&self, body: &NewBorrower) -> Result<Borrower, ApiError> {
        tokio::task::yield_now().await;
        self.write_failure()?;
        let created = Borrower {
            user_id: self.mint_id("user"),
            name: body.name.clone(),
            mobile: body.mobile.clone(),
            balance: body.balance,
            interest: 0.0,
            start_date: body.start_date.clone(),
            end_date: body.start_date.clone(),
            remarks: false,
            enabled: true,
        };
        self.borrowers.borrow_mut().push(created.clone());
        Ok(created)
    }

    async fn delete_borrower(&self, body: &DeleteBorrowerRequest) -> Result<(), ApiError> {
        tokio::task::yield_now().await;
        self.write_failure()?;
        self.borrowers
            .borrow_mut()
            .retain(|b| b.user_id != body.user_id);
        Ok(())
    }

    async fn list_transactions(&self, user_id: &str) -> Result<Vec<Transaction>, ApiError> {
        self.transaction_reads.set(self.transaction_reads.get() + 1);
        tokio::task::yield_now().await;
        self.read_failure()?;
        Ok(self
            .transactions
            .borrow()
            .get(user_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_transaction(&self, body: &NewTransaction) -> Result<Transaction, ApiError> {
        tokio::task::yield_now().await;
        self.write_failure()?;

        let mut borrowers = self.borrowers.borrow_mut();
        let owner = borrowers
            .iter_mut()
            .find(|b| b.user_id == body.user.user_id)
            .ok_or_else(|| ApiError::NotFound(body.user.user_id.clone()))?;
        owner.balance -= body.amount_paid;

        let created = Transaction {
            transaction_id: self.mint_id("tx"),
            user: Some(BorrowerRef { user_id: owner.user_id.clone() }),
            amount_paid: body.amount_paid,
            transaction_date: "18-10-2026 09:30:00".to_string(),
            balance: owner.balance,
            comment: body.comment.clone(),
        };
        self.transactions
            .borrow_mut()
            .entry(owner.user_id.clone())
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn health_check(&self) -> Result<String, ApiError> {
        self.read_failure()?;
        Ok("Server up and running".to_string())
    }
}
