use std::rc::Rc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

use crate::api::ledger::{ApiError, Borrower, DeleteBorrowerRequest, LedgerApi, Transaction};
use crate::models::{CacheKey, FormField, QueryStatus, SortField, ViewQuery};
use crate::services::modal_service::{ModalController, ModalError, SubmissionId};
use crate::services::session_service::Session;
use crate::services::sync_service::{Mutation, SyncEvent, Synchronizer};
use crate::services::table_service;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewError {
    #[error("No borrower at row {0}")]
    NoSuchRow(usize),
    #[error("Borrower {0} is not in the list")]
    UnknownBorrower(String),
    #[error(transparent)]
    Modal(#[from] ModalError),
}

/// What the borrower table shows right now
#[derive(Debug)]
pub enum RowsView<'a> {
    Loading,
    Failed(&'a ApiError),
    Ready(Vec<&'a Borrower>),
}

/// What the history half of the transaction dialog shows
#[derive(Debug)]
pub enum HistoryView<'a> {
    Hidden,
    Loading,
    Failed(&'a ApiError),
    /// Loaded, nothing recorded yet
    Empty,
    Ready(&'a [Transaction]),
}

/// The logged-in screen: borrower list, search and sort, and the dialogs.
///
/// Created on login and dropped on logout, which discards every cached
/// collection and all view state with it.
pub struct LedgerView<A: LedgerApi + 'static> {
    session: Session,
    sync: Synchronizer<A>,
    query: ViewQuery,
    modal: ModalController,
    notices: Vec<String>,
}

impl<A: LedgerApi + 'static> LedgerView<A> {
    /// Mount the view; starts loading the borrower list
    pub fn new(session: Session, api: Rc<A>) -> Self {
        let mut sync = Synchronizer::new(api);
        sync.observe(CacheKey::AllBorrowers);
        Self {
            session,
            sync,
            query: ViewQuery::default(),
            modal: ModalController::default(),
            notices: Vec::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn sync(&self) -> &Synchronizer<A> {
        &self.sync
    }

    pub fn query(&self) -> &ViewQuery {
        &self.query
    }

    pub fn modal(&self) -> &ModalController {
        &self.modal
    }

    /// Unmount: drop caches and view state, end the session
    pub fn logout(self) {
        self.session.end();
    }

    pub fn rows(&self) -> RowsView<'_> {
        let state = self.sync.get(&CacheKey::AllBorrowers);
        match (state.status, state.error, state.data.and_then(|c| c.as_borrowers())) {
            (QueryStatus::Error, Some(error), _) => RowsView::Failed(error),
            (QueryStatus::Success, _, Some(borrowers)) => {
                RowsView::Ready(table_service::project(borrowers, &self.query))
            }
            _ => RowsView::Loading,
        }
    }

    /// Borrower shown at a 1-based row number of the current projection
    pub fn row(&self, number: usize) -> Option<&Borrower> {
        match self.rows() {
            RowsView::Ready(rows) => number.checked_sub(1).and_then(|i| rows.get(i).copied()),
            _ => None,
        }
    }

    fn borrower_at(&self, number: usize) -> Result<Borrower, ViewError> {
        self.row(number).cloned().ok_or(ViewError::NoSuchRow(number))
    }

    /// Look a borrower up by id in the loaded list, ignoring search and sort
    pub fn find_borrower(&self, user_id: &str) -> Result<Borrower, ViewError> {
        self.sync
            .get(&CacheKey::AllBorrowers)
            .data
            .and_then(|c| c.as_borrowers())
            .and_then(|all| all.iter().find(|b| b.user_id == user_id))
            .cloned()
            .ok_or_else(|| ViewError::UnknownBorrower(user_id.to_string()))
    }

    pub fn set_search(&mut self, search: &str) {
        self.query.search = search.to_string();
    }

    pub fn sort_by(&mut self, field: SortField) {
        self.query.sort.click(field);
    }

    /// Ask for a fresh borrower list
    pub fn refresh(&mut self) -> bool {
        self.sync.fetch(CacheKey::AllBorrowers)
    }

    /// Run a modal transition, then line the history observer up with it
    fn with_modal<R>(&mut self, f: impl FnOnce(&mut ModalController) -> R) -> R {
        let prev_history = self.modal.history_key();
        let prev_subject = self.modal.subject().map(|b| b.user_id.clone());

        let result = f(&mut self.modal);

        let history = self.modal.history_key();
        if history != prev_history {
            if let Some(key) = &prev_history {
                self.sync.unobserve(key);
            }
            if let Some(key) = history {
                self.sync.observe(key);
            }
        }

        let subject = self.modal.subject().map(|b| b.user_id.clone());
        if let Some(prev) = prev_subject {
            if subject.as_deref() != Some(prev.as_str()) {
                // Dialog closed or replaced: the next visit refetches
                self.sync.invalidate(&CacheKey::TransactionsOf(prev));
            }
        }

        result
    }

    pub fn open_create_borrower(&mut self, today: NaiveDate) -> Result<(), ViewError> {
        Ok(self.with_modal(|m| m.open_create_borrower(today))?)
    }

    pub fn select_row(&mut self, number: usize) -> Result<(), ViewError> {
        let borrower = self.borrower_at(number)?;
        Ok(self.with_modal(|m| m.select_borrower(borrower))?)
    }

    pub fn select_borrower(&mut self, user_id: &str) -> Result<(), ViewError> {
        let borrower = self.find_borrower(user_id)?;
        Ok(self.with_modal(|m| m.select_borrower(borrower))?)
    }

    pub fn toggle_history(&mut self) -> Result<(), ViewError> {
        Ok(self.with_modal(|m| m.toggle_history())?)
    }

    pub fn close_modal(&mut self) -> bool {
        self.with_modal(|m| m.close())
    }

    pub fn set_field(&mut self, field: FormField, value: &str) -> Result<(), ViewError> {
        Ok(self.modal.set_field(field, value)?)
    }

    /// Validate the open dialog and send its write
    pub fn submit(&mut self, today: NaiveDate) -> Result<SubmissionId, ViewError> {
        let (mutation, id) = self.modal.submit(today)?;
        self.sync.mutate(mutation, Some(id));
        Ok(id)
    }

    /// Row action: delete without confirmation
    pub fn delete_row(&mut self, number: usize) -> Result<Borrower, ViewError> {
        let borrower = self.borrower_at(number)?;
        self.delete(borrower)
    }

    /// Delete by id; unaffected by rows moving under a refetch
    pub fn delete_borrower(&mut self, user_id: &str) -> Result<Borrower, ViewError> {
        let borrower = self.find_borrower(user_id)?;
        self.delete(borrower)
    }

    fn delete(&mut self, borrower: Borrower) -> Result<Borrower, ViewError> {
        info!("Deleting borrower {} ({})", borrower.user_id, borrower.name);
        self.sync.mutate(
            Mutation::DeleteBorrower(DeleteBorrowerRequest::for_borrower(&borrower)),
            None,
        );
        Ok(borrower)
    }

    pub fn history(&self) -> HistoryView<'_> {
        let Some(key) = self.modal.history_key() else {
            return HistoryView::Hidden;
        };
        let state = self.sync.get(&key);
        match (state.status, state.error, state.data) {
            (QueryStatus::Error, Some(error), _) => HistoryView::Failed(error),
            (QueryStatus::Success, _, Some(data)) if data.is_empty() => HistoryView::Empty,
            (QueryStatus::Success, _, Some(data)) => match data.as_transactions() {
                Some(transactions) => HistoryView::Ready(transactions),
                None => HistoryView::Loading,
            },
            _ => HistoryView::Loading,
        }
    }

    /// Apply one completed request. Returns true when the screen changed.
    pub fn apply(&mut self, event: SyncEvent) -> bool {
        match event {
            SyncEvent::Fetched(outcome) => self.sync.apply_fetch(outcome),
            SyncEvent::Mutated(outcome) => {
                self.sync.apply_mutation(&outcome);
                if let Mutation::DeleteBorrower(body) = &outcome.mutation {
                    match &outcome.result {
                        Ok(_) => self.notices.push("Borrower deleted".to_string()),
                        Err(e) => {
                            warn!("Delete of borrower {} failed: {}", body.user_id, e);
                            self.notices.push(format!("Could not delete borrower: {}", e));
                        }
                    }
                }
                self.with_modal(|m| m.complete(&outcome));
                true
            }
        }
    }

    pub async fn next_event(&mut self) -> Option<SyncEvent> {
        self.sync.next_event().await
    }

    /// Apply completions until nothing is in flight
    pub async fn settle(&mut self) {
        while self.sync.has_pending() {
            match self.sync.next_event().await {
                Some(event) => {
                    self.apply(event);
                }
                None => break,
            }
        }
    }

    /// One-line messages queued for the operator since the last call
    pub fn take_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }
}
