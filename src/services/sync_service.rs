use std::collections::HashMap;
use std::rc::Rc;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::api::ledger::{
    ApiError, Borrower, DeleteBorrowerRequest, LedgerApi, NewBorrower, NewTransaction, Transaction,
};
use crate::models::{CacheKey, Collection, QueryStatus};
use crate::services::modal_service::SubmissionId;

/// A write against the ledger service
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    CreateBorrower(NewBorrower),
    CreateTransaction(NewTransaction),
    DeleteBorrower(DeleteBorrowerRequest),
}

impl Mutation {
    /// Collections that no longer reflect the server once this write succeeds
    pub fn invalidates(&self) -> Vec<CacheKey> {
        match self {
            Mutation::CreateBorrower(_) | Mutation::DeleteBorrower(_) => {
                vec![CacheKey::AllBorrowers]
            }
            Mutation::CreateTransaction(body) => vec![
                CacheKey::AllBorrowers,
                CacheKey::TransactionsOf(body.user.user_id.clone()),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MutationResponse {
    Borrower(Borrower),
    Transaction(Transaction),
    Deleted,
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub(crate) key: CacheKey,
    pub(crate) generation: u64,
    pub(crate) result: Result<Collection, ApiError>,
}

#[derive(Debug)]
pub struct MutationOutcome {
    pub submission: Option<SubmissionId>,
    pub mutation: Mutation,
    pub result: Result<MutationResponse, ApiError>,
}

/// Completion of a background request, applied on the event loop
#[derive(Debug)]
pub enum SyncEvent {
    Fetched(FetchOutcome),
    Mutated(MutationOutcome),
}

#[derive(Debug)]
struct Entry {
    status: QueryStatus,
    data: Option<Collection>,
    error: Option<ApiError>,
    stale: bool,
    observers: usize,
    /// Generation of the fetch whose answer will be accepted
    in_flight: Option<u64>,
}

impl Default for Entry {
    fn default() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            stale: false,
            observers: 0,
            in_flight: None,
        }
    }
}

/// Read-only snapshot of one cached collection
#[derive(Debug, Clone, Copy)]
pub struct QueryState<'a> {
    pub status: QueryStatus,
    pub data: Option<&'a Collection>,
    pub error: Option<&'a ApiError>,
    pub is_fetching: bool,
}

/// Owns every cached ledger collection and the requests that fill them.
///
/// Requests run as local tasks; their completions come back as
/// [`SyncEvent`]s which the owner feeds into [`Synchronizer::apply_fetch`]
/// or [`Synchronizer::apply_mutation`] one at a time.
pub struct Synchronizer<A: LedgerApi + 'static> {
    api: Rc<A>,
    entries: HashMap<CacheKey, Entry>,
    events_tx: mpsc::UnboundedSender<SyncEvent>,
    events_rx: mpsc::UnboundedReceiver<SyncEvent>,
    next_generation: u64,
    pending: usize,
}

impl<A: LedgerApi + 'static> Synchronizer<A> {
    pub fn new(api: Rc<A>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            api,
            entries: HashMap::new(),
            events_tx,
            events_rx,
            next_generation: 0,
            pending: 0,
        }
    }

    pub fn get(&self, key: &CacheKey) -> QueryState<'_> {
        match self.entries.get(key) {
            Some(entry) => QueryState {
                status: entry.status,
                data: entry.data.as_ref(),
                error: entry.error.as_ref(),
                is_fetching: entry.in_flight.is_some(),
            },
            None => QueryState {
                status: QueryStatus::Idle,
                data: None,
                error: None,
                is_fetching: false,
            },
        }
    }

    #[cfg(test)]
    pub fn observers(&self, key: &CacheKey) -> usize {
        self.entries.get(key).map_or(0, |e| e.observers)
    }

    #[cfg(test)]
    pub fn is_stale(&self, key: &CacheKey) -> bool {
        self.entries.get(key).is_some_and(|e| e.stale)
    }

    /// Start watching a key; fetches when there is nothing current to show
    pub fn observe(&mut self, key: CacheKey) {
        let entry = self.entries.entry(key.clone()).or_default();
        entry.observers += 1;

        let needs_fetch =
            entry.stale || matches!(entry.status, QueryStatus::Idle | QueryStatus::Error);
        if needs_fetch {
            self.fetch(key);
        }
    }

    pub fn unobserve(&mut self, key: &CacheKey) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.observers = entry.observers.saturating_sub(1);
        }
    }

    /// Fetch a key unless a fetch for it is already in flight.
    /// Returns whether a request was issued.
    pub fn fetch(&mut self, key: CacheKey) -> bool {
        if self.entries.get(&key).is_some_and(|e| e.in_flight.is_some()) {
            debug!("Coalescing fetch of {} into the one in flight", key);
            return false;
        }
        self.start_fetch(key);
        true
    }

    /// Mark a key stale. Observed keys refetch at once, superseding any
    /// fetch in flight; unobserved keys wait for their next observer.
    pub fn invalidate(&mut self, key: &CacheKey) {
        let Some(entry) = self.entries.get_mut(key) else {
            return;
        };
        entry.stale = true;
        // Anything already in flight may predate the write
        entry.in_flight = None;

        if entry.observers > 0 {
            debug!("Invalidated {} with {} observer(s), refetching", key, entry.observers);
            self.start_fetch(key.clone());
        } else {
            debug!("Invalidated {} with no observers", key);
        }
    }

    fn start_fetch(&mut self, key: CacheKey) {
        self.next_generation += 1;
        let generation = self.next_generation;

        let entry = self.entries.entry(key.clone()).or_default();
        entry.in_flight = Some(generation);
        if entry.status != QueryStatus::Success {
            entry.status = QueryStatus::Loading;
        }

        debug!("Fetching {} (generation {})", key, generation);
        self.pending += 1;
        let api = Rc::clone(&self.api);
        let events_tx = self.events_tx.clone();
        tokio::task::spawn_local(async move {
            let result = match &key {
                CacheKey::AllBorrowers => api
                    .list_enabled_borrowers()
                    .await
                    .map(Collection::Borrowers),
                CacheKey::TransactionsOf(user_id) => api
                    .list_transactions(user_id)
                    .await
                    .map(Collection::Transactions),
            };
            // The receiver is gone once the view is dropped
            let _ = events_tx.send(SyncEvent::Fetched(FetchOutcome {
                key,
                generation,
                result,
            }));
        });
    }

    /// Send a write in the background
    pub fn mutate(&mut self, mutation: Mutation, submission: Option<SubmissionId>) {
        self.pending += 1;
        let api = Rc::clone(&self.api);
        let events_tx = self.events_tx.clone();
        tokio::task::spawn_local(async move {
            let result = match &mutation {
                Mutation::CreateBorrower(body) => api
                    .create_borrower(body)
                    .await
                    .map(MutationResponse::Borrower),
                Mutation::CreateTransaction(body) => api
                    .create_transaction(body)
                    .await
                    .map(MutationResponse::Transaction),
                Mutation::DeleteBorrower(body) => api
                    .delete_borrower(body)
                    .await
                    .map(|_| MutationResponse::Deleted),
            };
            let _ = events_tx.send(SyncEvent::Mutated(MutationOutcome {
                submission,
                mutation,
                result,
            }));
        });
    }

    /// Store a fetch result. Returns true when an observed collection changed.
    pub fn apply_fetch(&mut self, outcome: FetchOutcome) -> bool {
        let Some(entry) = self.entries.get_mut(&outcome.key) else {
            return false;
        };
        if entry.in_flight != Some(outcome.generation) {
            debug!(
                "Discarding superseded fetch of {} (generation {})",
                outcome.key, outcome.generation
            );
            return false;
        }
        entry.in_flight = None;

        match outcome.result {
            Ok(data) => {
                debug!("Fetched {} ({} item(s))", outcome.key, data.len());
                entry.data = Some(data);
                entry.error = None;
                entry.status = QueryStatus::Success;
                entry.stale = false;
            }
            Err(e) => {
                warn!("Failed to fetch {}: {}", outcome.key, e);
                entry.error = Some(e);
                entry.status = QueryStatus::Error;
            }
        }

        entry.observers > 0
    }

    /// Invalidate whatever a successful write made stale
    pub fn apply_mutation(&mut self, outcome: &MutationOutcome) {
        match &outcome.result {
            Ok(_) => {
                for key in outcome.mutation.invalidates() {
                    self.invalidate(&key);
                }
            }
            Err(e) => match e.status() {
                Some(status) => warn!("Ledger write rejected with status {}: {}", status, e),
                None => warn!("Ledger write failed: {}", e),
            },
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending > 0
    }

    /// Wait for the next completion. Never resolves while nothing is pending.
    pub async fn next_event(&mut self) -> Option<SyncEvent> {
        let event = self.events_rx.recv().await?;
        self.pending = self.pending.saturating_sub(1);
        Some(event)
    }
}
