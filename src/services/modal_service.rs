use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use crate::api::ledger::{ApiError, Borrower};
use crate::models::{BorrowerForm, CacheKey, FieldError, FormField, TransactionForm};
use crate::services::sync_service::{Mutation, MutationOutcome};

/// Ties a write outcome back to the dialog that sent it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionId(u64);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModalError {
    #[error("Another dialog is already open")]
    DialogOpen,
    #[error("No dialog is open")]
    NoDialog,
    #[error("Still waiting for the previous submission")]
    Submitting,
    #[error("Go back from the history view first")]
    NotInEntry,
    #[error("Only the payment dialog has a history")]
    NoHistory,
    #[error("Some fields are invalid")]
    Invalid(Vec<FieldError>),
    #[error(transparent)]
    Field(#[from] FieldError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BorrowerDialog {
    pub form: BorrowerForm,
    pub pending: Option<SubmissionId>,
    /// Last failed submission
    pub error: Option<ApiError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDialog {
    /// Subject of the payment; fixed while the dialog is open
    pub borrower: Borrower,
    pub form: TransactionForm,
    pub pending: Option<SubmissionId>,
    pub error: Option<ApiError>,
}

impl TransactionDialog {
    fn new(borrower: Borrower) -> Self {
        Self {
            borrower,
            form: TransactionForm::default(),
            pending: None,
            error: None,
        }
    }
}

/// Which dialog is showing. At most one exists at any time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    CreateBorrower(BorrowerDialog),
    TransactionEntry(TransactionDialog),
    TransactionHistory(TransactionDialog),
}

#[derive(Debug, Default)]
pub struct ModalController {
    state: ModalState,
    next_submission: u64,
}

impl ModalController {
    pub fn state(&self) -> &ModalState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, ModalState::Closed)
    }

    /// Borrower of the open transaction dialog, in either mode
    pub fn subject(&self) -> Option<&Borrower> {
        match &self.state {
            ModalState::TransactionEntry(d) | ModalState::TransactionHistory(d) => {
                Some(&d.borrower)
            }
            _ => None,
        }
    }

    /// Collection the history view needs while it is showing
    pub fn history_key(&self) -> Option<CacheKey> {
        match &self.state {
            ModalState::TransactionHistory(d) => {
                Some(CacheKey::TransactionsOf(d.borrower.user_id.clone()))
            }
            _ => None,
        }
    }

    pub fn open_create_borrower(&mut self, today: NaiveDate) -> Result<(), ModalError> {
        if self.is_open() {
            return Err(ModalError::DialogOpen);
        }
        self.state = ModalState::CreateBorrower(BorrowerDialog {
            form: BorrowerForm::new(today),
            pending: None,
            error: None,
        });
        Ok(())
    }

    /// Open the payment dialog for a borrower. An open payment dialog for
    /// someone else is replaced with a fresh one.
    pub fn select_borrower(&mut self, borrower: Borrower) -> Result<(), ModalError> {
        match &self.state {
            ModalState::CreateBorrower(_) => return Err(ModalError::DialogOpen),
            ModalState::TransactionEntry(d) | ModalState::TransactionHistory(d)
                if d.borrower.user_id == borrower.user_id =>
            {
                return Ok(());
            }
            _ => {}
        }
        debug!("Opening transaction dialog for {}", borrower.user_id);
        self.state = ModalState::TransactionEntry(TransactionDialog::new(borrower));
        Ok(())
    }

    /// Switch between the payment form and the history table
    pub fn toggle_history(&mut self) -> Result<(), ModalError> {
        self.state = match std::mem::take(&mut self.state) {
            ModalState::TransactionEntry(d) => ModalState::TransactionHistory(d),
            ModalState::TransactionHistory(d) => ModalState::TransactionEntry(d),
            other => {
                let err = match other {
                    ModalState::Closed => ModalError::NoDialog,
                    _ => ModalError::NoHistory,
                };
                self.state = other;
                return Err(err);
            }
        };
        Ok(())
    }

    /// Close whatever is open, dropping form input and the history toggle
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        self.state = ModalState::Closed;
        was_open
    }

    pub fn set_field(&mut self, field: FormField, value: &str) -> Result<(), ModalError> {
        match &mut self.state {
            ModalState::Closed => Err(ModalError::NoDialog),
            ModalState::CreateBorrower(d) => Ok(d.form.set(field, value)?),
            ModalState::TransactionEntry(d) => Ok(d.form.set(field, value)?),
            ModalState::TransactionHistory(_) => Err(ModalError::NotInEntry),
        }
    }

    /// Whether the submit action is enabled
    pub fn can_submit(&self, today: NaiveDate) -> bool {
        match &self.state {
            ModalState::CreateBorrower(d) => d.pending.is_none() && d.form.is_valid(today),
            ModalState::TransactionEntry(d) => d.pending.is_none() && d.form.is_valid(),
            _ => false,
        }
    }

    /// Validate the open form and hand back the write to send
    pub fn submit(&mut self, today: NaiveDate) -> Result<(Mutation, SubmissionId), ModalError> {
        let id = SubmissionId(self.next_submission + 1);

        let mutation = match &mut self.state {
            ModalState::Closed => return Err(ModalError::NoDialog),
            ModalState::TransactionHistory(_) => return Err(ModalError::NotInEntry),
            ModalState::CreateBorrower(d) => {
                if d.pending.is_some() {
                    return Err(ModalError::Submitting);
                }
                let body = d.form.validate(today).map_err(ModalError::Invalid)?;
                d.pending = Some(id);
                d.error = None;
                Mutation::CreateBorrower(body)
            }
            ModalState::TransactionEntry(d) => {
                if d.pending.is_some() {
                    return Err(ModalError::Submitting);
                }
                let body = d
                    .form
                    .validate(&d.borrower.user_id)
                    .map_err(ModalError::Invalid)?;
                d.pending = Some(id);
                d.error = None;
                Mutation::CreateTransaction(body)
            }
        };

        self.next_submission += 1;
        Ok((mutation, id))
    }

    /// Route a write outcome to the dialog that sent it. Success closes the
    /// dialog, failure keeps it open with the inputs and the error.
    /// Returns false when the outcome belongs to no open dialog.
    pub fn complete(&mut self, outcome: &MutationOutcome) -> bool {
        let Some(submission) = outcome.submission else {
            return false;
        };

        let (pending, error) = match &mut self.state {
            ModalState::CreateBorrower(d) => (&mut d.pending, &mut d.error),
            ModalState::TransactionEntry(d) | ModalState::TransactionHistory(d) => {
                (&mut d.pending, &mut d.error)
            }
            ModalState::Closed => return false,
        };
        if *pending != Some(submission) {
            return false;
        }

        match &outcome.result {
            Ok(_) => {
                self.state = ModalState::Closed;
            }
            Err(e) => {
                *pending = None;
                *error = Some(e.clone());
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ledger::fake::borrower;
    use crate::services::sync_service::MutationResponse;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    fn outcome(
        submission: SubmissionId,
        mutation: Mutation,
        result: Result<MutationResponse, ApiError>,
    ) -> MutationOutcome {
        MutationOutcome {
            submission: Some(submission),
            mutation,
            result,
        }
    }

    #[test]
    fn test_only_one_dialog_at_a_time() {
        let mut modal = ModalController::default();
        modal.open_create_borrower(today()).unwrap();
        assert_eq!(
            modal.select_borrower(borrower("u1", "Rahul", 500.0)),
            Err(ModalError::DialogOpen)
        );
        assert_eq!(modal.open_create_borrower(today()), Err(ModalError::DialogOpen));

        modal.close();
        modal.select_borrower(borrower("u1", "Rahul", 500.0)).unwrap();
        assert_eq!(modal.open_create_borrower(today()), Err(ModalError::DialogOpen));
    }

    #[test]
    fn test_selecting_another_borrower_replaces_subject() {
        let mut modal = ModalController::default();
        modal.select_borrower(borrower("u1", "Rahul", 500.0)).unwrap();
        modal.set_field(FormField::Amount, "700").unwrap();
        modal.toggle_history().unwrap();

        modal.select_borrower(borrower("u2", "Asha", 90.0)).unwrap();
        match modal.state() {
            ModalState::TransactionEntry(d) => {
                assert_eq!(d.borrower.user_id, "u2");
                assert_eq!(d.form, TransactionForm::default());
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_reselecting_same_borrower_keeps_dialog() {
        let mut modal = ModalController::default();
        modal.select_borrower(borrower("u1", "Rahul", 500.0)).unwrap();
        modal.set_field(FormField::Amount, "700").unwrap();

        modal.select_borrower(borrower("u1", "Rahul", 500.0)).unwrap();
        match modal.state() {
            ModalState::TransactionEntry(d) => assert_eq!(d.form.amount, Some(700.0)),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_history_toggle_keeps_dialog_open() {
        let mut modal = ModalController::default();
        assert_eq!(modal.toggle_history(), Err(ModalError::NoDialog));

        modal.select_borrower(borrower("u1", "Rahul", 500.0)).unwrap();
        assert_eq!(modal.history_key(), None);

        modal.toggle_history().unwrap();
        assert_eq!(modal.history_key(), Some(CacheKey::TransactionsOf("u1".to_string())));
        assert_eq!(modal.set_field(FormField::Amount, "200"), Err(ModalError::NotInEntry));
        assert_eq!(modal.submit(today()).unwrap_err(), ModalError::NotInEntry);

        modal.toggle_history().unwrap();
        assert!(matches!(modal.state(), ModalState::TransactionEntry(_)));
    }

    #[test]
    fn test_history_needs_a_payment_dialog() {
        let mut modal = ModalController::default();
        modal.open_create_borrower(today()).unwrap();
        modal.set_field(FormField::Name, "Rahul").unwrap();

        assert_eq!(modal.toggle_history(), Err(ModalError::NoHistory));
        match modal.state() {
            ModalState::CreateBorrower(d) => assert_eq!(d.form.name, "Rahul"),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_close_resets_everything() {
        let mut modal = ModalController::default();
        modal.select_borrower(borrower("u1", "Rahul", 500.0)).unwrap();
        modal.set_field(FormField::Amount, "700").unwrap();
        modal.toggle_history().unwrap();

        assert!(modal.close());
        assert!(!modal.close());

        modal.select_borrower(borrower("u1", "Rahul", 500.0)).unwrap();
        match modal.state() {
            ModalState::TransactionEntry(d) => assert_eq!(d.form, TransactionForm::default()),
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_invalid_payment_is_blocked_before_sending() {
        let mut modal = ModalController::default();
        modal.select_borrower(borrower("u1", "Rahul", 500.0)).unwrap();
        modal.set_field(FormField::Amount, "50").unwrap();

        assert!(!modal.can_submit(today()));
        match modal.submit(today()) {
            Err(ModalError::Invalid(errors)) => assert_eq!(errors[0].field, FormField::Amount),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_successful_payment_closes_dialog() {
        let mut modal = ModalController::default();
        modal.select_borrower(borrower("u1", "Rahul", 500.0)).unwrap();
        modal.set_field(FormField::Amount, "150").unwrap();

        let (mutation, id) = modal.submit(today()).unwrap();
        assert!(matches!(&mutation, Mutation::CreateTransaction(b) if b.amount_paid == 150.0));
        assert_eq!(modal.submit(today()).unwrap_err(), ModalError::Submitting);
        assert!(!modal.can_submit(today()));

        assert!(modal.complete(&outcome(id, mutation, Ok(MutationResponse::Deleted))));
        assert_eq!(modal.state(), &ModalState::Closed);
    }

    #[test]
    fn test_failed_submission_keeps_inputs() {
        let mut modal = ModalController::default();
        modal.open_create_borrower(today()).unwrap();
        modal.set_field(FormField::Name, "Rahul").unwrap();
        modal.set_field(FormField::Mobile, "9876543210").unwrap();
        modal.set_field(FormField::Balance, "500").unwrap();

        let (mutation, id) = modal.submit(today()).unwrap();
        let failure = ApiError::ServerError(503, "down".to_string());
        assert!(modal.complete(&outcome(id, mutation, Err(failure.clone()))));

        match modal.state() {
            ModalState::CreateBorrower(d) => {
                assert_eq!(d.form.name, "Rahul");
                assert_eq!(d.pending, None);
                assert_eq!(d.error, Some(failure));
            }
            other => panic!("unexpected state {:?}", other),
        }
        // A retry is allowed again
        assert!(modal.can_submit(today()));
    }

    #[test]
    fn test_outcome_for_replaced_dialog_is_ignored() {
        let mut modal = ModalController::default();
        modal.select_borrower(borrower("u1", "Rahul", 500.0)).unwrap();
        let (mutation, id) = modal.submit(today()).unwrap();

        modal.select_borrower(borrower("u2", "Asha", 90.0)).unwrap();
        assert!(!modal.complete(&outcome(id, mutation, Ok(MutationResponse::Deleted))));
        assert_eq!(modal.subject().map(|b| b.user_id.as_str()), Some("u2"));
    }
}
