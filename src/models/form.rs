//! Dialog form models and their field rules

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::api::ledger::{BorrowerRef, NewBorrower, NewTransaction};

/// Smallest opening balance accepted for a new borrower
pub const MIN_OPENING_BALANCE: f64 = 3.0;
/// Smallest payment accepted for a transaction
pub const MIN_PAYMENT: f64 = 100.0;
/// Amount prefilled in a fresh transaction form
pub const DEFAULT_PAYMENT: f64 = 100.0;

lazy_static! {
    /// Ten digit Indian mobile, optionally prefixed with 0 or 91
    static ref MOBILE_PATTERN: Regex = Regex::new(r"^(0|91)?[6-9][0-9]{9}$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Mobile,
    Balance,
    StartDate,
    Amount,
    Comment,
}

impl FormField {
    pub fn parse(input: &str) -> Option<FormField> {
        match input.to_lowercase().as_str() {
            "name" => Some(FormField::Name),
            "mobile" | "phone" => Some(FormField::Mobile),
            "balance" => Some(FormField::Balance),
            "start" | "date" | "startdate" => Some(FormField::StartDate),
            "amount" => Some(FormField::Amount),
            "comment" => Some(FormField::Comment),
            _ => None,
        }
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            FormField::Name => "Name",
            FormField::Mobile => "Mobile",
            FormField::Balance => "Balance",
            FormField::StartDate => "Creation Date",
            FormField::Amount => "Amount",
            FormField::Comment => "Comment",
        };
        write!(f, "{}", label)
    }
}

/// A field that fails its rule; blocks submission
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

impl FieldError {
    fn new(field: FormField, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

fn parse_amount(field: FormField, value: &str) -> Result<f64, FieldError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FieldError::new(field, "Expected a number"))
}

fn parse_date(value: &str) -> Result<NaiveDate, FieldError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%d-%m-%Y"))
        .map_err(|_| FieldError::new(FormField::StartDate, "Expected YYYY-MM-DD or DD-MM-YYYY"))
}

/// Inputs of the create-borrower dialog
#[derive(Debug, Clone, PartialEq)]
pub struct BorrowerForm {
    pub name: String,
    pub mobile: String,
    pub balance: Option<f64>,
    pub start_date: NaiveDate,
}

impl BorrowerForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            name: String::new(),
            mobile: String::new(),
            balance: None,
            start_date: today,
        }
    }

    /// Store one raw console input. Unparseable input leaves the field as it was.
    pub fn set(&mut self, field: FormField, value: &str) -> Result<(), FieldError> {
        match field {
            FormField::Name => self.name = value.to_string(),
            FormField::Mobile => self.mobile = value.trim().to_string(),
            FormField::Balance => self.balance = Some(parse_amount(field, value)?),
            FormField::StartDate => self.start_date = parse_date(value)?,
            FormField::Amount | FormField::Comment => {
                return Err(FieldError::new(field, "Not part of this form"))
            }
        }
        Ok(())
    }

    pub fn errors(&self, today: NaiveDate) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError::new(FormField::Name, "Required"));
        }
        if !MOBILE_PATTERN.is_match(&self.mobile) {
            errors.push(FieldError::new(FormField::Mobile, "Invalid Mobile"));
        }
        match self.balance {
            None => errors.push(FieldError::new(FormField::Balance, "Required")),
            Some(balance) if balance < MIN_OPENING_BALANCE => errors.push(FieldError::new(
                FormField::Balance,
                format!("Must be at least {}", MIN_OPENING_BALANCE),
            )),
            Some(_) => {}
        }
        if self.start_date > today {
            errors.push(FieldError::new(FormField::StartDate, "Cannot be in the future"));
        }

        errors
    }

    pub fn is_valid(&self, today: NaiveDate) -> bool {
        self.errors(today).is_empty()
    }

    /// Build the request body, or every field error if any rule fails
    pub fn validate(&self, today: NaiveDate) -> Result<NewBorrower, Vec<FieldError>> {
        let errors = self.errors(today);
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewBorrower {
            name: self.name.clone(),
            mobile: self.mobile.clone(),
            balance: self.balance.unwrap_or_default(),
            start_date: format!("{} 00:00:00", self.start_date.format("%d-%m-%Y")),
        })
    }
}

/// Inputs of the create-transaction dialog
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionForm {
    pub amount: Option<f64>,
    pub comment: String,
}

impl Default for TransactionForm {
    fn default() -> Self {
        Self {
            amount: Some(DEFAULT_PAYMENT),
            comment: String::new(),
        }
    }
}

impl TransactionForm {
    pub fn set(&mut self, field: FormField, value: &str) -> Result<(), FieldError> {
        match field {
            FormField::Amount => self.amount = Some(parse_amount(field, value)?),
            FormField::Comment => self.comment = value.to_string(),
            _ => return Err(FieldError::new(field, "Not part of this form")),
        }
        Ok(())
    }

    pub fn errors(&self) -> Vec<FieldError> {
        match self.amount {
            None => vec![FieldError::new(FormField::Amount, "Required")],
            Some(amount) if amount < MIN_PAYMENT => vec![FieldError::new(
                FormField::Amount,
                format!("Must be at least {}", MIN_PAYMENT),
            )],
            Some(_) => Vec::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    pub fn validate(&self, user_id: &str) -> Result<NewTransaction, Vec<FieldError>> {
        let errors = self.errors();
        if !errors.is_empty() {
            return Err(errors);
        }

        let comment = self.comment.trim();
        Ok(NewTransaction {
            user: BorrowerRef {
                user_id: user_id.to_string(),
            },
            amount_paid: self.amount.unwrap_or_default(),
            comment: if comment.is_empty() {
                None
            } else {
                Some(comment.to_string())
            },
        })
    }
}
