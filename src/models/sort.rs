//! Sort and search specification for the borrower table

use std::cmp::Ordering;

use crate::api::ledger::Borrower;

/// Sortable borrower column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Mobile,
    Balance,
    Interest,
    StartDate,
    EndDate,
    Remarks,
}

/// Typed accessor chosen once per field
pub enum SortKey {
    Numeric(fn(&Borrower) -> f64),
    Text(fn(&Borrower) -> &str),
    /// Values of this column never reorder rows
    Unordered,
}

impl SortField {
    pub const ALL: [SortField; 7] = [
        SortField::Name,
        SortField::Mobile,
        SortField::Balance,
        SortField::Interest,
        SortField::StartDate,
        SortField::EndDate,
        SortField::Remarks,
    ];

    pub fn key(self) -> SortKey {
        match self {
            SortField::Name => SortKey::Text(|b| &b.name),
            SortField::Mobile => SortKey::Text(|b| &b.mobile),
            SortField::Balance => SortKey::Numeric(|b| b.balance),
            SortField::Interest => SortKey::Numeric(|b| b.interest),
            SortField::StartDate => SortKey::Text(|b| &b.start_date),
            SortField::EndDate => SortKey::Text(|b| &b.end_date),
            SortField::Remarks => SortKey::Unordered,
        }
    }

    /// Column header text
    pub fn label(self) -> &'static str {
        match self {
            SortField::Name => "Name",
            SortField::Mobile => "Mobile No.",
            SortField::Balance => "Balance (₹)",
            SortField::Interest => "Interest (₹)",
            SortField::StartDate => "Start Date",
            SortField::EndDate => "End Date",
            SortField::Remarks => "Remarks",
        }
    }

    /// Parse the column name typed at the console
    pub fn parse(input: &str) -> Option<SortField> {
        match input.to_lowercase().as_str() {
            "name" => Some(SortField::Name),
            "mobile" | "phone" => Some(SortField::Mobile),
            "balance" | "bal" => Some(SortField::Balance),
            "interest" => Some(SortField::Interest),
            "start" | "startdate" => Some(SortField::StartDate),
            "end" | "enddate" => Some(SortField::EndDate),
            "remarks" => Some(SortField::Remarks),
            _ => None,
        }
    }
}

impl SortKey {
    /// Order two borrowers ascending by this key
    pub fn compare(&self, a: &Borrower, b: &Borrower) -> Ordering {
        match self {
            SortKey::Numeric(get) => get(a).total_cmp(&get(b)),
            SortKey::Text(get) => collate(get(a), get(b)),
            SortKey::Unordered => Ordering::Equal,
        }
    }
}

/// Case-insensitive text ordering; on a case-only tie lowercase sorts first.
///
/// Letters compare by code point after folding, not by locale rules, so
/// accented letters land after `z` ("é" sorts after "f").
pub fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Column currently sorted and whether its direction was flipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub field: Option<SortField>,
    pub reversed: bool,
}

impl SortState {
    /// Header click: a new column starts unreversed (descending), the same
    /// column flips direction.
    pub fn click(&mut self, field: SortField) {
        self.reversed = if self.field == Some(field) {
            !self.reversed
        } else {
            false
        };
        self.field = Some(field);
    }

    pub fn is_sorted_by(&self, field: SortField) -> bool {
        self.field == Some(field)
    }
}

/// Everything the table projection depends on besides the rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewQuery {
    pub search: String,
    pub sort: SortState,
}
