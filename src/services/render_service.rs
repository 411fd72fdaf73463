use chrono::NaiveDate;

use crate::api::ledger::{ApiError, Borrower, LedgerApi, Transaction};
use crate::models::{CacheKey, FieldError, SortField, SortState};
use crate::services::modal_service::{BorrowerDialog, ModalState, TransactionDialog};
use crate::services::view_service::{HistoryView, LedgerView, RowsView};
use crate::utils::{describe_failure, format_amount, format_ledger_date, tel_link, Table};

const NOTHING_FOUND: &str = "Nothing found";
const REMARK_MARKER: &str = "⚠";

fn sort_indicator(sort: &SortState, field: SortField) -> &'static str {
    match (sort.is_sorted_by(field), sort.reversed) {
        (true, false) => "▼",
        (true, true) => "▲",
        (false, _) => "↕",
    }
}

/// Column headers, each with its sort indicator
pub fn borrower_headers(sort: &SortState) -> Vec<String> {
    let mut headers = vec!["#".to_string()];
    headers.extend(
        SortField::ALL
            .iter()
            .map(|&field| format!("{} {}", field.label(), sort_indicator(sort, field))),
    );
    headers
}

fn borrower_row(number: usize, borrower: &Borrower) -> Vec<String> {
    vec![
        number.to_string(),
        borrower.name.clone(),
        tel_link(&borrower.mobile),
        format_amount(borrower.balance),
        format_amount(borrower.interest),
        format_ledger_date(&borrower.start_date),
        format_ledger_date(&borrower.end_date),
        if borrower.remarks { REMARK_MARKER.to_string() } else { String::new() },
    ]
}

pub fn render_rows(rows: &RowsView<'_>, sort: &SortState) -> String {
    match rows {
        RowsView::Loading => "⏳ Loading borrowers...".to_string(),
        RowsView::Failed(error) => describe_failure(error),
        RowsView::Ready(borrowers) => {
            let headers = borrower_headers(sort);
            let mut table = Table::new(headers.as_slice());
            if borrowers.is_empty() {
                table.add_note(NOTHING_FOUND);
            }
            for (i, borrower) in borrowers.iter().enumerate() {
                table.add_row(borrower_row(i + 1, borrower));
            }
            table.render()
        }
    }
}

/// Payment history of one borrower; every row repeats the borrower's name
pub fn render_history(name: &str, history: &HistoryView<'_>) -> String {
    match history {
        HistoryView::Hidden => String::new(),
        HistoryView::Loading => "⏳ Loading transactions...".to_string(),
        HistoryView::Failed(error) => describe_failure(error),
        HistoryView::Empty => history_table(name, &[]),
        HistoryView::Ready(transactions) => history_table(name, transactions),
    }
}

fn history_table(name: &str, transactions: &[Transaction]) -> String {
    let mut table = Table::new(&[
        "Name",
        "Transaction Date",
        "Amount Paid (₹)",
        "Balance (₹)",
        "Comment",
    ]);
    if transactions.is_empty() {
        table.add_note(NOTHING_FOUND);
    }
    for tx in transactions {
        table.add_row(vec![
            name.to_string(),
            format_ledger_date(&tx.transaction_date),
            format_amount(tx.amount_paid),
            format_amount(tx.balance),
            tx.comment.clone().unwrap_or_default(),
        ]);
    }
    table.render()
}

fn submission_lines(
    out: &mut Vec<String>,
    pending: bool,
    error: Option<&ApiError>,
    field_errors: &[FieldError],
) {
    for e in field_errors {
        out.push(format!("  ✗ {}", e));
    }
    if let Some(error) = error {
        out.push(format!("  {}", describe_failure(error)));
    }
    if pending {
        out.push("  ⏳ Submitting...".to_string());
    }
}

fn borrower_dialog(dialog: &BorrowerDialog, today: NaiveDate) -> String {
    let form = &dialog.form;
    let mut out = vec![
        "── Add Borrower ──".to_string(),
        format!("  Name:          {}", form.name),
        format!("  Mobile:        {}", form.mobile),
        format!(
            "  Balance (₹):   {}",
            form.balance.map(format_amount).unwrap_or_default()
        ),
        format!("  Creation Date: {}", form.start_date.format("%d %b %Y")),
    ];
    let errors = form.errors(today);
    submission_lines(&mut out, dialog.pending.is_some(), dialog.error.as_ref(), &errors);
    out.push("  set <name|mobile|balance|date> <value>, submit, cancel".to_string());
    out.join("\n")
}

fn transaction_header(dialog: &TransactionDialog) -> Vec<String> {
    let b = &dialog.borrower;
    vec![
        format!("── {} ──", b.name),
        format!(
            "  {}  Balance: ₹{}  Interest: ₹{}",
            tel_link(&b.mobile),
            format_amount(b.balance),
            format_amount(b.interest)
        ),
    ]
}

fn transaction_entry(dialog: &TransactionDialog) -> String {
    let form = &dialog.form;
    let mut out = transaction_header(dialog);
    out.push(format!(
        "  Amount (₹): {}",
        form.amount.map(format_amount).unwrap_or_default()
    ));
    out.push(format!("  Comment:    {}", form.comment));
    let errors = form.errors();
    submission_lines(&mut out, dialog.pending.is_some(), dialog.error.as_ref(), &errors);
    out.push("  set <amount|comment> <value>, submit, history, cancel".to_string());
    out.join("\n")
}

fn transaction_history(dialog: &TransactionDialog, history: &HistoryView<'_>) -> String {
    let mut out = transaction_header(dialog);
    out.push(render_history(&dialog.borrower.name, history));
    out.push("  history to go back, cancel to close".to_string());
    out.join("\n")
}

fn with_submit_hint<A: LedgerApi + 'static>(
    dialog: String,
    view: &LedgerView<A>,
    today: NaiveDate,
) -> String {
    if view.modal().can_submit(today) {
        format!("{}\n  ✓ Ready to submit", dialog)
    } else {
        dialog
    }
}

/// The open dialog, if any
pub fn render_modal<A: LedgerApi + 'static>(
    view: &LedgerView<A>,
    today: NaiveDate,
) -> Option<String> {
    match view.modal().state() {
        ModalState::Closed => None,
        ModalState::CreateBorrower(d) => {
            Some(with_submit_hint(borrower_dialog(d, today), view, today))
        }
        ModalState::TransactionEntry(d) => {
            Some(with_submit_hint(transaction_entry(d), view, today))
        }
        ModalState::TransactionHistory(d) => Some(transaction_history(d, &view.history())),
    }
}

/// Full screen: search line, borrower table, and the open dialog below it
pub fn render_screen<A: LedgerApi + 'static>(view: &LedgerView<A>, today: NaiveDate) -> String {
    let mut out = Vec::new();
    let query = view.query();
    if !query.search.trim().is_empty() {
        out.push(format!("🔍 {}", query.search.trim()));
    }
    if view.sync().get(&CacheKey::AllBorrowers).is_fetching {
        out.push("⟳ refreshing".to_string());
    }
    out.push(render_rows(&view.rows(), &query.sort));
    if let Some(modal) = render_modal(view, today) {
        out.push(modal);
    }
    out.join("\n")
}
