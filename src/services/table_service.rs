use crate::api::ledger::Borrower;
use crate::models::ViewQuery;
use crate::utils::format_amount;

/// Whether a borrower matches an already trimmed, lower-cased search needle
pub fn matches(borrower: &Borrower, needle: &str) -> bool {
    needle.is_empty()
        || borrower.name.to_lowercase().contains(needle)
        || format_amount(borrower.balance).to_lowercase().contains(needle)
}

/// Rows to render for the current search and sort.
///
/// Always starts from the server order, so flipping the direction twice
/// lands back on the same rows. The sort is stable.
pub fn project<'a>(borrowers: &'a [Borrower], query: &ViewQuery) -> Vec<&'a Borrower> {
    let needle = query.search.trim().to_lowercase();
    let mut rows: Vec<&Borrower> = borrowers.iter().filter(|b| matches(b, &needle)).collect();

    if let Some(field) = query.sort.field {
        let key = field.key();
        let reversed = query.sort.reversed;
        // An unreversed column sorts descending
        rows.sort_by(|a, b| {
            let ordering = key.compare(a, b);
            if reversed {
                ordering
            } else {
                ordering.reverse()
            }
        });
    }

    rows
}
