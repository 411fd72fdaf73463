use chrono::NaiveDate;

use crate::api::ledger::LedgerApi;
use crate::services::render_service;
use crate::services::view_service::LedgerView;

use super::{parse_target, Target};

/// Open the payment dialog for a table row or a borrower id
pub fn pay<A: LedgerApi + 'static>(
    view: &mut LedgerView<A>,
    args: &[&str],
    today: NaiveDate,
) -> Result<String, String> {
    let selected = match parse_target(args)? {
        Target::Row(number) => view.select_row(number),
        Target::Id(user_id) => view.select_borrower(user_id),
    };
    selected.map_err(|e| e.to_string())?;
    render_service::render_modal(view, today).ok_or_else(|| "No dialog is open".to_string())
}

pub fn history<A: LedgerApi + 'static>(
    view: &mut LedgerView<A>,
    today: NaiveDate,
) -> Result<String, String> {
    view.toggle_history().map_err(|e| e.to_string())?;
    render_service::render_modal(view, today).ok_or_else(|| "No dialog is open".to_string())
}
