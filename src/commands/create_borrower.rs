use chrono::NaiveDate;

use crate::api::ledger::LedgerApi;
use crate::services::render_service;
use crate::services::view_service::LedgerView;

pub fn execute<A: LedgerApi + 'static>(
    view: &mut LedgerView<A>,
    today: NaiveDate,
) -> Result<String, String> {
    view.open_create_borrower(today).map_err(|e| e.to_string())?;
    render_service::render_modal(view, today).ok_or_else(|| "Dialog did not open".to_string())
}
