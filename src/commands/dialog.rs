use chrono::NaiveDate;

use crate::api::ledger::LedgerApi;
use crate::models::FormField;
use crate::services::modal_service::ModalError;
use crate::services::render_service;
use crate::services::view_service::{LedgerView, ViewError};

pub fn set<A: LedgerApi + 'static>(
    view: &mut LedgerView<A>,
    args: &[&str],
    today: NaiveDate,
) -> Result<String, String> {
    let (name, value) = match args.split_first() {
        Some((name, rest)) => (*name, rest.join(" ")),
        None => return Err("Usage: set <field> <value>".to_string()),
    };
    let field = FormField::parse(name).ok_or_else(|| format!("Unknown field: {}", name))?;
    view.set_field(field, &value).map_err(|e| e.to_string())?;
    render_service::render_modal(view, today).ok_or_else(|| "No dialog is open".to_string())
}

pub fn submit<A: LedgerApi + 'static>(
    view: &mut LedgerView<A>,
    today: NaiveDate,
) -> Result<String, String> {
    match view.submit(today) {
        Ok(_) => Ok("⏳ Submitting...".to_string()),
        Err(ViewError::Modal(ModalError::Invalid(errors))) => Err(errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")),
        Err(e) => Err(e.to_string()),
    }
}

pub fn cancel<A: LedgerApi + 'static>(view: &mut LedgerView<A>) -> Result<String, String> {
    if view.close_modal() {
        Ok("Dialog closed".to_string())
    } else {
        Err("No dialog is open".to_string())
    }
}
