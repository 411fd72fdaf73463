use chrono::NaiveDate;

use crate::api::ledger::LedgerApi;
use crate::models::SortField;
use crate::services::render_service;
use crate::services::view_service::LedgerView;

use super::{parse_target, Target};

pub fn list<A: LedgerApi + 'static>(view: &LedgerView<A>, today: NaiveDate) -> String {
    render_service::render_screen(view, today)
}

/// An empty search shows every borrower again
pub fn search<A: LedgerApi + 'static>(
    view: &mut LedgerView<A>,
    args: &[&str],
    today: NaiveDate,
) -> String {
    view.set_search(&args.join(" "));
    render_service::render_screen(view, today)
}

pub fn sort<A: LedgerApi + 'static>(
    view: &mut LedgerView<A>,
    args: &[&str],
    today: NaiveDate,
) -> Result<String, String> {
    let column = args
        .first()
        .ok_or("Usage: sort <name|mobile|balance|interest|start|end|remarks>")?;
    let field = SortField::parse(column).ok_or_else(|| format!("Unknown column: {}", column))?;
    view.sort_by(field);
    Ok(render_service::render_screen(view, today))
}

pub fn refresh<A: LedgerApi + 'static>(view: &mut LedgerView<A>) -> String {
    if view.refresh() {
        "⟳ Refreshing borrowers...".to_string()
    } else {
        "⟳ Already refreshing".to_string()
    }
}

/// Delete by row of the current table, or by `id:<userId>` when rows may
/// have moved since they were shown
pub fn delete<A: LedgerApi + 'static>(
    view: &mut LedgerView<A>,
    args: &[&str],
) -> Result<String, String> {
    let deleted = match parse_target(args)? {
        Target::Row(number) => view.delete_row(number),
        Target::Id(user_id) => view.delete_borrower(user_id),
    }
    .map_err(|e| e.to_string())?;
    Ok(format!("🗑 Deleting {} ({})...", deleted.name, deleted.user_id))
}
