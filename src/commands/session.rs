use std::rc::Rc;

use crate::api::ledger::LedgerApi;
use crate::services::session_service::{Credentials, Session};
use crate::services::view_service::LedgerView;

use super::Screen;

pub fn login<A: LedgerApi + 'static>(
    screen: &mut Screen<A>,
    credentials: &Credentials,
    api: &Rc<A>,
    args: &[&str],
) -> Result<String, String> {
    if let Screen::LoggedIn(view) = screen {
        return Err(format!("Already logged in as {}", view.session().mobile()));
    }

    let mobile = args.first().copied().unwrap_or("");
    let password = args.get(1).copied().unwrap_or("");
    let session = Session::login(credentials, mobile, password).map_err(|e| e.to_string())?;

    let greeting = format!(
        "✅ Logged in as {} at {}. Loading borrowers...",
        session.mobile(),
        session.started_at().format("%H:%M")
    );
    *screen = Screen::LoggedIn(LedgerView::new(session, Rc::clone(api)));
    Ok(greeting)
}

pub fn logout<A: LedgerApi + 'static>(screen: &mut Screen<A>) -> Result<String, String> {
    match std::mem::replace(screen, Screen::LoggedOut) {
        Screen::LoggedIn(view) => {
            view.logout();
            Ok("👋 Logged out".to_string())
        }
        Screen::LoggedOut => Err("Not logged in".to_string()),
    }
}
