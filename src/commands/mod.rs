pub mod borrowers;
pub mod create_borrower;
pub mod dialog;
pub mod help;
pub mod ping;
pub mod session;
pub mod transaction;

use std::rc::Rc;

use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

use crate::api::ledger::LedgerApi;
use crate::services::render_service;
use crate::services::session_service::Credentials;
use crate::services::sync_service::SyncEvent;
use crate::services::view_service::LedgerView;

/// What the console shows: the login prompt or the ledger
pub enum Screen<A: LedgerApi + 'static> {
    LoggedOut,
    LoggedIn(LedgerView<A>),
}

/// What the input loop should do after a line
#[derive(Debug, PartialEq)]
pub enum Flow {
    Print(String),
    Quit,
    Nothing,
}

pub struct Console<A: LedgerApi + 'static> {
    api: Rc<A>,
    base_url: String,
    credentials: Credentials,
    screen: Screen<A>,
}

/// Borrower named by a command: a row of the current table or `id:<userId>`
#[derive(Debug, PartialEq)]
pub enum Target<'a> {
    Row(usize),
    Id(&'a str),
}

fn parse_target<'a>(args: &[&'a str]) -> Result<Target<'a>, String> {
    let raw = *args.first().ok_or("Missing row number or id:<userId>")?;
    if let Some(user_id) = raw.strip_prefix("id:") {
        if user_id.is_empty() {
            return Err("Missing user id after id:".to_string());
        }
        return Ok(Target::Id(user_id));
    }
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(Target::Row(n)),
        _ => Err(format!("Invalid row number: {}", raw)),
    }
}

impl<A: LedgerApi + 'static> Console<A> {
    pub fn new(api: Rc<A>, base_url: &str, credentials: Credentials) -> Self {
        Self {
            api,
            base_url: base_url.to_string(),
            credentials,
            screen: Screen::LoggedOut,
        }
    }

    #[cfg(test)]
    pub fn view(&self) -> Option<&LedgerView<A>> {
        match &self.screen {
            Screen::LoggedIn(view) => Some(view),
            Screen::LoggedOut => None,
        }
    }

    pub async fn handle_line(&mut self, line: &str) -> Flow {
        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.is_empty() {
            return Flow::Nothing;
        }

        let command = parts[0].to_lowercase();
        let args = &parts[1..];
        let today = Local::now().date_naive();
        debug!("Console command: {}", command);

        let result = match command.as_str() {
            "quit" | "exit" => return Flow::Quit,
            "help" | "?" => Ok(help::execute()),
            "ping" => ping::execute(self.api.as_ref(), &self.base_url).await,
            "login" => session::login(&mut self.screen, &self.credentials, &self.api, args),
            "logout" => session::logout(&mut self.screen),
            _ => match &mut self.screen {
                Screen::LoggedOut => {
                    Err("Please log in first: login <mobile> <password>".to_string())
                }
                Screen::LoggedIn(view) => Self::dispatch(view, &command, args, today),
            },
        };

        match result {
            Ok(output) => Flow::Print(output),
            Err(e) => {
                warn!("Error executing command {}: {}", command, e);
                Flow::Print(format!("❌ {}", e))
            }
        }
    }

    fn dispatch(
        view: &mut LedgerView<A>,
        command: &str,
        args: &[&str],
        today: NaiveDate,
    ) -> Result<String, String> {
        match command {
            "list" | "ls" => Ok(borrowers::list(view, today)),
            "search" | "find" => Ok(borrowers::search(view, args, today)),
            "sort" => borrowers::sort(view, args, today),
            "refresh" => Ok(borrowers::refresh(view)),
            "delete" | "rm" => borrowers::delete(view, args),
            "add" | "new" => create_borrower::execute(view, today),
            "pay" | "open" => transaction::pay(view, args, today),
            "history" | "hist" => transaction::history(view, today),
            "set" => dialog::set(view, args, today),
            "submit" => dialog::submit(view, today),
            "cancel" | "close" => dialog::cancel(view),
            _ => Err(format!("Unknown command `{}`. Type help for the list.", command)),
        }
    }

    /// Wait for the next background completion. Pends forever while logged out.
    pub async fn next_event(&mut self) -> Option<SyncEvent> {
        match &mut self.screen {
            Screen::LoggedIn(view) => view.next_event().await,
            Screen::LoggedOut => std::future::pending().await,
        }
    }

    /// Let writes already sent finish before the console exits
    pub async fn settle(&mut self) {
        if let Screen::LoggedIn(view) = &mut self.screen {
            view.settle().await;
        }
    }

    /// Returns true when the screen should be redrawn
    pub fn apply(&mut self, event: SyncEvent) -> bool {
        match &mut self.screen {
            Screen::LoggedIn(view) => view.apply(event),
            Screen::LoggedOut => false,
        }
    }

    /// Current screen, preceded by any queued notices
    pub fn render(&mut self) -> String {
        match &mut self.screen {
            Screen::LoggedOut => "🔒 Logged out. Use login <mobile> <password>".to_string(),
            Screen::LoggedIn(view) => {
                let mut out: Vec<String> = view
                    .take_notices()
                    .into_iter()
                    .map(|n| format!("• {}", n))
                    .collect();
                out.push(render_service::render_screen(view, Local::now().date_naive()));
                out.join("\n")
            }
        }
    }
}
