pub mod errors;
pub mod format;
pub mod table;

pub use errors::describe_failure;
pub use format::{format_amount, format_ledger_date, tel_link};
pub use table::Table;
