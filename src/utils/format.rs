use chrono::NaiveDateTime;

/// Wire format of every ledger timestamp
pub const LEDGER_DATETIME_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// Shortest decimal form of an amount: `500`, `500.5`, `-20`.
/// Search matches against exactly this text.
pub fn format_amount(amount: f64) -> String {
    format!("{}", amount)
}

/// `DD-MM-YYYY HH:mm:ss` to `DD Mon YYYY`; unparseable text is shown as is
pub fn format_ledger_date(raw: &str) -> String {
    match NaiveDateTime::parse_from_str(raw.trim(), LEDGER_DATETIME_FORMAT) {
        Ok(dt) => dt.format("%d %b %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Link form of a phone number
pub fn tel_link(mobile: &str) -> String {
    format!("tel:{}", mobile)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amounts_print_like_the_ledger() {
        assert_eq!(format_amount(500.0), "500");
        assert_eq!(format_amount(500.5), "500.5");
        assert_eq!(format_amount(-20.0), "-20");
    }

    #[test]
    fn test_ledger_dates() {
        assert_eq!(format_ledger_date("05-03-2024 00:00:00"), "05 Mar 2024");
        assert_eq!(format_ledger_date("not a date"), "not a date");
    }
}
