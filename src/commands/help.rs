pub fn execute() -> String {
    [
        "📖 Ledger Console Help",
        "",
        "🎯 General",
        "  ping                    Check the ledger service",
        "  help                    Show this help message",
        "  quit                    Leave the console",
        "",
        "🔒 Session",
        "  login <mobile> <password>",
        "  logout                  Drop the session and every cached list",
        "",
        "📋 Borrowers",
        "  list                    Show the borrower table",
        "  search [text]           Filter by name or balance; empty clears",
        "  sort <column>           name, mobile, balance, interest, start, end, remarks",
        "                          First use sorts descending, again flips",
        "  refresh                 Reload the borrower list",
        "  delete <row|id:<userId>>",
        "                          Delete a borrower; the id form is safe after a refresh",
        "",
        "💸 Dialogs",
        "  add                     New borrower",
        "  pay <row|id:<userId>>   Record a payment for a borrower",
        "  history                 Toggle the payment history",
        "  set <field> <value>     name, mobile, balance, date, amount, comment",
        "  submit                  Send the open form",
        "  cancel                  Close the open dialog",
    ]
    .join("\n")
}
