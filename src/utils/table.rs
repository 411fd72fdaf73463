/// Plain-text table for the terminal
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Row>,
    col_widths: Vec<usize>,
}

enum Row {
    Cells(Vec<String>),
    /// One line spanning every column, e.g. "Nothing found"
    Note(String),
}

fn display_width(s: &str) -> usize {
    s.chars().count()
}

impl Table {
    /// Create a new table with the given headers
    pub fn new<S: AsRef<str>>(headers: &[S]) -> Self {
        let headers: Vec<String> = headers.iter().map(|h| h.as_ref().to_string()).collect();
        let col_widths = headers.iter().map(|h| display_width(h)).collect();
        Table {
            headers,
            rows: Vec::new(),
            col_widths,
        }
    }

    /// Add a row to the table. Cells beyond the header count are dropped.
    pub fn add_row(&mut self, row: Vec<String>) {
        for (i, col) in row.iter().enumerate() {
            if i < self.col_widths.len() {
                self.col_widths[i] = self.col_widths[i].max(display_width(col));
            }
        }
        self.rows.push(Row::Cells(row));
    }

    pub fn add_note(&mut self, note: &str) {
        self.rows.push(Row::Note(note.to_string()));
    }

    pub fn render(&self) -> String {
        let mut output = String::new();

        output.push_str(&self.render_row(&self.headers));
        output.push('\n');
        output.push_str(&self.render_separator());
        output.push('\n');

        for row in &self.rows {
            match row {
                Row::Cells(cells) => output.push_str(&self.render_row(cells)),
                Row::Note(note) => output.push_str(&self.render_note(note)),
            }
            output.push('\n');
        }

        output
    }

    fn total_width(&self) -> usize {
        let separators = self.col_widths.len().saturating_sub(1) * 3;
        self.col_widths.iter().sum::<usize>() + separators
    }

    /// Render a single row with proper spacing
    fn render_row(&self, row: &[String]) -> String {
        let cells: Vec<String> = self
            .col_widths
            .iter()
            .enumerate()
            .map(|(i, &width)| {
                let col = row.get(i).map(String::as_str).unwrap_or("");
                let pad = width.saturating_sub(display_width(col));
                format!("{}{}", col, " ".repeat(pad))
            })
            .collect();
        cells.join(" | ").trim_end().to_string()
    }

    fn render_note(&self, note: &str) -> String {
        let pad = self.total_width().saturating_sub(display_width(note)) / 2;
        format!("{}{}", " ".repeat(pad), note)
    }

    fn render_separator(&self) -> String {
        self.col_widths
            .iter()
            .map(|&width| "-".repeat(width))
            .collect::<Vec<_>>()
            .join("-+-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_table() {
        let mut table = Table::new(&["Name", "Balance (₹)"]);
        table.add_row(vec!["Rahul".to_string(), "500".to_string()]);
        table.add_row(vec!["Asha".to_string(), "2500.5".to_string()]);

        let rendered = table.render();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Name  | Balance (₹)");
        assert_eq!(lines[1], "------+------------");
        assert_eq!(lines[2], "Rahul | 500");
    }

    #[test]
    fn test_note_spans_the_table() {
        let mut table = Table::new(&["Name", "Transaction Date", "Amount"]);
        table.add_note("Nothing found");

        let rendered = table.render();
        assert_eq!(rendered.lines().count(), 3);
        assert!(rendered.lines().last().unwrap().trim() == "Nothing found");
    }
}
