//! Bordered ASCII tables
//!
//! ```text
//! +---------------------+---------+--------+
//! |      OBJECTIVE      | DEFAULT | CANARY |
//! +---------------------+---------+--------+
//! | error-rate <= 0.010 | true    | true   |
//! +---------------------+---------+--------+
//! ```

use std::fmt;

/// A table with an upper-cased, centred header and left-aligned cells.
///
/// Rows shorter than the widest row are padded with empty cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table with the given header cells.
    #[must_use]
    pub fn new<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row.
    pub fn push_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    // Upper-casing can change the length (`ß` becomes `SS`).
    fn titles(&self) -> Vec<String> {
        self.header.iter().map(|h| h.to_uppercase()).collect()
    }

    fn widths(&self, titles: &[String]) -> Vec<usize> {
        let columns = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(titles.len()))
            .max()
            .unwrap_or(0);
        (0..columns)
            .map(|i| {
                std::iter::once(titles)
                    .chain(self.rows.iter().map(Vec::as_slice))
                    .filter_map(|row| row.get(i))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

fn border(f: &mut fmt::Formatter<'_>, widths: &[usize]) -> fmt::Result {
    f.write_str("+")?;
    for width in widths {
        write!(f, "{}+", "-".repeat(width + 2))?;
    }
    writeln!(f)
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let titles = self.titles();
        let widths = self.widths(&titles);
        if widths.is_empty() {
            return Ok(());
        }

        border(f, &widths)?;
        f.write_str("|")?;
        for (i, width) in widths.iter().enumerate() {
            let title = titles.get(i).map_or("", String::as_str);
            write!(f, " {title:^width$} |")?;
        }
        writeln!(f)?;
        border(f, &widths)?;

        for row in &self.rows {
            f.write_str("|")?;
            for (i, width) in widths.iter().enumerate() {
                let cell = row.get(i).map_or("", String::as_str);
                write!(f, " {cell:<width$} |")?;
            }
            writeln!(f)?;
            border(f, &widths)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_layout() {
        let mut table = Table::new(["Metric", "default", "canary"]);
        table.push_row(["error-rate", "0", "0"]);
        let expected = "\
+------------+---------+--------+
|   METRIC   | DEFAULT | CANARY |
+------------+---------+--------+
| error-rate | 0       | 0      |
+------------+---------+--------+
";
        assert_eq!(table.to_string(), expected);
    }

    #[test]
    fn test_short_rows_padded() {
        let mut table = Table::new(["A", "B"]);
        table.push_row(["x"]);
        let rendered = table.to_string();
        assert!(rendered.contains("| x |   |"));
    }

    #[test]
    fn test_header_width_after_uppercasing() {
        let mut table = Table::new(["Metric", "straße"]);
        table.push_row(["m", "1"]);
        let expected = "\
+--------+---------+
| METRIC | STRASSE |
+--------+---------+
| m      | 1       |
+--------+---------+
";
        assert_eq!(table.to_string(), expected);
    }

    #[test]
    fn test_empty_table_renders_nothing() {
        let table = Table::new(Vec::<String>::new());
        assert_eq!(table.to_string(), "");
    }
}
