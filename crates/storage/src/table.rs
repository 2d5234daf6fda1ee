use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};

/// Rows of string cells under named columns, in file order.
///
/// Every row has exactly as many cells as there are headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(|h| h.into().trim().to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row, padding short rows with empty cells and dropping
    /// cells beyond the last header.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).take(self.headers.len()).collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Fails with every missing column name when any is absent.
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        let missing: Vec<String> = names
            .iter()
            .filter(|name| self.column_index(name).is_none())
            .map(|name| name.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(TableError::MissingColumns(missing))
        }
    }

    /// Splits into the first `at` rows and the rest; both halves keep all columns.
    pub fn split_at(mut self, at: usize) -> (Table, Table) {
        let at = at.min(self.rows.len());
        let rest = self.rows.split_off(at);
        let tail = Table {
            headers: self.headers.clone(),
            rows: rest,
        };
        (self, tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rows_are_normalized_to_header_width() {
        let mut table = Table::new(["Title", "Link"]);
        table.push_row(["Cook"]);
        table.push_row(["Baker", "https://example.ca/2", "extra"]);

        assert_eq!(table.rows()[0], vec!["Cook".to_string(), String::new()]);
        assert_eq!(table.rows()[1].len(), 2);
    }

    #[test]
    fn require_columns_reports_all_missing() {
        let table = Table::new(["Title", " Email "]);
        assert!(table.require_columns(&["Title", "Email"]).is_ok());

        match table.require_columns(&["Qualification", "Email", "Link"]) {
            Err(TableError::MissingColumns(missing)) => {
                assert_eq!(missing, vec!["Qualification".to_string(), "Link".to_string()])
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn split_keeps_order_and_columns() {
        let mut table = Table::new(["Email", "Note"]);
        for i in 0..5 {
            table.push_row([format!("c{i}@example.ca"), format!("n{i}")]);
        }

        let (head, tail) = table.split_at(3);
        assert_eq!(head.len(), 3);
        assert_eq!(tail.headers(), head.headers());
        assert_eq!(tail.rows()[0][0], "c3@example.ca");
        assert_eq!(tail.rows()[1][1], "n4");

        let (all, none) = tail.split_at(10);
        assert_eq!(all.len(), 2);
        assert!(none.is_empty());
    }
}
