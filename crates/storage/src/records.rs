//! Column layout shared by every stage.

use outreach_core::{ContactRecord, EmailOutcome, JobRecord};

use crate::error::Result;
use crate::table::Table;

pub const TITLE: &str = "Title";
pub const LINK: &str = "Link";
pub const QUALIFICATION: &str = "Qualification";
pub const EMAIL: &str = "Email";

pub fn job_table(records: &[JobRecord]) -> Table {
    let mut table = Table::new([TITLE, LINK]);
    for record in records {
        table.push_row([record.title.as_str(), record.link.as_str()]);
    }
    table
}

pub fn contact_table(records: &[ContactRecord]) -> Table {
    let mut table = Table::new([TITLE, LINK, QUALIFICATION, EMAIL]);
    for record in records {
        table.push_row([
            record.title.clone(),
            record.link.clone(),
            record.qualification.clone(),
            record.email.to_cell(),
        ]);
    }
    table
}

/// Reads the `Title` and `Link` columns; other columns are ignored.
pub fn job_records(table: &Table) -> Result<Vec<JobRecord>> {
    table.require_columns(&[TITLE, LINK])?;
    let (title, link) = (index(table, TITLE), index(table, LINK));

    Ok(table
        .rows()
        .iter()
        .map(|row| JobRecord::new(row[title].clone(), row[link].clone()))
        .collect())
}

/// Reads contacts; `Title` and `Link` are optional on this path.
pub fn contact_records(table: &Table) -> Result<Vec<ContactRecord>> {
    table.require_columns(&[QUALIFICATION, EMAIL])?;
    let (qualification, email) = (index(table, QUALIFICATION), index(table, EMAIL));
    let title = table.column_index(TITLE);
    let link = table.column_index(LINK);

    let optional = |row: &[String], idx: Option<usize>| idx.map(|i| row[i].clone()).unwrap_or_default();

    Ok(table
        .rows()
        .iter()
        .map(|row| ContactRecord {
            title: optional(row, title),
            link: optional(row, link),
            qualification: row[qualification].clone(),
            email: EmailOutcome::from_cell(&row[email]),
        })
        .collect())
}

fn index(table: &Table, column: &str) -> usize {
    // Callers check presence first.
    table.column_index(column).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TableError;
    use pretty_assertions::assert_eq;

    #[test]
    fn contacts_survive_the_table_layout() {
        let records = vec![
            ContactRecord {
                title: "Cook".into(),
                link: "https://example.ca/1".into(),
                qualification: "English".into(),
                email: EmailOutcome::Found("cook@diner.ca".into()),
            },
            ContactRecord {
                title: "Baker".into(),
                link: "https://example.ca/2".into(),
                qualification: "No qualification found".into(),
                email: EmailOutcome::NotFound,
            },
        ];

        let table = contact_table(&records);
        assert_eq!(table.headers(), [TITLE, LINK, QUALIFICATION, EMAIL]);
        assert_eq!(contact_records(&table).unwrap(), records);
    }

    #[test]
    fn jobs_need_title_and_link() {
        let table = Table::new(["Title", "URL"]);
        assert!(matches!(job_records(&table), Err(TableError::MissingColumns(c)) if c == vec!["Link".to_string()]));
    }

    #[test]
    fn contacts_without_title_column_are_accepted() {
        let mut table = Table::new(["Email", "Qualification"]);
        table.push_row(["owner@cafe.ca", "french"]);

        let records = contact_records(&table).unwrap();
        assert_eq!(records[0].title, "");
        assert_eq!(records[0].qualification, "french");
        assert_eq!(records[0].email.address(), Some("owner@cafe.ca"));
    }

    #[test]
    fn duplicate_links_are_kept() {
        let jobs = vec![JobRecord::new("Cook", "https://example.ca/1"); 2];
        assert_eq!(job_records(&job_table(&jobs)).unwrap(), jobs);
    }
}
