use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet read failed: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("Spreadsheet write failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// File extension is not one of the supported table formats.
    #[error("Unsupported file type: '{0}'. Expected .xlsx, .xls, .ods, .csv, .tsv or .txt")]
    UnsupportedFormat(String),

    #[error("File must have the following headers: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("Workbook has no worksheets: {}", .0.display())]
    EmptyWorkbook(PathBuf),
}

pub type Result<T> = std::result::Result<T, TableError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_lists_every_header() {
        let err = TableError::MissingColumns(vec!["Qualification".into(), "Email".into()]);
        assert_eq!(err.to_string(), "File must have the following headers: Qualification, Email");
    }

    #[test]
    fn unsupported_format_names_the_extension() {
        assert!(TableError::UnsupportedFormat("pdf".into()).to_string().contains("'pdf'"));
    }
}
