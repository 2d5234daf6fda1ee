use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::{Format, Workbook};
use std::fs::File;
use std::path::Path;

use crate::error::{Result, TableError};
use crate::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    /// Tab separated; `.txt` uploads are read this way too.
    Tsv,
    Spreadsheet,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(TableFormat::Csv),
            "tsv" | "txt" => Ok(TableFormat::Tsv),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(TableFormat::Spreadsheet),
            _ => Err(TableError::UnsupportedFormat(ext)),
        }
    }

    fn delimiter(self) -> u8 {
        match self {
            TableFormat::Tsv => b'\t',
            _ => b',',
        }
    }
}

/// Reads a table, picking the format from the file extension.
///
/// Spreadsheets are read from their first worksheet with the first row as
/// headers.
pub fn read_table(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let table = match TableFormat::from_path(path)? {
        TableFormat::Spreadsheet => read_spreadsheet(path)?,
        format => read_delimited(path, format.delimiter())?,
    };
    tracing::info!(path = %path.display(), rows = table.len(), "loaded table");
    Ok(table)
}

fn read_delimited(path: &Path, delimiter: u8) -> Result<Table> {
    let file = File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut table = Table::new(rdr.headers()?.iter());
    for record in rdr.records() {
        table.push_row(record?.iter());
    }
    Ok(table)
}

fn read_spreadsheet(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TableError::EmptyWorkbook(path.to_path_buf()))??;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Table::default());
    };

    let mut table = Table::new(header_row.iter().map(cell_text));
    for row in rows {
        if row.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }
        table.push_row(row.iter().map(cell_text));
    }
    Ok(table)
}

fn cell_text(cell: &Data) -> String {
    cell.to_string().trim().to_string()
}

/// Writes a table, picking the format from the file extension.
pub fn write_table(path: impl AsRef<Path>, table: &Table) -> Result<()> {
    let path = path.as_ref();
    match TableFormat::from_path(path)? {
        TableFormat::Spreadsheet => write_spreadsheet(path, table)?,
        format => write_delimited(path, table, format.delimiter())?,
    }
    tracing::info!(path = %path.display(), rows = table.len(), "saved table");
    Ok(())
}

fn write_delimited(path: &Path, table: &Table, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_path(path)?;
    writer.write_record(table.headers())?;
    for row in table.rows() {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_spreadsheet(path: &Path, table: &Table) -> Result<()> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();

    for (col, header) in table.headers().iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, header, &bold)?;
    }
    for (r, row) in table.rows().iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            sheet.write_string(r as u32 + 1, col as u16, cell)?;
        }
    }
    sheet.autofit();

    workbook.save(path)?;
    Ok(())
}
