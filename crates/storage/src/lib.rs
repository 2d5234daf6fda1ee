//! Tabular input and output for the pipeline stages.

mod error;
mod io;
mod pagination;
pub mod records;
mod report;
mod table;

pub use error::{Result, TableError};
pub use io::{read_table, write_table, TableFormat};
pub use pagination::{paginate, PageView};
pub use report::{to_report, JsonFileStorage, ReportStorage};
pub use table::Table;
