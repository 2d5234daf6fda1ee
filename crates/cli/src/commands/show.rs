use std::path::Path;

use anyhow::Result;
use console::style;
use outreach_storage::{paginate, read_table, PageView};

const MAX_CELL_WIDTH: usize = 48;

pub fn show(input: &Path, page: usize, page_size: usize) -> Result<()> {
    let table = read_table(input)?;
    let view = paginate(&table, page, page_size);

    let widths: Vec<usize> = table
        .headers()
        .iter()
        .enumerate()
        .map(|(col, header)| {
            view.rows
                .iter()
                .map(|row| row[col].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or_default()
                .min(MAX_CELL_WIDTH)
        })
        .collect();

    let header = render(table.headers(), &widths);
    println!("{}", style(header).bold());
    for row in view.rows {
        println!("{}", render(row, &widths));
    }

    println!();
    println!("{}", footer(&view));
    if view.has_previous() {
        // Past-the-end requests point back to the last real page.
        let previous = (view.page - 1).min(view.total_pages.saturating_sub(1));
        println!("  previous: --page {}", previous);
    }
    if view.has_next() {
        println!("  next: --page {}", view.page + 1);
    }
    Ok(())
}

fn footer(view: &PageView<'_>) -> String {
    format!(
        "Page {} of {} ({} rows)",
        view.page.saturating_add(1),
        view.total_pages.max(1),
        view.total_rows
    )
}

fn render(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", truncate(cell, width)))
        .collect::<Vec<_>>()
        .join("  ")
}

fn truncate(cell: &str, width: usize) -> String {
    if cell.chars().count() <= width {
        return cell.to_string();
    }
    let mut short: String = cell.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}
