use crate::table::Table;

/// One display page of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView<'a> {
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
    pub total_rows: usize,
    pub rows: &'a [Vec<String>],
}

impl PageView<'_> {
    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages.saturating_sub(1)
    }
}

/// Slices out page `page` (zero based) of `page_size` rows.
///
/// A page past the end is empty; a zero page size is treated as one.
pub fn paginate(table: &Table, page: usize, page_size: usize) -> PageView<'_> {
    let page_size = page_size.max(1);
    let total_rows = table.len();
    let total_pages = total_rows.div_ceil(page_size);

    let start = page.saturating_mul(page_size).min(total_rows);
    let end = start.saturating_add(page_size).min(total_rows);

    PageView {
        page,
        page_size,
        total_pages,
        total_rows,
        rows: &table.rows()[start..end],
    }
}
