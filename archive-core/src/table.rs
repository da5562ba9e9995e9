use serde::{Deserialize, Serialize};
use std::fmt;

/// Rows-per-page choices offered by the results table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum PageSize {
    #[default]
    Twenty,
    Fifty,
    Hundred,
}

impl PageSize {
    pub const fn get(self) -> usize {
        match self {
            PageSize::Twenty => 20,
            PageSize::Fifty => 50,
            PageSize::Hundred => 100,
        }
    }

    pub const fn all() -> &'static [PageSize] {
        &[PageSize::Twenty, PageSize::Fifty, PageSize::Hundred]
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl TryFrom<usize> for PageSize {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            20 => Ok(PageSize::Twenty),
            50 => Ok(PageSize::Fifty),
            100 => Ok(PageSize::Hundred),
            other => Err(format!("Unsupported page size {other}. Choose one of 20, 50, 100.")),
        }
    }
}

impl From<PageSize> for usize {
    fn from(size: PageSize) -> Self {
        size.get()
    }
}

/// The rows of page `page` (zero-based). A page past the end yields an empty slice.
pub fn page_slice<T>(rows: &[T], page: usize, size: PageSize) -> &[T] {
    let size = size.get();
    let start = page.saturating_mul(size).min(rows.len());
    let end = start.saturating_add(size).min(rows.len());
    &rows[start..end]
}

/// Current position within a paginated table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pagination {
    page: usize,
    page_size: PageSize,
}

impl Pagination {
    pub fn new(page_size: PageSize) -> Self {
        Self { page: 0, page_size }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Switching size always returns to the first page.
    pub fn set_page_size(&mut self, size: PageSize) {
        self.page_size = size;
        self.page = 0;
    }

    pub fn reset(&mut self) {
        self.page = 0;
    }

    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size.get())
    }

    pub fn has_next(&self, total: usize) -> bool {
        self.page.saturating_add(1) < self.page_count(total)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    pub fn next(&mut self, total: usize) {
        if self.has_next(total) {
            self.page += 1;
        }
    }

    pub fn previous(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    pub fn slice<'a, T>(&self, rows: &'a [T]) -> &'a [T] {
        page_slice(rows, self.page, self.page_size)
    }

    /// Caption such as `21–24 of 24`; an empty page reads `0–0 of 24`.
    pub fn caption(&self, total: usize) -> String {
        let start = self.page.saturating_mul(self.page_size.get()).min(total);
        let end = start.saturating_add(self.page_size.get()).min(total);
        if end == start {
            return format!("0–0 of {total}");
        }
        format!("{}–{end} of {total}", start + 1)
    }
}
