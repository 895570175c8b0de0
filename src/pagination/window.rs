/// Page size used when a request asks for zero or a negative size.
pub const DEFAULT_PAGE_SIZE: u64 = 10;
/// Page number used when a request asks for zero or a negative page.
pub const DEFAULT_PAGE_NUMBER: u64 = 1;

/// Offset/limit arithmetic for a single page request.
///
/// A window is computed fresh for every request from the resolved page size,
/// page number and the total number of rows matched by the filtered query.
/// Pages past the end of the data are valid and simply describe an empty slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    /// Rows per page, always at least 1.
    pub size: u64,
    /// 1-based page number, always at least 1.
    pub number: u64,
    /// Rows to skip: `(number - 1) * size`.
    pub offset: u64,
    /// Rows to fetch, equal to `size`.
    pub limit: u64,
    /// 1-based index of the first row on this page, clamped to `total`.
    pub from: u64,
    /// 1-based index of the last row on this page, clamped to `total`.
    pub to: u64,
    /// Last page number, never below 1.
    pub last_page: u64,
    /// Total rows matched by the filtered query.
    pub total: u64,
}

impl PageWindow {
    /// Compute a window from raw request values.
    ///
    /// Non-positive `size` and `number` fall back to [`DEFAULT_PAGE_SIZE`] and
    /// [`DEFAULT_PAGE_NUMBER`].
    #[must_use]
    pub fn compute(size: i64, number: i64, total: u64) -> Self {
        let size = u64::try_from(size).unwrap_or(0);
        let number = u64::try_from(number).unwrap_or(0);
        Self::new(size, number, total)
    }

    /// Compute a window from already resolved values. Zero falls back to the defaults.
    #[must_use]
    pub fn new(size: u64, number: u64, total: u64) -> Self {
        let size = if size == 0 { DEFAULT_PAGE_SIZE } else { size };
        let number = if number == 0 { DEFAULT_PAGE_NUMBER } else { number };

        let offset = (number - 1).saturating_mul(size);
        let from = offset.saturating_add(1).min(total);
        let to = offset.saturating_add(size).min(total);

        Self {
            size,
            number,
            offset,
            limit: size,
            from,
            to,
            last_page: last_page(total, size),
            total,
        }
    }

    /// True when the page lies entirely past the end of the data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total <= self.offset
    }

    /// Rows that will actually be returned for this page.
    #[must_use]
    pub fn len(&self) -> u64 {
        if self.is_empty() { 0 } else { self.to - self.from + 1 }
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.number < self.last_page
    }

    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.number > 1
    }
}

/// `ceil(total / size)`, with a floor of 1 so an empty table still has a page.
#[must_use]
pub fn last_page(total: u64, size: u64) -> u64 {
    let size = size.max(1);
    total.div_ceil(size).max(1)
}
