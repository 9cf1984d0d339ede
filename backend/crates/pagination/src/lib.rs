//! Page-number pagination primitives.
//!
//! Feeds are paginated into fixed-size pages addressed by a 1-based page
//! number. Requested numbers outside the valid range clamp to the nearest
//! valid page instead of erroring, so stale links and hand-edited URLs
//! always land on a renderable page.

use serde::Serialize;
use thiserror::Error;

/// Errors raised when constructing a [`Paginator`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// Page size must be at least one item.
    #[error("page size must be greater than zero")]
    ZeroPageSize,
}

/// A page number requested by a client, before clamping.
///
/// Parsing is lenient: anything that is not a base-10 integer maps to the
/// first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    /// No usable page parameter was supplied.
    First,
    /// An explicit page number, possibly out of range.
    Number(i64),
}

impl PageRequest {
    /// Interpret an optional query-string value as a page request.
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::parse::<i64>) {
            Some(Ok(number)) => Self::Number(number),
            _ => Self::First,
        }
    }
}

/// One page of items together with its position in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    items: Vec<T>,
    number: u32,
    total_pages: u32,
    total_items: u64,
}

impl<T> Page<T> {
    /// Assemble a page from already-fetched items.
    pub fn new(items: Vec<T>, number: u32, total_pages: u32, total_items: u64) -> Self {
        Self {
            items,
            number,
            total_pages,
            total_items,
        }
    }

    /// An empty first page, used by feeds with no content.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 1, 1, 0)
    }

    /// Items on this page, newest first.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// 1-based page number after clamping.
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Total number of pages in the feed (at least one).
    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Total number of items across all pages.
    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    /// Whether a later page exists.
    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    /// Whether an earlier page exists.
    pub fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Number of the next page, when one exists.
    pub fn next_number(&self) -> Option<u32> {
        self.has_next().then(|| self.number + 1)
    }

    /// Number of the previous page, when one exists.
    pub fn previous_number(&self) -> Option<u32> {
        self.has_previous().then(|| self.number - 1)
    }
}

/// Splits feeds into fixed-size pages and clamps requested page numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    per_page: u32,
}

impl Paginator {
    /// Create a paginator with the given page size.
    pub fn new(per_page: u32) -> Result<Self, PaginationError> {
        if per_page == 0 {
            return Err(PaginationError::ZeroPageSize);
        }
        Ok(Self { per_page })
    }

    /// Configured page size.
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of pages needed for `total_items`, never less than one.
    pub fn total_pages(&self, total_items: u64) -> u32 {
        let per_page = u64::from(self.per_page);
        let pages = total_items.div_ceil(per_page).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Clamp a requested page number into the valid range for the feed.
    pub fn clamp(&self, request: PageRequest, total_items: u64) -> u32 {
        let last = self.total_pages(total_items);
        match request {
            PageRequest::First => 1,
            PageRequest::Number(n) if n < 1 => 1,
            PageRequest::Number(n) => u32::try_from(n).unwrap_or(u32::MAX).min(last),
        }
    }

    /// Zero-based item offset of a (clamped) page number.
    pub fn offset(&self, page: u32) -> u64 {
        u64::from(page - 1) * u64::from(self.per_page)
    }

    /// Wrap fetched items into a [`Page`] envelope.
    pub fn page<T>(&self, items: Vec<T>, number: u32, total_items: u64) -> Page<T> {
        Page::new(items, number, self.total_pages(total_items), total_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn rejects_zero_page_size() {
        assert_eq!(Paginator::new(0), Err(PaginationError::ZeroPageSize));
    }

    #[rstest]
    #[case(None, PageRequest::First)]
    #[case(Some("abc"), PageRequest::First)]
    #[case(Some(""), PageRequest::First)]
    #[case(Some("2"), PageRequest::Number(2))]
    #[case(Some("-3"), PageRequest::Number(-3))]
    fn parses_query_values(#[case] raw: Option<&str>, #[case] expected: PageRequest) {
        assert_eq!(PageRequest::from_query(raw), expected);
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(10, 1)]
    #[case(11, 2)]
    #[case(13, 2)]
    #[case(21, 3)]
    fn computes_total_pages(#[case] total: u64, #[case] expected: u32) {
        let paginator = Paginator::new(10).expect("valid page size");
        assert_eq!(paginator.total_pages(total), expected);
    }

    #[rstest]
    #[case(PageRequest::First, 1)]
    #[case(PageRequest::Number(0), 1)]
    #[case(PageRequest::Number(-7), 1)]
    #[case(PageRequest::Number(1), 1)]
    #[case(PageRequest::Number(2), 2)]
    #[case(PageRequest::Number(99), 2)]
    fn clamps_into_range(#[case] request: PageRequest, #[case] expected: u32) {
        let paginator = Paginator::new(10).expect("valid page size");
        // 13 items => 2 pages.
        assert_eq!(paginator.clamp(request, 13), expected);
    }

    #[rstest]
    fn clamps_to_first_page_when_empty() {
        let paginator = Paginator::new(10).expect("valid page size");
        assert_eq!(paginator.clamp(PageRequest::Number(5), 0), 1);
    }

    #[rstest]
    fn offsets_follow_page_size() {
        let paginator = Paginator::new(7).expect("valid page size");
        assert_eq!(paginator.offset(1), 0);
        assert_eq!(paginator.offset(3), 14);
    }

    #[rstest]
    fn page_envelope_reports_neighbours() {
        let paginator = Paginator::new(10).expect("valid page size");
        let page = paginator.page(vec![1, 2, 3], 2, 23);
        assert_eq!(page.number(), 2);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
        assert!(page.has_previous());
        assert_eq!(page.next_number(), Some(3));
        assert_eq!(page.previous_number(), Some(1));
    }

    #[rstest]
    fn empty_page_is_first_and_only() {
        let page = Page::<u8>::empty();
        assert_eq!(page.number(), 1);
        assert_eq!(page.total_pages(), 1);
        assert!(!page.has_next());
        assert!(!page.has_previous());
        assert!(page.items().is_empty());
    }
}
