//! Fixed-size pagination with clamping.
//!
//! Pages are 1-indexed. A requested page that is stale or out of range is
//! clamped into `1..=total_pages` rather than rejected, and an empty
//! sequence still has exactly one (empty) page.

use std::fmt;

/// Pagination metadata for one rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    /// Number of pages, never less than 1.
    pub total_pages: usize,
    /// The page actually rendered, in `1..=total_pages`.
    pub effective_page: usize,
    /// Number of records across all pages.
    pub total_records: usize,
    /// Records per page.
    pub page_size: usize,
}

impl PageInfo {
    /// Computes the metadata for `total_records` records.
    pub fn compute(total_records: usize, page_size: usize, requested_page: i64) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_records.div_ceil(page_size).max(1);
        let effective_page = clamp_page(requested_page, total_pages);
        Self {
            total_pages,
            effective_page,
            total_records,
            page_size,
        }
    }

    /// Index range of the rendered page within the full sequence.
    pub fn range(&self) -> std::ops::Range<usize> {
        let start = (self.effective_page - 1)
            .saturating_mul(self.page_size)
            .min(self.total_records);
        let end = start.saturating_add(self.page_size).min(self.total_records);
        start..end
    }

    /// Whether pagination controls should be shown at all.
    pub fn shows_controls(&self) -> bool {
        self.total_pages > 1
    }

    /// Whether a previous page exists.
    pub fn has_previous(&self) -> bool {
        self.effective_page > 1
    }

    /// Whether a next page exists.
    pub fn has_next(&self) -> bool {
        self.effective_page < self.total_pages
    }

    /// Short status line, e.g. `"12 records, page 2/3"`.
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PageInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} records, page {}/{}",
            self.total_records, self.effective_page, self.total_pages
        )
    }
}

/// One page of records plus its metadata.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a, T> {
    /// The records on this page.
    pub records: &'a [T],
    /// Pagination metadata.
    pub info: PageInfo,
}

/// Slices `records` into the page closest to `requested_page`.
///
/// A `page_size` of zero is treated as one.
pub fn paginate<T>(records: &[T], page_size: usize, requested_page: i64) -> Page<'_, T> {
    let info = PageInfo::compute(records.len(), page_size, requested_page);
    Page {
        records: &records[info.range()],
        info,
    }
}

fn clamp_page(requested_page: i64, total_pages: usize) -> usize {
    if requested_page < 1 {
        return 1;
    }
    usize::try_from(requested_page).map_or(total_pages, |page| page.min(total_pages))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_and_last_page() {
        let items = [1, 2, 3];

        let first = paginate(&items, 2, 1);
        assert_eq!(first.records, &[1, 2]);
        assert_eq!(first.info.total_pages, 2);
        assert_eq!(first.info.effective_page, 1);

        let last = paginate(&items, 2, 2);
        assert_eq!(last.records, &[3]);
        assert_eq!(last.info.effective_page, 2);
    }

    #[test]
    fn test_out_of_range_requests_are_clamped() {
        let items: Vec<u32> = (0..25).collect();

        for requested in [i64::MIN, -7, 0, 1] {
            assert_eq!(paginate(&items, 10, requested).info.effective_page, 1);
        }
        for requested in [3, 4, 999, i64::MAX] {
            let page = paginate(&items, 10, requested);
            assert_eq!(page.info.effective_page, 3);
            assert_eq!(page.records, &[20, 21, 22, 23, 24]);
        }
    }

    #[test]
    fn test_empty_sequence_has_one_empty_page() {
        let items: [u8; 0] = [];
        let page = paginate(&items, 10, 4);

        assert!(page.records.is_empty());
        assert_eq!(page.info.total_pages, 1);
        assert_eq!(page.info.effective_page, 1);
        assert!(!page.info.shows_controls());
        assert!(!page.info.has_previous());
        assert!(!page.info.has_next());
    }

    #[test]
    fn test_pages_cover_sequence_exactly() {
        let items: Vec<u32> = (0..23).collect();
        let page_size = 5;
        let total_pages = paginate(&items, page_size, 1).info.total_pages;

        let rebuilt: Vec<u32> = (1..=total_pages)
            .flat_map(|page| {
                let page = i64::try_from(page).unwrap();
                paginate(&items, page_size, page).records.to_vec()
            })
            .collect();

        assert_eq!(total_pages, 5);
        assert_eq!(rebuilt, items);
    }

    #[test]
    fn test_zero_page_size_is_treated_as_one() {
        let items = ['a', 'b'];
        let page = paginate(&items, 0, 2);
        assert_eq!(page.records, &['b']);
        assert_eq!(page.info.page_size, 1);
        assert_eq!(page.info.total_pages, 2);
    }

    #[test]
    fn test_summary_and_navigation() {
        let info = PageInfo::compute(12, 5, 2);
        assert_eq!(info.summary(), "12 records, page 2/3");
        assert!(info.shows_controls());
        assert!(info.has_previous());
        assert!(info.has_next());
    }
}
