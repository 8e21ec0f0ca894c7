//! Pagination control model

use std::fmt;

use crate::models::PageInfo;

const MAX_PAGES_SHOWN: u32 = 7;

/// One slot in the page-number strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLabel {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageLabel::Page(n) => write!(f, "{}", n),
            PageLabel::Ellipsis => write!(f, "..."),
        }
    }
}

/// Page numbers to render for `current` out of `total`.
///
/// Up to seven pages are all shown. Beyond that the first and last pages stay
/// visible; near either edge five consecutive pages are shown, otherwise the
/// current page and its neighbours, with one ellipsis per collapsed gap.
pub fn page_labels(total: u32, current: u32) -> Vec<PageLabel> {
    if total <= MAX_PAGES_SHOWN {
        return (1..=total).map(PageLabel::Page).collect();
    }
    let current = current.clamp(1, total);

    let mut labels = Vec::with_capacity(MAX_PAGES_SHOWN as usize);
    if current <= 3 {
        labels.extend((1..=5).map(PageLabel::Page));
        labels.push(PageLabel::Ellipsis);
        labels.push(PageLabel::Page(total));
    } else if current >= total - 2 {
        labels.push(PageLabel::Page(1));
        labels.push(PageLabel::Ellipsis);
        labels.extend((total - 4..=total).map(PageLabel::Page));
    } else {
        labels.push(PageLabel::Page(1));
        labels.push(PageLabel::Ellipsis);
        labels.extend((current - 1..=current + 1).map(PageLabel::Page));
        labels.push(PageLabel::Ellipsis);
        labels.push(PageLabel::Page(total));
    }
    labels
}

/// Paging metadata for a list paginated in memory
pub fn local_page_info(total_count: usize, page: u32, page_size: u32) -> PageInfo {
    let total_count = total_count as u64;
    let page_size = page_size.max(1);
    let total_pages = total_count.div_ceil(u64::from(page_size)) as u32;
    PageInfo {
        page: page.clamp(1, total_pages.max(1)),
        page_size,
        total_count,
        total_pages,
    }
}

/// Rows of `page` (1-based) when paginating in memory
pub fn page_slice<T>(rows: &[T], page: u32, page_size: u32) -> &[T] {
    let page_size = page_size.max(1) as usize;
    let start = (page.max(1) as usize - 1).saturating_mul(page_size);
    if start >= rows.len() {
        return &[];
    }
    let end = (start + page_size).min(rows.len());
    &rows[start..end]
}

/// Everything a pagination bar needs, derived from server paging metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    pub current: u32,
    pub total_pages: u32,
    pub labels: Vec<PageLabel>,
    pub first_row: u64,
    pub last_row: u64,
    pub total_count: u64,
}

impl PaginationView {
    /// `None` when there is at most one page; the bar is hidden then
    pub fn from_info(info: &PageInfo) -> Option<Self> {
        if info.total_pages <= 1 {
            return None;
        }
        let current = info.page.clamp(1, info.total_pages);
        let page_size = u64::from(info.page_size);
        let first_row = u64::from(current - 1) * page_size + 1;
        let last_row = (u64::from(current) * page_size).min(info.total_count);

        Some(Self {
            current,
            total_pages: info.total_pages,
            labels: page_labels(info.total_pages, current),
            first_row,
            last_row,
            total_count: info.total_count,
        })
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages
    }

    pub fn previous(&self) -> Option<u32> {
        self.has_previous().then(|| self.current - 1)
    }

    pub fn next(&self) -> Option<u32> {
        self.has_next().then(|| self.current + 1)
    }

    /// "Showing 13-24 of 30 items"
    pub fn results_line(&self) -> String {
        format!(
            "Showing {}-{} of {} items",
            self.first_row, self.last_row, self.total_count
        )
    }
}
