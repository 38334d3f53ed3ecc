//! Pagination utilities for service layer
//!
//! Every listing goes through [`paginate`], so page counting, the clamp for
//! pages past the end and the empty-result envelope are decided in one place.

use async_trait::async_trait;
use serde::Serialize;

use crate::errors::ServiceError;

/// Fixed number of records per page.
pub const PAGE_SIZE: u64 = 10;
/// Message sent with an empty result set.
pub const EMPTY_MESSAGE: &str = "No more records";
/// Requests above this are treated as this page; it is far past any real data.
const MAX_PAGE: u64 = u32::MAX as u64;

/// 1-based page requested by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
}

impl PageRequest {
    pub fn new(page: u64) -> Self { Self { page: page.clamp(1, MAX_PAGE) } }

    /// Read the raw `page` query value by its leading integer, like `"3"`,
    /// `" 3"` or `"3rd"`. Missing, unparsable, zero and negative values mean page 1.
    pub fn from_param(raw: Option<&str>) -> Self {
        let Some(raw) = raw else { return Self::default() };
        let s = raw.trim_start();
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
        let digits = &digits[..end];
        if negative || digits.is_empty() {
            return Self::default();
        }
        Self::new(digits.parse::<u64>().unwrap_or(MAX_PAGE))
    }

    pub fn page(self) -> u64 { self.page }
}

impl Default for PageRequest {
    fn default() -> Self { Self { page: 1 } }
}

pub fn total_pages(total: u64, per_page: u64) -> u64 { total.div_ceil(per_page) }

pub fn skip_for(page: u64, per_page: u64) -> u64 { page.saturating_sub(1).saturating_mul(per_page) }

/// What to serve once the total is known.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PagePlan {
    /// Nothing matched: empty items, `currentPage` 0.
    Empty,
    /// Serve `page`; `clamped` is set when the request was past the last page.
    Serve { page: u64, total_pages: u64, skip: u64, clamped: bool },
}

impl PagePlan {
    pub fn new(total: u64, req: PageRequest, per_page: u64) -> Self {
        if total == 0 {
            return Self::Empty;
        }
        let total_pages = total_pages(total, per_page);
        let clamped = req.page() > total_pages;
        let page = req.page().min(total_pages);
        Self::Serve { page, total_pages, skip: skip_for(page, per_page), clamped }
    }
}

/// Pagination envelope: one page of items plus page counters.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub current_page: u64,
    pub total_pages: u64,
    pub message: String,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            current_page: 0,
            total_pages: 0,
            message: EMPTY_MESSAGE.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool { self.items.is_empty() && self.current_page == 0 }
}

/// A filtered collection that can report its size and hand out a slice of it.
#[async_trait]
pub trait PageSource: Send + Sync {
    type Item: Send;

    /// Total matching records together with the records in `skip..skip + limit`.
    async fn window(&self, skip: u64, limit: u64) -> Result<(u64, Vec<Self::Item>), ServiceError>;
}

/// Serve the requested page of `source`, clamping requests past the end to the
/// last page. Count and page come from the same `window` call; a clamped
/// request costs one more call for the last page.
pub async fn paginate<S>(
    source: &S,
    req: PageRequest,
    message: &str,
) -> Result<Page<S::Item>, ServiceError>
where
    S: PageSource + ?Sized,
{
    let (total, items) = source.window(skip_for(req.page(), PAGE_SIZE), PAGE_SIZE).await?;
    match PagePlan::new(total, req, PAGE_SIZE) {
        PagePlan::Empty => Ok(Page::empty()),
        PagePlan::Serve { page, total_pages, clamped: false, .. } => {
            Ok(Page { items, current_page: page, total_pages, message: message.to_string() })
        }
        PagePlan::Serve { page, total_pages, skip, clamped: true } => {
            let (_, items) = source.window(skip, PAGE_SIZE).await?;
            Ok(Page { items, current_page: page, total_pages, message: message.to_string() })
        }
    }
}
