//! Pagination types for list operations.
//!
//! Clients address pages 1-based through [`PageParams`]; the store works with
//! 0-based [`PageRequest`]s.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Client-facing page parameters (1-based page number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    /// The page number (1-indexed).
    #[validate(range(min = 1, message = "pageNumber must be a positive integer"))]
    pub page_number: u32,
    /// The number of items per page.
    #[validate(range(min = 1, max = 100, message = "pageSize must be between 1 and 100"))]
    pub page_size: u32,
}

impl PageParams {
    /// The default page number.
    pub const DEFAULT_PAGE_NUMBER: u32 = 1;
    /// The default page size.
    pub const DEFAULT_PAGE_SIZE: u32 = 15;

    /// Creates page parameters.
    #[must_use]
    pub const fn new(page_number: u32, page_size: u32) -> Self {
        Self {
            page_number,
            page_size,
        }
    }

    /// Translates to a 0-based store request.
    #[must_use]
    pub fn to_page_request(&self) -> PageRequest {
        PageRequest::new(
            self.page_number.saturating_sub(1) as usize,
            self.page_size as usize,
        )
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE_NUMBER, Self::DEFAULT_PAGE_SIZE)
    }
}

/// A request for a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// The page number (0-indexed).
    pub page: usize,
    /// The number of items per page.
    pub size: usize,
}

impl PageRequest {
    /// The default page size.
    pub const DEFAULT_SIZE: usize = PageParams::DEFAULT_PAGE_SIZE as usize;
    /// The maximum allowed page size.
    pub const MAX_SIZE: usize = 100;

    /// Creates a new page request.
    #[must_use]
    pub fn new(page: usize, size: usize) -> Self {
        Self {
            page,
            size: size.min(Self::MAX_SIZE),
        }
    }

    /// Creates a page request for the first page with default size.
    #[must_use]
    pub fn first() -> Self {
        Self::new(0, Self::DEFAULT_SIZE)
    }

    /// Returns the offset for database queries.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.page * self.size
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// Information about a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// The current page number (0-indexed).
    pub page: usize,
    /// The number of items per page.
    pub size: usize,
    /// The total number of items across all pages.
    pub total_elements: u64,
    /// The total number of pages.
    pub total_pages: u64,
}

impl PageInfo {
    /// Creates a new page info; `total_pages` is `ceil(total_elements / size)`.
    #[must_use]
    pub fn new(page: usize, size: usize, total_elements: u64) -> Self {
        let total_pages = if size > 0 {
            total_elements.div_ceil(size as u64)
        } else {
            0
        };

        Self {
            page,
            size,
            total_elements,
            total_pages,
        }
    }
}

/// A page of results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items on this page.
    pub content: Vec<T>,
    /// Information about this page.
    #[serde(flatten)]
    pub info: PageInfo,
}

impl<T> Page<T> {
    /// Creates a new page.
    #[must_use]
    pub fn new(content: Vec<T>, page: usize, size: usize, total_elements: u64) -> Self {
        Self {
            content,
            info: PageInfo::new(page, size, total_elements),
        }
    }

    /// Creates a page for a request.
    #[must_use]
    pub fn of(content: Vec<T>, request: PageRequest, total_elements: u64) -> Self {
        Self::new(content, request.page, request.size, total_elements)
    }

    /// Creates an empty page.
    #[must_use]
    pub fn empty(page: usize, size: usize) -> Self {
        Self::new(Vec::new(), page, size, 0)
    }

    /// Maps the page content to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            info: self.info,
        }
    }

    /// Returns true if the page is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns the total number of elements across all pages.
    #[must_use]
    pub const fn total_elements(&self) -> u64 {
        self.info.total_elements
    }

    /// Returns the total number of pages.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        self.info.total_pages
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.content.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_params_translate_to_zero_based() {
        let req = PageParams::new(1, 15).to_page_request();
        assert_eq!(req.page, 0);
        assert_eq!(req.offset(), 0);

        let req = PageParams::new(3, 10).to_page_request();
        assert_eq!(req.page, 2);
        assert_eq!(req.offset(), 20);
        assert_eq!(req.limit(), 10);
    }

    #[test]
    fn test_page_params_defaults() {
        let params = PageParams::default();
        assert_eq!(params.page_number, 1);
        assert_eq!(params.page_size, 15);
    }

    #[test]
    fn test_page_params_validation() {
        assert!(PageParams::new(1, 15).validate().is_ok());
        assert!(PageParams::new(0, 15).validate().is_err());
        assert!(PageParams::new(1, 0).validate().is_err());
        assert!(PageParams::new(1, 101).validate().is_err());
    }

    #[test]
    fn test_page_request_max_size() {
        let req = PageRequest::new(0, 1000);
        assert_eq!(req.size, PageRequest::MAX_SIZE);
    }

    #[test]
    fn test_page_total_pages_is_ceiling() {
        let page: Page<i32> = Page::new(vec![1], 0, 5, 11);
        assert_eq!(page.total_elements(), 11);
        assert_eq!(page.total_pages(), 3);

        let exact: Page<i32> = Page::new(vec![1], 0, 5, 10);
        assert_eq!(exact.total_pages(), 2);
    }

    #[test]
    fn test_page_empty() {
        let page: Page<i32> = Page::empty(0, 10);
        assert!(page.is_empty());
        assert_eq!(page.len(), 0);
        assert_eq!(page.total_elements(), 0);
        assert_eq!(page.total_pages(), 0);
    }

    #[test]
    fn test_page_map_keeps_info() {
        let page = Page::new(vec![1, 2, 3], 1, 3, 7);
        let mapped = page.map(|x| x * 2);
        assert_eq!(mapped.content, vec![2, 4, 6]);
        assert_eq!(mapped.info, PageInfo::new(1, 3, 7));
    }
}
