//! This module defines the common functionality for paging list responses.

use serde::{Deserialize, Serialize};

/// The config for pagination.
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when only a page size is specified.
    pub default_page: u64,
    /// The page size to default to when only a page number is specified.
    pub default_page_size: u64,
    /// The largest page size a client may request.
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

/// Optional pagination query parameters, e.g. `?page=2&page_size=50`.
///
/// When neither parameter is supplied, list endpoints return a bare JSON
/// array instead of a [Page] envelope.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct PaginationParams {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
}

impl PaginationParams {
    /// Whether the client asked for a paged response at all.
    pub fn is_paged(&self) -> bool {
        self.page.is_some() || self.page_size.is_some()
    }

    /// Resolve the effective page number and page size against `config`.
    ///
    /// Zero or missing values fall back to the defaults, and the page size is
    /// capped at `config.max_page_size`.
    pub fn resolve(&self, config: &PaginationConfig) -> (u64, u64) {
        let page = match self.page {
            Some(page) if page > 0 => page,
            _ => config.default_page,
        };
        let page_size = match self.page_size {
            Some(size) if size > 0 => size.min(config.max_page_size),
            _ => config.default_page_size,
        };

        (page, page_size)
    }

    /// The number of rows to skip for the resolved page.
    pub fn offset(&self, config: &PaginationConfig) -> u64 {
        let (page, page_size) = self.resolve(config);

        (page - 1) * page_size
    }
}

/// The paged response envelope for list endpoints.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub total: u64,
}

impl<T> Page<T> {
    /// Wrap one page of `items` with its position and the `total` row count.
    pub fn new(items: Vec<T>, params: &PaginationParams, config: &PaginationConfig, total: u64) -> Self {
        let (page, page_size) = params.resolve(config);

        Self {
            items,
            page,
            page_size,
            total,
        }
    }
}
