//! Pagination types

use serde::{Deserialize, Serialize};

fn default_curr_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    10
}

/// Upper bound on a single page
pub const MAX_PAGE_SIZE: u64 = 1000;

/// Page request, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(default = "default_curr_page")]
    pub curr_page: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            curr_page: default_curr_page(),
            page_size: default_page_size(),
        }
    }
}

impl PageQuery {
    pub fn new(curr_page: u64, page_size: u64) -> Self {
        Self {
            curr_page,
            page_size,
        }
        .normalized()
    }

    /// Clamp zero or oversized values into range
    pub fn normalized(self) -> Self {
        Self {
            curr_page: self.curr_page.max(1),
            page_size: self.page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Zero-based page index
    pub fn index(&self) -> u64 {
        self.curr_page.saturating_sub(1)
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub curr_page: u64,
    pub page_size: u64,
    pub total: u64,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(query: PageQuery, total: u64, data: Vec<T>) -> Self {
        Self {
            curr_page: query.curr_page,
            page_size: query.page_size,
            total,
            data,
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            curr_page: self.curr_page,
            page_size: self.page_size,
            total: self.total,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}
