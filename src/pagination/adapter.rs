//! Pluggable pagination strategies.

use super::collection::{PaginatedCollection, PaginationMetadata};
use anyhow::Result;

pub const DEFAULT_PER_PAGE: usize = 10;
pub const MAX_PER_PAGE: usize = 100;

/// A collection that can be counted and sliced.
pub trait PageSource<T> {
    fn total_count(&self) -> Result<usize>;

    fn fetch(&self, offset: usize, limit: usize) -> Result<Vec<T>>;
}

/// Strategy turning raw page parameters and a source into one page.
///
/// `page` and `per_page` are passed as received from the client and are
/// normalized by the adapter.
pub trait PaginationAdapter<T>: Send + Sync {
    fn paginate(
        &self,
        source: &dyn PageSource<T>,
        page: Option<&str>,
        per_page: Option<&str>,
    ) -> Result<PaginatedCollection<T>>;
}

/// Offset/limit pagination driven by a total count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OffsetPaginationAdapter {
    pub default_per_page: usize,
    pub max_per_page: usize,
}

impl Default for OffsetPaginationAdapter {
    fn default() -> Self {
        OffsetPaginationAdapter {
            default_per_page: DEFAULT_PER_PAGE,
            max_per_page: MAX_PER_PAGE,
        }
    }
}

impl OffsetPaginationAdapter {
    pub fn new(default_per_page: usize, max_per_page: usize) -> Self {
        OffsetPaginationAdapter {
            default_per_page,
            max_per_page,
        }
    }

    pub fn normalize_page(page: Option<&str>) -> usize {
        match page.map(parse_leading_int) {
            Some(page) if page > 0 => page as usize,
            _ => 1,
        }
    }

    pub fn normalize_per_page(&self, per_page: Option<&str>) -> usize {
        let per_page = match per_page.map(parse_leading_int) {
            Some(per_page) if per_page > 0 => per_page as usize,
            _ => self.default_per_page,
        };
        per_page.min(self.max_per_page).max(1)
    }
}

impl<T> PaginationAdapter<T> for OffsetPaginationAdapter {
    fn paginate(
        &self,
        source: &dyn PageSource<T>,
        page: Option<&str>,
        per_page: Option<&str>,
    ) -> Result<PaginatedCollection<T>> {
        let page = Self::normalize_page(page);
        let per_page = self.normalize_per_page(per_page);
        let metadata = PaginationMetadata::new(page, per_page, source.total_count()?);

        if metadata.is_overflow() {
            return Ok(PaginatedCollection::new(vec![], metadata));
        }

        let records = source.fetch(metadata.offset(), per_page)?;
        Ok(PaginatedCollection::new(records, metadata))
    }
}

/// Parses the leading integer of `raw`, `0` when there is none.
///
/// Surrounding whitespace and trailing garbage are ignored: `"3abc"` is 3,
/// `" -2"` is -2, `"abc"` is 0. Values out of range saturate.
pub fn parse_leading_int(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let mut value: i64 = 0;
    for c in digits.chars().take_while(|c| c.is_ascii_digit()) {
        let digit = i64::from(c as u8 - b'0');
        value = value.saturating_mul(10).saturating_add(digit);
    }
    if negative {
        -value
    } else {
        value
    }
}
