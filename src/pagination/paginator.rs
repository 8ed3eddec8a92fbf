use super::adapter::{OffsetPaginationAdapter, PageSource, PaginationAdapter};
use super::collection::PaginatedCollection;
use anyhow::Result;
use std::sync::Arc;

/// Entry point used by services to paginate a source.
///
/// Holds the active strategy. `Paginator::default()` uses the offset adapter
/// with its default page sizes; `Paginator::new` swaps in another strategy.
pub struct Paginator<T> {
    adapter: Arc<dyn PaginationAdapter<T>>,
}

impl<T> Paginator<T> {
    pub fn new(adapter: Arc<dyn PaginationAdapter<T>>) -> Self {
        Paginator { adapter }
    }

    pub fn paginate(
        &self,
        source: &dyn PageSource<T>,
        page: Option<&str>,
        per_page: Option<&str>,
    ) -> Result<PaginatedCollection<T>> {
        self.adapter.paginate(source, page, per_page)
    }
}

impl<T> Default for Paginator<T> {
    fn default() -> Self {
        Paginator::new(Arc::new(OffsetPaginationAdapter::default()))
    }
}

impl<T> Clone for Paginator<T> {
    fn clone(&self) -> Self {
        Paginator {
            adapter: self.adapter.clone(),
        }
    }
}
