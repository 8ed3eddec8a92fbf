use serde::Serialize;

/// Page numbers and counts describing one page of a collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PaginationMetadata {
    pub current_page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub total_count: usize,
    pub next_page: Option<usize>,
    pub prev_page: Option<usize>,
}

impl PaginationMetadata {
    /// Computes the metadata for `page` given an already normalized page size.
    ///
    /// `page` and `per_page` must both be at least 1.
    pub fn new(page: usize, per_page: usize, total_count: usize) -> Self {
        let total_pages = total_count.div_ceil(per_page);
        PaginationMetadata {
            current_page: page,
            per_page,
            total_pages,
            total_count,
            next_page: (page < total_pages).then_some(page + 1),
            prev_page: (page > 1).then(|| page - 1),
        }
    }

    /// Whether the current page lies past the last page.
    pub fn is_overflow(&self) -> bool {
        self.current_page > self.total_pages
    }

    pub fn offset(&self) -> usize {
        (self.current_page - 1) * self.per_page
    }
}

/// The records of one page plus the metadata describing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaginatedCollection<T> {
    records: Vec<T>,
    metadata: PaginationMetadata,
}

impl<T> PaginatedCollection<T> {
    pub fn new(records: Vec<T>, metadata: PaginationMetadata) -> Self {
        PaginatedCollection { records, metadata }
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn metadata(&self) -> &PaginationMetadata {
        &self.metadata
    }

    pub fn into_parts(self) -> (Vec<T>, PaginationMetadata) {
        (self.records, self.metadata)
    }
}
