//! Generic page computation and pagination link building.

mod adapter;
mod collection;
mod links;
mod paginator;

pub use adapter::{
    parse_leading_int, OffsetPaginationAdapter, PageSource, PaginationAdapter, DEFAULT_PER_PAGE,
    MAX_PER_PAGE,
};
pub use collection::{PaginatedCollection, PaginationMetadata};
pub use links::{LinksBuilder, PaginationLinks};
pub use paginator::Paginator;
