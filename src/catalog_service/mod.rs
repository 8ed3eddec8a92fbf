//! Release listing and composite catalog creation on top of the store.

mod errors;
mod form;
mod listing;
mod resolution;

pub use errors::CatalogErrors;
pub use form::{
    parse_release_date, AlbumInput, ArtistInput, CatalogForm, CatalogRequest, ReleaseInput,
};
pub use listing::{
    parse_past_filter, ListError, ReleaseListParams, ReleaseListService, FETCH_FAILED,
};
pub use resolution::{
    AlbumParams, ArtistRef, CatalogResolutionService, ReleaseRef, ResolutionError,
    ResolutionParams, ResolutionResult, CREATION_FAILED,
};
