//! Project catalog.
//!
//! The static table of tracker projects an issue may be filed into, and the
//! resolver that maps a model-suggested reference (id, short key or display
//! name) onto a canonical project id.

mod catalog;
mod entry;
mod errors;
mod hint;

pub use catalog::ProjectCatalog;
pub use entry::ProjectCatalogEntry;
pub use errors::{CatalogError, ResolutionError};
pub use hint::ProjectHint;
