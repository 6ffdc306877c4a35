//! apidoc-index
//!
//! In-memory index over one OpenAPI (Swagger) document. A [`DocumentLoader`]
//! turns a URL, file or pre-fetched value into an immutable [`Snapshot`];
//! an [`ApiIndex`] holds the current snapshot and answers four queries:
//!
//! - group listing by tag (untagged operations under `default`)
//! - operations of one group
//! - single operation detail with all references expanded
//! - weighted keyword search

pub mod document;
pub mod error;
pub mod index;
pub mod loader;
pub mod reference;
pub mod search;
pub mod snapshot;
pub mod source;
pub mod views;

#[cfg(test)]
mod fixtures;

pub use document::{HttpMethod, OpenApiDocument, RefOr};
pub use error::{IndexError, LoadError, Result};
pub use index::ApiIndex;
pub use loader::{DocumentLoader, LoaderConfig};
pub use snapshot::{Snapshot, DEFAULT_GROUP};
pub use source::Location;
pub use views::{ApiDetail, ApiGroup, ApiGroupSummary, ApiInfo, ApiSearchResult, ApiSummary};
