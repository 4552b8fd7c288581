//! Built-in streams
//!
//! Each stream pairs a Matomo reporting method with the schema of the
//! records it yields.

mod types;
mod visits;

pub use types::{select_streams, Catalog, CatalogEntry, StreamDefinition};
pub use visits::{visits_details, VISITS_DETAILS};

/// Every built-in stream
pub fn all_streams() -> Vec<StreamDefinition> {
    vec![visits_details()]
}
