//! Project storage.
//!
//! Every artifact the swarm produces, the checklist included, is a named text
//! blob under the project root.

mod fs;
mod traits;

pub use fs::FsBlobStore;
pub use traits::BlobStore;
