//! Blob store trait.

use crate::error::Result;

/// Named text blobs under a single project root.
///
/// Names are relative, `/`-separated paths. Implementations reject names that
/// would escape the root.
pub trait BlobStore: Send + Sync {
    /// Read a blob. An absent blob reads as the empty string.
    fn read(&self, name: &str) -> Result<String>;

    /// Write a blob, creating parent directories and replacing any previous content.
    fn write(&self, name: &str, content: &str) -> Result<()>;

    /// Check whether a blob exists.
    fn exists(&self, name: &str) -> Result<bool>;

    /// Remove every blob under the root.
    fn clear(&self) -> Result<()>;

    /// All blob names, sorted.
    fn list(&self) -> Result<Vec<String>>;
}
