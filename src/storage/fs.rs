//! Filesystem-backed blob store.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use super::traits::BlobStore;
use crate::error::{Result, SwarmError};

/// Blob store rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Create a store. The root directory is created lazily on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a store and make sure the root directory exists.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self> {
        let store = Self::new(root);
        fs::create_dir_all(&store.root)?;
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a blob name onto a path under the root.
    fn resolve(&self, name: &str) -> Result<PathBuf> {
        if name.trim().is_empty() {
            return Err(SwarmError::Storage("empty blob name".to_string()));
        }

        let relative = Path::new(name);
        for component in relative.components() {
            match component {
                Component::Normal(_) | Component::CurDir => {}
                _ => {
                    return Err(SwarmError::Storage(format!("blob name escapes project root: {}", name)));
                }
            }
        }

        Ok(self.root.join(relative))
    }

    /// Glob drops a leading `./`, so both sides are compared without one.
    fn relative_name(&self, path: &Path) -> Option<String> {
        let root = without_cur_dir(&self.root);
        let path = without_cur_dir(path);
        let relative = path.strip_prefix(&root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        if parts.is_empty() { None } else { Some(parts.join("/")) }
    }
}

fn without_cur_dir(path: &Path) -> PathBuf {
    path.components().filter(|c| !matches!(c, Component::CurDir)).collect()
}

impl BlobStore for FsBlobStore {
    fn read(&self, name: &str) -> Result<String> {
        let path = self.resolve(name)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, name: &str, content: &str) -> Result<()> {
        let path = self.resolve(name)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content)?;
        log::debug!("Wrote {} ({} bytes)", path.display(), content.len());
        Ok(())
    }

    fn exists(&self, name: &str) -> Result<bool> {
        Ok(self.resolve(name)?.is_file())
    }

    fn clear(&self) -> Result<()> {
        if !self.root.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.is_dir() {
                fs::remove_dir_all(&path)?;
            } else {
                fs::remove_file(&path)?;
            }
        }
        log::info!("Cleared project root {}", self.root.display());
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let root = glob::Pattern::escape(&self.root.to_string_lossy());
        let pattern = format!("{}/**/*", root);
        let entries = glob::glob(&pattern).map_err(|e| SwarmError::Storage(e.to_string()))?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| SwarmError::Storage(e.to_string()))?;
            if path.is_file()
                && let Some(name) = self.relative_name(&path)
            {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}
