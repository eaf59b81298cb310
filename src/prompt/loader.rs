//! Prompt override files.
//!
//! An override directory holds `<template name>.md` files, e.g.
//! `worker.system.md`. Files are read once while the prompt set is built.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SwarmError};

/// Reads override templates from one directory.
pub struct PromptLoader {
    dir: PathBuf,
}

impl PromptLoader {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.md", name))
    }

    /// Override text for `name`, or `None` when the directory has no such file.
    pub fn read_override(&self, name: &str) -> Result<Option<String>> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| SwarmError::Template(format!("cannot read {}: {}", path.display(), e)))
    }

    /// Template names present in the directory, sorted.
    pub fn names(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            SwarmError::Template(format!("cannot read prompts directory {}: {}", self.dir.display(), e))
        })?;

        let mut names: Vec<String> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "md"))
            .filter_map(|path| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        names.sort();
        Ok(names)
    }
}
