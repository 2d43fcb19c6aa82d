//! Content-addressed artifact storage
//!
//! Artifacts are looked up by stable identifier only. The filesystem is one
//! backing; tests and embedders can use the in-memory one.

use super::ArtifactFormat;
use crate::error::ForgeError;
use crate::result::Result;
use dashmap::DashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Identifier → artifact text
pub trait ArtifactStore: Send + Sync {
    /// Artifact content, or `None` when nothing was stored under `identifier`
    fn get(&self, identifier: &str) -> Result<Option<String>>;

    /// Store `content` under `identifier`, replacing any previous artifact
    fn put(&self, identifier: &str, content: &str) -> Result<()>;

    /// Format every artifact in this store is written in
    fn format(&self) -> ArtifactFormat;
}

/// Stores artifacts as `<dir>/<identifier>.<ext>`
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    dir: PathBuf,
    format: ArtifactFormat,
}

impl FsArtifactStore {
    pub fn new(dir: impl Into<PathBuf>, format: ArtifactFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, identifier: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", identifier, self.format.extension()))
    }
}

impl ArtifactStore for FsArtifactStore {
    fn get(&self, identifier: &str) -> Result<Option<String>> {
        let path = self.path_for(identifier);
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ForgeError::io_error(path, e)),
        }
    }

    fn put(&self, identifier: &str, content: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| ForgeError::io_error(&self.dir, e))?;
        let path = self.path_for(identifier);
        fs::write(&path, content).map_err(|e| ForgeError::io_error(&path, e))?;
        tracing::debug!("Wrote {}", path.display());
        Ok(())
    }

    fn format(&self) -> ArtifactFormat {
        self.format
    }
}

/// In-memory store, safe to share between generation workers
#[derive(Debug, Default)]
pub struct MemoryArtifactStore {
    artifacts: DashMap<String, String>,
    format: ArtifactFormat,
}

impl MemoryArtifactStore {
    pub fn new(format: ArtifactFormat) -> Self {
        Self {
            artifacts: DashMap::new(),
            format,
        }
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn identifiers(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.artifacts.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn get(&self, identifier: &str) -> Result<Option<String>> {
        Ok(self.artifacts.get(identifier).map(|entry| entry.value().clone()))
    }

    fn put(&self, identifier: &str, content: &str) -> Result<()> {
        self.artifacts
            .insert(identifier.to_string(), content.to_string());
        Ok(())
    }

    fn format(&self) -> ArtifactFormat {
        self.format
    }
}
