//! File-based snapshot source.
//!
//! Reads a saved gmond/gmetad dump (for instance one captured with
//! `nc localhost 8649 > dump.xml`) instead of a live connection.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ggg_types::Snapshot;
use tracing::debug;

use super::{parse_snapshot, SnapshotSource};
use crate::error::Error;

/// A source that reads one document from a file.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    async fn fetch(&mut self) -> Result<Snapshot, Error> {
        let document = tokio::fs::read(&self.path)
            .await
            .map_err(|source| Error::Read {
                from: self.description.clone(),
                source,
            })?;
        debug!(bytes = document.len(), path = %self.path.display(), "read snapshot file");

        Ok(parse_snapshot(&document)?)
    }

    fn description(&self) -> &str {
        &self.description
    }
}
