//! File sinks for finished artifacts
//!
//! A sink receives a complete named payload. Writes are all-or-nothing: a
//! failed write never leaves a truncated artifact behind.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("Invalid artifact name: '{0}'")]
    InvalidName(String),
}

/// Destination for exported artifacts
pub trait FileSink {
    /// Stores `bytes` under `name`, replacing any previous artifact
    fn write(&mut self, name: &str, bytes: &[u8]) -> Result<(), SinkError>;
}

impl<S: FileSink + ?Sized> FileSink for &mut S {
    fn write(&mut self, name: &str, bytes: &[u8]) -> Result<(), SinkError> {
        (**self).write(name, bytes)
    }
}

/// Writes artifacts into a directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns where an artifact with this name is stored
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn write_atomic(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        let target = self.path_for(name);
        let temp = self.dir.join(format!(".{}.tmp", name));

        let result = (|| {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp)?;
            file.lock_exclusive()?;

            let mut writer = io::BufWriter::new(&file);
            writer.write_all(bytes)?;
            writer.flush()?;
            drop(writer);
            file.sync_all()?;
            drop(file);

            fs::rename(&temp, &target)
        })();

        if result.is_err() {
            let _ = fs::remove_file(&temp);
        }
        result
    }
}

impl FileSink for DirectorySink {
    fn write(&mut self, name: &str, bytes: &[u8]) -> Result<(), SinkError> {
        validate_name(name)?;
        self.write_atomic(name, bytes).map_err(|source| SinkError::Io {
            name: name.to_string(),
            source,
        })?;
        debug!("Wrote {} ({} bytes) to {}", name, bytes.len(), self.dir.display());
        Ok(())
    }
}

/// Keeps artifacts in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    artifacts: Vec<(String, Vec<u8>)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored payload for `name`
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.artifacts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, bytes)| bytes.as_slice())
    }

    /// Names of stored artifacts, in first-write order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.artifacts.iter().map(|(n, _)| n.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl FileSink for MemorySink {
    fn write(&mut self, name: &str, bytes: &[u8]) -> Result<(), SinkError> {
        validate_name(name)?;
        match self.artifacts.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = bytes.to_vec(),
            None => self.artifacts.push((name.to_string(), bytes.to_vec())),
        }
        Ok(())
    }
}

/// Artifact names are plain file names
fn validate_name(name: &str) -> Result<(), SinkError> {
    let plain = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0');
    if plain {
        Ok(())
    } else {
        Err(SinkError::InvalidName(name.to_string()))
    }
}
