//! Read-only object file buffers.
//!
//! Input objects are memory-mapped and never mutated. The mapping is
//! released when the `ObjectFile` drops, on success and error paths alike.

use std::fs::File;
use std::path::{Path, PathBuf};

use memmap2::Mmap;
use tracing::debug;

use crate::error::{DefgenError, Result};

/// One input object file: its source path plus mapped contents.
#[derive(Debug)]
pub struct ObjectFile {
    path: PathBuf,
    map: Mmap,
}

impl ObjectFile {
    /// Open and map an object file read-only.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| DefgenError::UnreadableFile {
            path: path.clone(),
            source,
        })?;
        // Safety: the map is read-only; the file must not be truncated
        // by another process while mapped.
        let map = unsafe { Mmap::map(&file) }.map_err(|source| DefgenError::UnreadableFile {
            path: path.clone(),
            source,
        })?;
        debug!("mapped {} ({} bytes)", path.display(), map.len());
        Ok(Self { path, map })
    }

    /// The mapped file contents.
    pub fn data(&self) -> &[u8] {
        &self.map
    }

    /// The path this buffer was mapped from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
