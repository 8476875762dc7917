//! Byte source and sink collaborators for path-based reading and writing.
//!
//! The codec itself only works on in-memory buffers; these traits are the
//! seam where a platform can substitute its own storage.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::{GbkfError, GbkfResult};

/// Source of whole buffers addressed by path.
pub trait ByteSource: Send + Sync {
    /// Reads every byte stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GbkfError::Io`] if the read fails.
    fn read_all(&self, path: &Path) -> GbkfResult<Vec<u8>>;
}

/// Destination for whole buffers addressed by path.
pub trait ByteSink: Send + Sync {
    /// Replaces the contents at `path` with `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`GbkfError::Io`] if the write fails.
    fn write_all(&self, path: &Path, bytes: &[u8]) -> GbkfResult<()>;
}

/// Local filesystem store.
///
/// Writes go to a sibling `.tmp` file that is renamed over the target, so a
/// reader never observes a half-written container.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl ByteSource for FsStore {
    fn read_all(&self, path: &Path) -> GbkfResult<Vec<u8>> {
        fs::read(path).map_err(|err| GbkfError::io(format!("reading {}", path.display()), err))
    }
}

impl ByteSink for FsStore {
    fn write_all(&self, path: &Path, bytes: &[u8]) -> GbkfResult<()> {
        let tmp_path = PathBuf::from(format!("{}.tmp", path.to_string_lossy()));
        fs::write(&tmp_path, bytes).map_err(|err| {
            GbkfError::io(format!("writing {}", tmp_path.display()), err)
        })?;
        fs::rename(&tmp_path, path).map_err(|err| {
            GbkfError::io(format!("renaming into {}", path.display()), err)
        })
    }
}
