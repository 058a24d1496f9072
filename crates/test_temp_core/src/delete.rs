//! Bottom-up removal of a temporary tree.
//!
//! [`delete_all`] removes files first, then the directories they emptied, then
//! the root itself. The first entry that cannot be removed aborts the walk
//! with [`TempError::Delete`]; whatever was removed before stays removed.
//!
//! Symbolic links are removed as links. Their targets are never visited, so
//! a link pointing outside the tree cannot drag the walk out of it.

use crate::error::TempError;
use std::fs::{self, FileType};
use std::io;
use std::path::Path;

/// Recursively deletes `path`. Succeeds trivially when `path` does not exist.
///
/// # Errors
///
/// Returns [`TempError::Delete`] naming the first entry that could not be
/// listed or removed.
pub fn delete_all(path: &Path) -> Result<(), TempError> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(TempError::delete(path, err)),
    };

    remove_entry(path, metadata.file_type())
}

fn remove_entry(path: &Path, file_type: FileType) -> Result<(), TempError> {
    if file_type.is_dir() {
        remove_tree(path)
    } else if file_type.is_symlink() {
        remove_link(path)
    } else {
        tracing::trace!(path = %path.display(), "removing file");
        fs::remove_file(path).map_err(|err| TempError::delete(path, err))
    }
}

fn remove_tree(dir: &Path) -> Result<(), TempError> {
    let entries = fs::read_dir(dir).map_err(|err| TempError::delete(dir, err))?;

    for entry in entries {
        let entry = entry.map_err(|err| TempError::delete(dir, err))?;
        let child = entry.path();
        // `DirEntry::file_type` does not traverse symlinks.
        let file_type = entry
            .file_type()
            .map_err(|err| TempError::delete(&child, err))?;
        remove_entry(&child, file_type)?;
    }

    tracing::trace!(path = %dir.display(), "removing directory");
    fs::remove_dir(dir).map_err(|err| TempError::delete(dir, err))
}

#[cfg(windows)]
fn remove_link(path: &Path) -> Result<(), TempError> {
    use std::os::windows::fs::FileTypeExt;

    let is_dir_link = fs::symlink_metadata(path)
        .map(|metadata| metadata.file_type().is_symlink_dir())
        .map_err(|err| TempError::delete(path, err))?;
    let result = if is_dir_link {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|err| TempError::delete(path, err))
}

#[cfg(not(windows))]
fn remove_link(path: &Path) -> Result<(), TempError> {
    tracing::trace!(path = %path.display(), "removing symlink");
    fs::remove_file(path).map_err(|err| TempError::delete(path, err))
}
