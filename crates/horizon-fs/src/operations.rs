//! Single-file operations.
//!
//! One-shot helpers for removing, renaming, copying and measuring files, and
//! for moving whole strings in and out of them. The string helpers go through
//! [`FileHandle`].

use std::fs;
use std::path::Path;

use tracing::{debug, error, trace};

use crate::directory::exists;
use crate::error::{FileError, FileErrorKind, FileResult};
use crate::handle::FileHandle;
use crate::logging::targets;
use crate::opener::OpenMode;

// ============================================================================
// Removing, Renaming, Copying
// ============================================================================

/// Removes a file or an empty directory.
///
/// A path that does not exist counts as removed.
///
/// # Errors
///
/// Returns an error if the path exists but cannot be removed.
pub fn remove_file(path: impl AsRef<Path>) -> FileResult<()> {
    let path = path.as_ref();
    trace!(target: targets::FILESYSTEM, path = %path.display(), "remove_file");

    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(target: targets::FILESYSTEM, path = %path.display(), "does not exist");
            return Ok(());
        }
        Err(e) => return Err(FileError::from_io(e, path)),
    };

    let result = if metadata.is_dir() {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| {
        error!(target: targets::FILESYSTEM, path = %path.display(), error = %e, "unable to remove");
        FileError::from_io(e, path)
    })
}

/// Renames (moves) `src` to `dst`.
pub fn rename(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> FileResult<()> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    trace!(target: targets::FILESYSTEM, src = %src.display(), dst = %dst.display(), "rename");

    fs::rename(src, dst).map_err(|e| {
        error!(
            target: targets::FILESYSTEM,
            src = %src.display(),
            dst = %dst.display(),
            error = %e,
            "unable to rename"
        );
        FileError::from_io(e, src)
    })
}

/// Copies a file.
///
/// When `overwrite` is false and `dst` already exists, nothing is copied and
/// an `AlreadyExists` error is returned.
pub fn copy_file(src: impl AsRef<Path>, dst: impl AsRef<Path>, overwrite: bool) -> FileResult<()> {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    trace!(target: targets::FILESYSTEM, src = %src.display(), dst = %dst.display(), overwrite, "copy_file");

    if !overwrite && exists(dst) {
        debug!(target: targets::FILESYSTEM, dst = %dst.display(), "copy target exists");
        return Err(FileError::new(
            FileErrorKind::AlreadyExists,
            Some(dst.to_path_buf()),
            None,
        ));
    }

    fs::copy(src, dst).map(|_| ()).map_err(|e| {
        error!(
            target: targets::FILESYSTEM,
            src = %src.display(),
            dst = %dst.display(),
            error = %e,
            "unable to copy file"
        );
        FileError::from_io(e, src)
    })
}

// ============================================================================
// Size
// ============================================================================

/// Returns the size of a file in bytes, or 0 if it cannot be determined.
///
/// Directories and missing paths report 0. The failure is logged.
pub fn file_size(path: impl AsRef<Path>) -> u64 {
    let path = path.as_ref();
    match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => metadata.len(),
        Ok(_) => {
            error!(target: targets::FILESYSTEM, path = %path.display(), "unable to retrieve file size: not a file");
            0
        }
        Err(e) => {
            error!(target: targets::FILESYSTEM, path = %path.display(), error = %e, "unable to retrieve file size");
            0
        }
    }
}

// ============================================================================
// Whole-File Helpers
// ============================================================================

/// Creates an empty file, truncating it if it exists.
pub fn create_empty_file(path: impl AsRef<Path>) -> FileResult<()> {
    let path = path.as_ref();
    trace!(target: targets::FILESYSTEM, path = %path.display(), "create_empty_file");

    FileHandle::open(path, OpenMode::WRITE).map(drop).inspect_err(|e| {
        error!(target: targets::FILESYSTEM, path = %path.display(), error = %e, "unable to create file");
    })
}

/// Replaces the contents of a file with `text`.
///
/// Returns the number of bytes written.
pub fn write_string_to_file(path: impl AsRef<Path>, text: &str) -> FileResult<usize> {
    let mut file = FileHandle::open(path, OpenMode::WRITE)?;
    file.write_string(text)
}

/// Reads a whole file as UTF-8 text.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read, or an
/// `InvalidData` error if its contents are not UTF-8.
pub fn read_file_to_string(path: impl AsRef<Path>) -> FileResult<String> {
    let path = path.as_ref();
    let mut file = FileHandle::open(path, OpenMode::READ)?;

    let size = usize::try_from(file.size()?)
        .map_err(|_| FileError::invalid_data("file too large to read into memory"))?;
    let mut bytes = vec![0u8; size];
    let read = file.read_bytes(&mut bytes)?;
    bytes.truncate(read);

    String::from_utf8(bytes).map_err(|e| {
        FileError::new(
            FileErrorKind::InvalidData,
            Some(path.to_path_buf()),
            Some(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
        )
    })
}
