//! Directory queries and operations.
//!
//! Thin wrappers over `std::fs` that log through `tracing` and report
//! failures as [`FileError`]. Creation treats an existing path as success,
//! and recursive removal treats a missing path as success.
//!
//! # Example
//!
//! ```ignore
//! use horizon_fs::directory::{create_dirs, for_each_entry};
//!
//! create_dirs("saves/slot1")?;
//!
//! let count = for_each_entry("saves", |_dir, name| {
//!     println!("{name}");
//!     true
//! })?;
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, trace, warn};

use crate::error::{FileError, FileResult};
use crate::logging::targets;
use crate::path::{DirectorySeparator, full_path_directory, sanitize_path};

// ============================================================================
// Queries
// ============================================================================

/// Returns true if something exists at `path`.
///
/// Errors while checking (permission problems, for instance) count as
/// "does not exist".
pub fn exists(path: impl AsRef<Path>) -> bool {
    fs::exists(path.as_ref()).unwrap_or(false)
}

/// Returns true if `path` exists and is a directory.
pub fn is_dir(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_dir()
}

// ============================================================================
// Creation
// ============================================================================

/// Creates a single directory. Succeeds if the path already exists.
///
/// # Errors
///
/// Returns an error if the parent is missing or permission is denied.
pub fn create_dir(path: impl AsRef<Path>) -> FileResult<()> {
    let path = path.as_ref();
    trace!(target: targets::FILESYSTEM, path = %path.display(), "create_dir");

    if exists(path) {
        debug!(target: targets::FILESYSTEM, path = %path.display(), "path exists");
        return Ok(());
    }

    fs::create_dir(path).map_err(|e| {
        error!(target: targets::FILESYSTEM, path = %path.display(), error = %e, "unable to create directory");
        FileError::from_io(e, path)
    })
}

/// Creates a directory and all missing parents. Succeeds if the path
/// already exists.
pub fn create_dirs(path: impl AsRef<Path>) -> FileResult<()> {
    let path = path.as_ref();
    trace!(target: targets::FILESYSTEM, path = %path.display(), "create_dirs");

    if exists(path) {
        debug!(target: targets::FILESYSTEM, path = %path.display(), "path exists");
        return Ok(());
    }

    fs::create_dir_all(path).map_err(|e| {
        error!(target: targets::FILESYSTEM, path = %path.display(), error = %e, "unable to create directories");
        FileError::from_io(e, path)
    })
}

/// Creates every directory a path needs.
///
/// The path is sanitized to forward slashes first. If it contains no `.` it
/// is taken to be a directory and created in full. Otherwise it is taken to
/// be a file and only the part before the last `/` is created.
///
/// A file name without any directory part (such as `"save.dat"`) creates
/// nothing and succeeds. So does a directory name containing a dot, which is
/// treated as a file: `"a/b.d"` only creates `"a"`.
///
/// # Example
///
/// ```ignore
/// create_full_path("logs/2024/latest.log")?; // creates logs/2024
/// create_full_path("cache\\shaders")?;        // creates cache/shaders
/// ```
pub fn create_full_path(path: &str) -> FileResult<()> {
    trace!(target: targets::FILESYSTEM, path, "create_full_path");
    let sanitized = sanitize_path(path, DirectorySeparator::ForwardSlash);
    create_dirs(full_path_directory(&sanitized))
}

// ============================================================================
// Removal and Copying
// ============================================================================

/// Removes a directory and everything in it. A missing directory is not an
/// error.
pub fn remove_dir_all(path: impl AsRef<Path>) -> FileResult<()> {
    let path = path.as_ref();
    trace!(target: targets::FILESYSTEM, path = %path.display(), "remove_dir_all");

    match fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(target: targets::FILESYSTEM, path = %path.display(), "does not exist");
            Ok(())
        }
        Err(e) => {
            error!(
                target: targets::FILESYSTEM,
                path = %path.display(),
                error = %e,
                "unable to completely delete directory"
            );
            Err(FileError::from_io(e, path))
        }
    }
}

/// Copies a directory tree into `dst`, skipping files that already exist.
///
/// This is best effort: entries that fail to copy are logged and skipped,
/// and the copy carries on with the rest. Returns the number of failures.
pub fn copy_dir(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> usize {
    let (src, dst) = (src.as_ref(), dst.as_ref());
    trace!(target: targets::FILESYSTEM, src = %src.display(), dst = %dst.display(), "copy_dir");

    let failures = copy_tree(src, dst);
    if failures == 0 {
        trace!(target: targets::FILESYSTEM, "successfully copied directory");
    } else {
        error!(
            target: targets::FILESYSTEM,
            src = %src.display(),
            dst = %dst.display(),
            failures,
            "error copying directory"
        );
    }
    failures
}

fn copy_tree(src: &Path, dst: &Path) -> usize {
    if let Err(e) = fs::create_dir_all(dst) {
        warn!(target: targets::FILESYSTEM, path = %dst.display(), error = %e, "cannot create copy target");
        return 1;
    }

    let entries = match fs::read_dir(src) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(target: targets::FILESYSTEM, path = %src.display(), error = %e, "cannot read copy source");
            return 1;
        }
    };

    let mut failures = 0;
    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(target: targets::FILESYSTEM, path = %src.display(), error = %e, "cannot read entry");
                failures += 1;
                continue;
            }
        };
        let from = entry.path();
        let to = dst.join(entry.file_name());

        if from.is_dir() {
            failures += copy_tree(&from, &to);
        } else if !exists(&to)
            && let Err(e) = fs::copy(&from, &to)
        {
            warn!(
                target: targets::FILESYSTEM,
                src = %from.display(),
                dst = %to.display(),
                error = %e,
                "cannot copy file"
            );
            failures += 1;
        }
    }
    failures
}

// ============================================================================
// Enumeration
// ============================================================================

/// Calls `visit` with the directory and the name of each of its entries.
///
/// `.` and `..` are never passed to the visitor. Order is whatever the host
/// returns. The visitor stops the walk by returning `false`.
///
/// Returns the number of entries visited.
///
/// # Errors
///
/// Returns an error if the directory cannot be read, and an
/// [`Interrupted`](crate::FileErrorKind::Interrupted) error if the visitor
/// stopped the walk.
pub fn for_each_entry<F>(directory: impl AsRef<Path>, mut visit: F) -> FileResult<u64>
where
    F: FnMut(&Path, &str) -> bool,
{
    let directory = directory.as_ref();
    trace!(target: targets::FILESYSTEM, directory = %directory.display(), "for_each_entry");

    let entries = fs::read_dir(directory).map_err(|e| FileError::from_io(e, directory))?;

    let mut visited = 0u64;
    for entry in entries {
        let entry = entry.map_err(|e| FileError::from_io(e, directory))?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name == "." || name == ".." {
            continue;
        }

        if !visit(directory, &name) {
            debug!(target: targets::FILESYSTEM, directory = %directory.display(), "enumeration stopped by visitor");
            return Err(FileError::interrupted(directory));
        }
        visited += 1;
    }
    Ok(visited)
}

// ============================================================================
// Working Directory
// ============================================================================

/// Returns the process working directory.
pub fn current_dir() -> FileResult<PathBuf> {
    std::env::current_dir().map_err(|e| {
        error!(target: targets::FILESYSTEM, error = %e, "unable to retrieve current working directory");
        FileError::from(e)
    })
}

/// Changes the process working directory.
pub fn set_current_dir(path: impl AsRef<Path>) -> FileResult<()> {
    let path = path.as_ref();
    std::env::set_current_dir(path).map_err(|e| {
        error!(target: targets::FILESYSTEM, path = %path.display(), error = %e, "unable to set working directory");
        FileError::from_io(e, path)
    })
}
