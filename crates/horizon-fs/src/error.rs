//! Error types for filesystem and file-handle operations.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error type for filesystem operations.
///
/// Carries the failure category, the path involved (when there is one) and
/// the host error that caused it, so callers can log a complete message.
#[derive(Debug)]
pub struct FileError {
    /// The kind of error that occurred.
    kind: FileErrorKind,
    /// The path involved in the error, if any.
    path: Option<PathBuf>,
    /// The underlying host error, if any.
    source: Option<io::Error>,
}

/// The kind of file error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileErrorKind {
    /// File or directory not found.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// File already exists (when creating exclusively).
    AlreadyExists,
    /// Invalid path, filename or argument.
    InvalidPath,
    /// The path is a directory, not a file.
    IsDirectory,
    /// The path is a file, not a directory.
    NotDirectory,
    /// No space left on device.
    NoSpace,
    /// Read-only filesystem.
    ReadOnly,
    /// The operation was interrupted before it completed.
    Interrupted,
    /// Invalid data or encoding.
    InvalidData,
    /// The file handle has no open file.
    NotOpen,
    /// An unknown or unclassified error occurred.
    Other,
}

impl FileErrorKind {
    fn from_io_kind(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => FileErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => FileErrorKind::PermissionDenied,
            io::ErrorKind::AlreadyExists => FileErrorKind::AlreadyExists,
            io::ErrorKind::InvalidInput | io::ErrorKind::InvalidFilename => {
                FileErrorKind::InvalidPath
            }
            io::ErrorKind::IsADirectory => FileErrorKind::IsDirectory,
            io::ErrorKind::NotADirectory => FileErrorKind::NotDirectory,
            io::ErrorKind::StorageFull => FileErrorKind::NoSpace,
            io::ErrorKind::ReadOnlyFilesystem => FileErrorKind::ReadOnly,
            io::ErrorKind::Interrupted => FileErrorKind::Interrupted,
            io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => {
                FileErrorKind::InvalidData
            }
            _ => FileErrorKind::Other,
        }
    }
}

impl FileError {
    /// Creates a new file error.
    pub fn new(kind: FileErrorKind, path: Option<PathBuf>, source: Option<io::Error>) -> Self {
        Self { kind, path, source }
    }

    /// Creates a file error from a host I/O error and the path it concerns.
    pub fn from_io(err: io::Error, path: impl Into<PathBuf>) -> Self {
        Self {
            kind: FileErrorKind::from_io_kind(err.kind()),
            path: Some(path.into()),
            source: Some(err),
        }
    }

    /// Creates a "not found" error for the given path.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(FileErrorKind::NotFound, Some(path.into()), None)
    }

    /// Creates a "not a directory" error for the given path.
    pub fn not_directory(path: impl Into<PathBuf>) -> Self {
        Self::new(FileErrorKind::NotDirectory, Some(path.into()), None)
    }

    /// Creates an "invalid data" error with a custom message.
    pub fn invalid_data(message: &str) -> Self {
        Self::new(
            FileErrorKind::InvalidData,
            None,
            Some(io::Error::new(io::ErrorKind::InvalidData, message)),
        )
    }

    /// Creates the error reported by a file handle with nothing open.
    pub fn not_open() -> Self {
        Self::new(FileErrorKind::NotOpen, None, None)
    }

    /// Creates the error reported when a visitor stops an enumeration early.
    pub fn interrupted(path: impl Into<PathBuf>) -> Self {
        Self::new(FileErrorKind::Interrupted, Some(path.into()), None)
    }

    /// Returns the kind of error.
    pub fn kind(&self) -> FileErrorKind {
        self.kind
    }

    /// Returns the path involved in the error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// Returns the underlying I/O error, if any.
    pub fn io_error(&self) -> Option<&io::Error> {
        self.source.as_ref()
    }

    /// Returns true if this error indicates the file was not found.
    pub fn is_not_found(&self) -> bool {
        self.kind == FileErrorKind::NotFound
    }

    /// Returns true if this error came from a handle with nothing open.
    pub fn is_not_open(&self) -> bool {
        self.kind == FileErrorKind::NotOpen
    }
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", self.kind, path.display())?,
            None => write!(f, "{}", self.kind)?,
        }
        if let Some(source) = &self.source {
            write!(f, " ({source})")?;
        }
        Ok(())
    }
}

impl fmt::Display for FileErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileErrorKind::NotFound => write!(f, "file not found"),
            FileErrorKind::PermissionDenied => write!(f, "permission denied"),
            FileErrorKind::AlreadyExists => write!(f, "file already exists"),
            FileErrorKind::InvalidPath => write!(f, "invalid path"),
            FileErrorKind::IsDirectory => write!(f, "is a directory"),
            FileErrorKind::NotDirectory => write!(f, "not a directory"),
            FileErrorKind::NoSpace => write!(f, "no space left on device"),
            FileErrorKind::ReadOnly => write!(f, "read-only filesystem"),
            FileErrorKind::Interrupted => write!(f, "operation interrupted"),
            FileErrorKind::InvalidData => write!(f, "invalid data"),
            FileErrorKind::NotOpen => write!(f, "file handle is not open"),
            FileErrorKind::Other => write!(f, "file error"),
        }
    }
}

impl std::error::Error for FileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<io::Error> for FileError {
    fn from(err: io::Error) -> Self {
        Self {
            kind: FileErrorKind::from_io_kind(err.kind()),
            path: None,
            source: Some(err),
        }
    }
}

/// A specialized Result type for file operations.
pub type FileResult<T> = Result<T, FileError>;
