//! RAII file handle with typed reads and writes.
//!
//! A [`FileHandle`] owns at most one open file. It is closed on drop, can be
//! closed explicitly, and can be reopened onto a different file. Every
//! operation on a closed handle fails with [`FileErrorKind::NotOpen`], which
//! keeps "nothing was transferred" (`Ok(0)`) apart from "the handle is
//! unusable".
//!
//! # Example
//!
//! ```ignore
//! use horizon_fs::{FileHandle, OpenMode, SeekOrigin};
//!
//! let mut file = FileHandle::open("save.bin", OpenMode::WRITE_READ)?;
//! file.write_array(&[1u32, 2, 3])?;
//! file.seek(0, SeekOrigin::Start)?;
//!
//! let mut values = [0u32; 3];
//! assert_eq!(file.read_array(&mut values)?, 3);
//! ```
//!
//! [`FileErrorKind::NotOpen`]: crate::FileErrorKind::NotOpen

use std::fs;
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use bytemuck::Pod;
use tracing::{debug, trace};

use crate::error::{FileError, FileResult};
use crate::logging::targets;
use crate::opener::{HostFileOpener, NativeOpener, OpenMode, ShareMode};

/// Reference point for [`FileHandle::seek`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekOrigin {
    /// Offset from the start of the file. Must not be negative.
    Start,
    /// Offset from the current position.
    Current,
    /// Offset from the end of the file.
    End,
}

impl SeekOrigin {
    fn to_seek_from(self, offset: i64) -> io::Result<SeekFrom> {
        match self {
            SeekOrigin::Start => u64::try_from(offset).map(SeekFrom::Start).map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidInput, "negative offset from start")
            }),
            SeekOrigin::Current => Ok(SeekFrom::Current(offset)),
            SeekOrigin::End => Ok(SeekFrom::End(offset)),
        }
    }
}

/// An exclusively owned, possibly closed, file.
///
/// Handles are move-only. Dropping an open handle closes it.
pub struct FileHandle {
    file: Option<fs::File>,
    path: PathBuf,
}

static_assertions::assert_impl_all!(FileHandle: Send, Sync);
static_assertions::assert_not_impl_any!(FileHandle: Clone, Copy);

impl FileHandle {
    /// Creates a closed handle.
    pub fn new() -> Self {
        Self {
            file: None,
            path: PathBuf::new(),
        }
    }

    /// Opens `path` with the host's default sharing.
    ///
    /// # Errors
    ///
    /// Returns the host error if the file cannot be opened.
    pub fn open(path: impl AsRef<Path>, mode: OpenMode) -> FileResult<Self> {
        let mut handle = Self::new();
        handle.reopen(path, mode, ShareMode::default())?;
        Ok(handle)
    }

    /// Opens `path` on this handle, closing whatever it held before.
    ///
    /// On failure the handle is left closed.
    pub fn reopen(
        &mut self,
        path: impl AsRef<Path>,
        mode: OpenMode,
        share: ShareMode,
    ) -> FileResult<()> {
        self.reopen_with(&NativeOpener::default(), path, mode, share)
    }

    /// Like [`reopen`](Self::reopen), opening through a specific host opener.
    pub fn reopen_with<O: HostFileOpener + ?Sized>(
        &mut self,
        opener: &O,
        path: impl AsRef<Path>,
        mode: OpenMode,
        share: ShareMode,
    ) -> FileResult<()> {
        self.file = None;
        self.path = path.as_ref().to_path_buf();

        match opener.open(&self.path, mode, share) {
            Ok(file) => {
                trace!(target: targets::HANDLE, path = %self.path.display(), ?mode, "opened");
                self.file = Some(file);
                Ok(())
            }
            Err(e) => {
                debug!(
                    target: targets::HANDLE,
                    path = %self.path.display(),
                    ?mode,
                    error = %e,
                    "open failed"
                );
                Err(FileError::from_io(e, &self.path))
            }
        }
    }

    /// Returns true if a file is open.
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Returns the path most recently opened on this handle.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Closes the file.
    ///
    /// Closing a handle that has nothing open fails with `NotOpen`.
    pub fn close(&mut self) -> FileResult<()> {
        match self.file.take() {
            Some(file) => {
                drop(file);
                trace!(target: targets::HANDLE, path = %self.path.display(), "closed");
                Ok(())
            }
            None => Err(FileError::not_open()),
        }
    }

    /// Returns the size of the file in bytes.
    ///
    /// Asks the host directly first. If that fails, the size is found by
    /// seeking to the end and back. The position is unchanged on success.
    pub fn size(&mut self) -> FileResult<u64> {
        let file = self.file.as_mut().ok_or_else(FileError::not_open)?;
        match file.metadata() {
            Ok(metadata) => Ok(metadata.len()),
            Err(e) => {
                debug!(
                    target: targets::HANDLE,
                    path = %self.path.display(),
                    error = %e,
                    "metadata unavailable, measuring by seeking"
                );
                stream_len(file).map_err(|e| FileError::from_io(e, &self.path))
            }
        }
    }

    /// Moves the position and returns the new offset from the start.
    pub fn seek(&mut self, offset: i64, origin: SeekOrigin) -> FileResult<u64> {
        let file = self.file.as_mut().ok_or_else(FileError::not_open)?;
        let target = origin
            .to_seek_from(offset)
            .map_err(|e| FileError::from_io(e, &self.path))?;
        file.seek(target)
            .map_err(|e| FileError::from_io(e, &self.path))
    }

    /// Returns the current offset from the start of the file.
    pub fn tell(&mut self) -> FileResult<u64> {
        let file = self.file.as_mut().ok_or_else(FileError::not_open)?;
        file.stream_position()
            .map_err(|e| FileError::from_io(e, &self.path))
    }

    /// Pushes any buffered writes to the host.
    pub fn flush(&mut self) -> FileResult<()> {
        let file = self.file.as_mut().ok_or_else(FileError::not_open)?;
        file.flush().map_err(|e| FileError::from_io(e, &self.path))
    }

    /// Reads up to `buffer.len()` elements and returns how many were read.
    ///
    /// Fewer elements than requested means the end of the file was reached
    /// (or an error stopped the read after some data arrived). A trailing
    /// partial element is consumed from the file but not counted.
    pub fn read_array<T: Pod>(&mut self, buffer: &mut [T]) -> FileResult<usize> {
        let file = self.file.as_mut().ok_or_else(FileError::not_open)?;
        if buffer.is_empty() || size_of::<T>() == 0 {
            return Ok(0);
        }
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(buffer);
        let read = read_up_to(file, bytes).map_err(|e| FileError::from_io(e, &self.path))?;
        Ok(read / size_of::<T>())
    }

    /// Writes up to `buffer.len()` elements and returns how many were written.
    pub fn write_array<T: Pod>(&mut self, buffer: &[T]) -> FileResult<usize> {
        let file = self.file.as_mut().ok_or_else(FileError::not_open)?;
        if buffer.is_empty() || size_of::<T>() == 0 {
            return Ok(0);
        }
        let bytes: &[u8] = bytemuck::cast_slice(buffer);
        let written = write_up_to(file, bytes).map_err(|e| FileError::from_io(e, &self.path))?;
        Ok(written / size_of::<T>())
    }

    /// Reads raw bytes. Returns the number of bytes read.
    pub fn read_bytes(&mut self, buffer: &mut [u8]) -> FileResult<usize> {
        self.read_array(buffer)
    }

    /// Writes raw bytes. Returns the number of bytes written.
    pub fn write_bytes(&mut self, buffer: &[u8]) -> FileResult<usize> {
        self.write_array(buffer)
    }

    /// Reads a single value. Returns 1 if it was read in full, 0 otherwise.
    pub fn read_object<T: Pod>(&mut self, object: &mut T) -> FileResult<usize> {
        self.read_array(std::slice::from_mut(object))
    }

    /// Writes a single value. Returns 1 if it was written in full, 0 otherwise.
    pub fn write_object<T: Pod>(&mut self, object: &T) -> FileResult<usize> {
        self.write_array(std::slice::from_ref(object))
    }

    /// Writes the UTF-8 bytes of `text`. Returns the number of bytes written.
    pub fn write_string(&mut self, text: &str) -> FileResult<usize> {
        self.write_bytes(text.as_bytes())
    }

    /// Truncates or extends the file to exactly `new_size` bytes.
    ///
    /// The handle must have been opened for writing. How the host fills the
    /// grown region is up to the host; common filesystems zero-fill it.
    /// The position is not changed.
    pub fn resize(&mut self, new_size: u64) -> FileResult<()> {
        let file = self.file.as_mut().ok_or_else(FileError::not_open)?;
        file.set_len(new_size)
            .map_err(|e| FileError::from_io(e, &self.path))
    }
}

impl Default for FileHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FileHandle {
    fn drop(&mut self) {
        if self.file.take().is_some() {
            trace!(target: targets::HANDLE, path = %self.path.display(), "closed on drop");
        }
    }
}

impl std::fmt::Debug for FileHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileHandle")
            .field("path", &self.path)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Measures a stream by seeking to its end and back.
pub(crate) fn stream_len<S: Seek>(stream: &mut S) -> io::Result<u64> {
    let position = stream.stream_position()?;
    let end = stream.seek(SeekFrom::End(0))?;
    if end != position {
        stream.seek(SeekFrom::Start(position))?;
    }
    Ok(end)
}

/// Reads until `buf` is full or the stream ends.
///
/// An error after some bytes arrived is reported as a short read.
fn read_up_to<R: Read>(reader: &mut R, mut buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while !buf.is_empty() {
        match reader.read(buf) {
            Ok(0) => break,
            Ok(n) => {
                total += n;
                buf = &mut std::mem::take(&mut buf)[n..];
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) if total > 0 => {
                debug!(target: targets::HANDLE, error = %e, "short read");
                break;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

/// Writes until `buf` is exhausted or the stream stops accepting data.
///
/// An error after some bytes were written is reported as a short write.
fn write_up_to<W: Write>(writer: &mut W, mut buf: &[u8]) -> io::Result<usize> {
    let mut total = 0;
    while !buf.is_empty() {
        match writer.write(buf) {
            Ok(0) => break,
            Ok(n) => {
                total += n;
                buf = &buf[n..];
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) if total > 0 => {
                debug!(target: targets::HANDLE, error = %e, "short write");
                break;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FileErrorKind;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_new_handle_is_closed() {
        let mut handle = FileHandle::new();
        assert!(!handle.is_open());
        assert_eq!(handle.path(), Path::new(""));
        assert!(handle.tell().unwrap_err().is_not_open());
        assert!(handle.size().unwrap_err().is_not_open());
        assert!(handle.flush().unwrap_err().is_not_open());
        assert!(handle.seek(0, SeekOrigin::Start).unwrap_err().is_not_open());
        assert!(handle.resize(0).unwrap_err().is_not_open());
    }

    #[test]
    fn test_closed_transfer_is_not_zero() {
        let mut handle = FileHandle::default();
        let mut empty: [u32; 0] = [];
        assert!(handle.read_array(&mut empty).unwrap_err().is_not_open());
        assert!(handle.write_array(&empty).unwrap_err().is_not_open());
    }

    #[test]
    fn test_close_twice() {
        let temp_dir = TempDir::new().unwrap();
        let mut handle =
            FileHandle::open(temp_dir.path().join("a.bin"), OpenMode::WRITE).unwrap();
        assert!(handle.close().is_ok());
        assert!(!handle.is_open());
        assert_eq!(handle.close().unwrap_err().kind(), FileErrorKind::NotOpen);
    }

    #[test]
    fn test_open_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.bin");
        let err = FileHandle::open(&path, OpenMode::READ).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.path(), Some(&path));
    }

    #[test]
    fn test_failed_reopen_leaves_handle_closed() {
        let temp_dir = TempDir::new().unwrap();
        let mut handle =
            FileHandle::open(temp_dir.path().join("a.bin"), OpenMode::WRITE).unwrap();
        let result = handle.reopen(
            temp_dir.path().join("missing.bin"),
            OpenMode::READ,
            ShareMode::DenyNone,
        );
        assert!(result.is_err());
        assert!(!handle.is_open());
    }

    #[test]
    fn test_zero_elements_on_open_handle() {
        let temp_dir = TempDir::new().unwrap();
        let mut handle =
            FileHandle::open(temp_dir.path().join("a.bin"), OpenMode::WRITE_READ).unwrap();
        let empty: [u64; 0] = [];
        assert_eq!(handle.write_array(&empty).unwrap(), 0);
    }

    #[test]
    fn test_size_does_not_move_position() {
        let temp_dir = TempDir::new().unwrap();
        let mut handle =
            FileHandle::open(temp_dir.path().join("a.bin"), OpenMode::WRITE_READ).unwrap();
        handle.write_bytes(b"0123456789").unwrap();
        handle.seek(3, SeekOrigin::Start).unwrap();
        assert_eq!(handle.size().unwrap(), 10);
        assert_eq!(handle.tell().unwrap(), 3);
    }

    #[test]
    fn test_seek_negative_start_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut handle =
            FileHandle::open(temp_dir.path().join("a.bin"), OpenMode::WRITE_READ).unwrap();
        let err = handle.seek(-1, SeekOrigin::Start).unwrap_err();
        assert_eq!(err.kind(), FileErrorKind::InvalidPath);
    }

    #[test]
    fn test_seek_origins() {
        let temp_dir = TempDir::new().unwrap();
        let mut handle =
            FileHandle::open(temp_dir.path().join("a.bin"), OpenMode::WRITE_READ).unwrap();
        handle.write_bytes(b"abcdef").unwrap();
        assert_eq!(handle.seek(-2, SeekOrigin::End).unwrap(), 4);
        assert_eq!(handle.seek(-1, SeekOrigin::Current).unwrap(), 3);

        let mut byte = [0u8; 1];
        assert_eq!(handle.read_bytes(&mut byte).unwrap(), 1);
        assert_eq!(&byte, b"d");
    }

    #[test]
    fn test_read_object_short() {
        let temp_dir = TempDir::new().unwrap();
        let mut handle =
            FileHandle::open(temp_dir.path().join("a.bin"), OpenMode::WRITE_READ).unwrap();
        handle.write_bytes(&[1, 2]).unwrap();
        handle.seek(0, SeekOrigin::Start).unwrap();

        let mut value = 0u32;
        assert_eq!(handle.read_object(&mut value).unwrap(), 0);
    }

    #[test]
    fn test_stream_len_restores_position() {
        let mut cursor = Cursor::new(vec![0u8; 32]);
        cursor.set_position(5);
        assert_eq!(stream_len(&mut cursor).unwrap(), 32);
        assert_eq!(cursor.position(), 5);
    }

    #[test]
    fn test_stream_len_at_end() {
        let mut cursor = Cursor::new(vec![0u8; 8]);
        cursor.set_position(8);
        assert_eq!(stream_len(&mut cursor).unwrap(), 8);
        assert_eq!(cursor.position(), 8);
    }

    struct FlakyReader {
        chunks: Vec<io::Result<Vec<u8>>>,
    }

    impl Read for FlakyReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.chunks.is_empty() {
                return Ok(0);
            }
            let chunk = self.chunks.remove(0)?;
            buf[..chunk.len()].copy_from_slice(&chunk);
            Ok(chunk.len())
        }
    }

    #[test]
    fn test_read_up_to_retries_interrupted() {
        let mut reader = FlakyReader {
            chunks: vec![
                Ok(vec![1, 2]),
                Err(io::Error::from(io::ErrorKind::Interrupted)),
                Ok(vec![3]),
            ],
        };
        let mut buf = [0u8; 4];
        assert_eq!(read_up_to(&mut reader, &mut buf).unwrap(), 3);
        assert_eq!(buf, [1, 2, 3, 0]);
    }

    #[test]
    fn test_read_up_to_error_after_data_is_short_read() {
        let mut reader = FlakyReader {
            chunks: vec![Ok(vec![9]), Err(io::Error::other("device gone"))],
        };
        let mut buf = [0u8; 4];
        assert_eq!(read_up_to(&mut reader, &mut buf).unwrap(), 1);
    }

    #[test]
    fn test_read_up_to_error_before_data() {
        let mut reader = FlakyReader {
            chunks: vec![Err(io::Error::other("device gone"))],
        };
        let mut buf = [0u8; 4];
        assert!(read_up_to(&mut reader, &mut buf).is_err());
    }

    #[test]
    fn test_debug_format() {
        let handle = FileHandle::new();
        let debug = format!("{handle:?}");
        assert!(debug.contains("FileHandle"));
        assert!(debug.contains("open: false"));
    }
}
