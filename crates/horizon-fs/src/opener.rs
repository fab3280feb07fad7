//! Open modes and host-specific file opening.
//!
//! [`OpenMode`] is parsed from the familiar stdio mode strings (`"rb"`,
//! `"w+"`, `"ab"`, ...) and turned into [`std::fs::OpenOptions`]. How the
//! options are finally applied is decided by a [`HostFileOpener`]: the
//! Windows opener forwards [`ShareMode`] to the OS, the portable opener
//! ignores it. [`NativeOpener`] names the one matching the build target.

use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;

use crate::error::{FileError, FileErrorKind};

// ============================================================================
// OpenMode
// ============================================================================

/// How a file is opened.
///
/// # Example
///
/// ```
/// use horizon_fs::OpenMode;
///
/// let mode: OpenMode = "rb+".parse().unwrap();
/// assert!(mode.is_readable());
/// assert!(mode.is_writable());
/// assert_eq!(mode, OpenMode::READ_WRITE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenMode {
    read: bool,
    write: bool,
    append: bool,
    truncate: bool,
    create: bool,
}

impl OpenMode {
    /// `"r"`: read an existing file.
    pub const READ: Self = Self::new(true, false, false, false, false);
    /// `"w"`: create or truncate, write only.
    pub const WRITE: Self = Self::new(false, true, false, true, true);
    /// `"a"`: create if missing, every write goes to the end.
    pub const APPEND: Self = Self::new(false, false, true, false, true);
    /// `"r+"`: read and write an existing file.
    pub const READ_WRITE: Self = Self::new(true, true, false, false, false);
    /// `"w+"`: create or truncate, read and write.
    pub const WRITE_READ: Self = Self::new(true, true, false, true, true);
    /// `"a+"`: create if missing, read anywhere, write at the end.
    pub const APPEND_READ: Self = Self::new(true, false, true, false, true);

    const fn new(read: bool, write: bool, append: bool, truncate: bool, create: bool) -> Self {
        Self {
            read,
            write,
            append,
            truncate,
            create,
        }
    }

    /// Parses a stdio style mode string.
    ///
    /// The first character is `r`, `w` or `a`. It may be followed by `+`
    /// and by `b` or `t` in any order; `b` and `t` make no difference here.
    pub fn parse(mode: &str) -> Result<Self, FileError> {
        let mut chars = mode.chars();
        let base = match chars.next() {
            Some('r') => Self::READ,
            Some('w') => Self::WRITE,
            Some('a') => Self::APPEND,
            _ => return Err(invalid_mode(mode)),
        };

        let mut update = false;
        for c in chars {
            match c {
                '+' if !update => update = true,
                'b' | 't' => {}
                _ => return Err(invalid_mode(mode)),
            }
        }

        Ok(match (base, update) {
            (plain, false) => plain,
            (Self::READ, true) => Self::READ_WRITE,
            (Self::WRITE, true) => Self::WRITE_READ,
            (_, true) => Self::APPEND_READ,
        })
    }

    /// Returns true if the file can be read.
    pub fn is_readable(&self) -> bool {
        self.read
    }

    /// Returns true if the file can be written.
    pub fn is_writable(&self) -> bool {
        self.write || self.append
    }

    /// Converts the mode into host open options.
    pub fn to_open_options(self) -> fs::OpenOptions {
        let mut options = fs::OpenOptions::new();
        options
            .read(self.read)
            .write(self.write)
            .append(self.append)
            .truncate(self.truncate)
            .create(self.create);
        options
    }
}

impl FromStr for OpenMode {
    type Err = FileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn invalid_mode(mode: &str) -> FileError {
    FileError::new(
        FileErrorKind::InvalidPath,
        None,
        Some(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid open mode {mode:?}"),
        )),
    )
}

// ============================================================================
// ShareMode
// ============================================================================

/// Which kinds of access other handles are denied while this one is open.
///
/// Only Windows enforces sharing; elsewhere every mode behaves like
/// [`ShareMode::DenyNone`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShareMode {
    /// Others may read, write and delete.
    #[default]
    DenyNone,
    /// Others may not read.
    DenyRead,
    /// Others may not write.
    DenyWrite,
    /// Others may neither read nor write.
    DenyReadWrite,
}

impl ShareMode {
    /// Returns the `FILE_SHARE_*` flags for this mode.
    pub fn windows_share_flags(self) -> u32 {
        const FILE_SHARE_READ: u32 = 0x1;
        const FILE_SHARE_WRITE: u32 = 0x2;
        const FILE_SHARE_DELETE: u32 = 0x4;

        match self {
            ShareMode::DenyNone => FILE_SHARE_READ | FILE_SHARE_WRITE | FILE_SHARE_DELETE,
            ShareMode::DenyRead => FILE_SHARE_WRITE,
            ShareMode::DenyWrite => FILE_SHARE_READ,
            ShareMode::DenyReadWrite => 0,
        }
    }
}

// ============================================================================
// Openers
// ============================================================================

/// Opens files with the semantics of a particular host.
pub trait HostFileOpener {
    /// Opens `path` with the given mode and sharing.
    fn open(&self, path: &Path, mode: OpenMode, share: ShareMode) -> io::Result<fs::File>;
}

/// Opener for hosts without share modes. `ShareMode` is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortableOpener;

impl HostFileOpener for PortableOpener {
    fn open(&self, path: &Path, mode: OpenMode, _share: ShareMode) -> io::Result<fs::File> {
        mode.to_open_options().open(path)
    }
}

/// Opener that applies `ShareMode` when built for Windows.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsOpener;

impl HostFileOpener for WindowsOpener {
    fn open(&self, path: &Path, mode: OpenMode, share: ShareMode) -> io::Result<fs::File> {
        #[allow(unused_mut)]
        let mut options = mode.to_open_options();
        #[cfg(windows)]
        {
            use std::os::windows::fs::OpenOptionsExt;
            options.share_mode(share.windows_share_flags());
        }
        #[cfg(not(windows))]
        let _ = share;
        options.open(path)
    }
}

/// The opener for the current build target.
#[cfg(windows)]
pub type NativeOpener = WindowsOpener;

/// The opener for the current build target.
#[cfg(not(windows))]
pub type NativeOpener = PortableOpener;
