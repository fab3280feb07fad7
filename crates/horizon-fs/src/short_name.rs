//! Legacy 8.3 short filename encoding.
//!
//! FAT volumes store a short name as an 8 byte base name followed by a
//! 3 byte extension, both uppercase and padded with spaces. This module maps
//! an arbitrary filename onto that layout.
//!
//! # Example
//!
//! ```
//! use horizon_fs::short_name::split_filename_83;
//!
//! let (name, extension) = split_filename_83("LongFileName.txt");
//! assert_eq!(name.as_bytes(), b"LONGFI~1");
//! assert_eq!(extension.as_bytes(), b"TXT");
//! ```

use std::fmt;

/// Width of a short base name in bytes.
pub const SHORT_NAME_LEN: usize = 8;

/// Width of a short extension in bytes.
pub const SHORT_EXTENSION_LEN: usize = 3;

/// Bytes that never appear in a generated base name.
const FORBIDDEN: &[u8] = b".\"/\\[]:;=, ";

/// Written over the last two base name slots when the name is too long.
const TRUNCATION_MARKER: [u8; 2] = *b"~1";

/// An 8 byte, uppercase, space-padded base name.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShortName([u8; SHORT_NAME_LEN]);

/// A 3 byte, uppercase, space-padded extension.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShortExtension([u8; SHORT_EXTENSION_LEN]);

static_assertions::assert_eq_size!(ShortName, [u8; SHORT_NAME_LEN]);
static_assertions::assert_eq_size!(ShortExtension, [u8; SHORT_EXTENSION_LEN]);
static_assertions::assert_impl_all!(ShortName: Send, Sync, Copy);
static_assertions::assert_impl_all!(ShortExtension: Send, Sync, Copy);

impl ShortName {
    /// Returns the raw padded bytes.
    pub fn as_bytes(&self) -> &[u8; SHORT_NAME_LEN] {
        &self.0
    }

    /// Returns the name without its space padding.
    pub fn trimmed(&self) -> String {
        String::from_utf8_lossy(self.0.trim_ascii_end()).into_owned()
    }
}

impl ShortExtension {
    /// Returns the raw padded bytes.
    pub fn as_bytes(&self) -> &[u8; SHORT_EXTENSION_LEN] {
        &self.0
    }

    /// Returns the extension without its space padding.
    pub fn trimmed(&self) -> String {
        String::from_utf8_lossy(self.0.trim_ascii_end()).into_owned()
    }
}

impl fmt::Display for ShortName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for ShortName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ShortName")
            .field(&String::from_utf8_lossy(&self.0))
            .finish()
    }
}

impl fmt::Display for ShortExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Debug for ShortExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ShortExtension")
            .field(&String::from_utf8_lossy(&self.0))
            .finish()
    }
}

/// Splits a filename into a short base name and a short extension.
///
/// The split point is the last `.`; when that dot ends the filename, the dot
/// before it is used instead. The base name is built from the text before the
/// split point: each byte is uppercased, bytes from `. " / \ [ ] : ; = ,` and
/// space are dropped, and once a ninth byte would be accepted the last two
/// slots become `~1`. The extension takes the first three bytes after the
/// split point, uppercased but *not* filtered.
///
/// Uppercasing is ASCII only. Non-ASCII bytes are copied through unchanged.
pub fn split_filename_83(filename: &str) -> (ShortName, ShortExtension) {
    let bytes = filename.as_bytes();

    let mut point = filename.rfind('.');
    if let Some(index) = point
        && index + 1 == bytes.len()
    {
        point = filename[..index].rfind('.');
    }

    let base = match point {
        Some(index) => &bytes[..index],
        None => bytes,
    };

    let mut name = [b' '; SHORT_NAME_LEN];
    let mut accepted = 0;
    for &byte in base {
        if FORBIDDEN.contains(&byte) {
            continue;
        }
        if accepted == SHORT_NAME_LEN {
            name[SHORT_NAME_LEN - 2..].copy_from_slice(&TRUNCATION_MARKER);
            break;
        }
        name[accepted] = byte.to_ascii_uppercase();
        accepted += 1;
    }

    let mut extension = [b' '; SHORT_EXTENSION_LEN];
    if let Some(index) = point {
        for (slot, &byte) in extension.iter_mut().zip(&bytes[index + 1..]) {
            *slot = byte.to_ascii_uppercase();
        }
    }

    (ShortName(name), ShortExtension(extension))
}
