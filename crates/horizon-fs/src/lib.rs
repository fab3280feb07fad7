//! Horizon FS - portable file locations and file access.
//!
//! This crate answers two questions for an application: where its files live,
//! and how to read and write them, the same way on every host.
//!
//! # Directory Roles
//!
//! ```ignore
//! use horizon_fs::{UserPath, UserPaths};
//!
//! let paths = UserPaths::new();
//! let logs = paths.get(UserPath::Log);      // e.g. ~/.local/share/horizon/log
//! let keys = paths.get(UserPath::Keys);
//! paths.ensure_all()?;
//! ```
//!
//! # File Handles
//!
//! ```ignore
//! use horizon_fs::{FileHandle, OpenMode, SeekOrigin};
//!
//! let mut file = FileHandle::open("records.bin", "wb+".parse()?)?;
//! file.write_array(&[1u16, 2, 3])?;
//! assert_eq!(file.size()?, 6);
//!
//! file.seek(0, SeekOrigin::Start)?;
//! let mut records = [0u16; 3];
//! file.read_array(&mut records)?;
//! ```
//!
//! # Path Text
//!
//! ```ignore
//! use horizon_fs::path::{get_filename, sanitize_path, DirectorySeparator};
//! use horizon_fs::short_name::split_filename_83;
//!
//! let clean = sanitize_path("saves\\\\slot1//", DirectorySeparator::ForwardSlash);
//! assert_eq!(clean, "saves/slot1");
//! assert_eq!(get_filename("saves/slot1/game.sav"), "game.sav");
//!
//! let (name, ext) = split_filename_83("LongFileName.txt");
//! ```
//!
//! # Filesystem Operations
//!
//! ```ignore
//! use horizon_fs::{copy_file, create_full_path, for_each_entry, remove_file};
//!
//! create_full_path("cache/shaders/opengl.bin")?; // creates cache/shaders
//! copy_file("a.sav", "backup/a.sav", true)?;
//! remove_file("stale.lock")?;                    // fine if already gone
//! ```

mod error;
mod handle;
mod opener;

pub mod directory;
pub mod logging;
pub mod operations;
pub mod path;
pub mod short_name;
pub mod user_paths;

pub use directory::{
    copy_dir, create_dir, create_dirs, create_full_path, current_dir, exists, for_each_entry,
    is_dir, remove_dir_all, set_current_dir,
};
pub use error::{FileError, FileErrorKind, FileResult};
pub use handle::{FileHandle, SeekOrigin};
pub use opener::{HostFileOpener, NativeOpener, OpenMode, PortableOpener, ShareMode, WindowsOpener};
pub use operations::{
    copy_file, create_empty_file, file_size, read_file_to_string, remove_file, rename,
    write_string_to_file,
};
pub use path::DirectorySeparator;
pub use short_name::{ShortExtension, ShortName, split_filename_83};
pub use user_paths::{ConfigError, UserPath, UserPaths, UserPathsConfig};
