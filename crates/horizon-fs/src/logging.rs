//! Tracing targets used by this crate.
//!
//! Horizon FS logs through the `tracing` crate and never installs a
//! subscriber itself. To see its output, install one in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_fs=debug")
//!     .init();
//! ```

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Filesystem facade (directory and file operations).
    pub const FILESYSTEM: &str = "horizon_fs::filesystem";
    /// User path registry.
    pub const USER_PATHS: &str = "horizon_fs::user_paths";
    /// File handles.
    pub const HANDLE: &str = "horizon_fs::handle";
}
