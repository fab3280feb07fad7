//! Host environment access and platform directory layouts.
//!
//! [`HostEnvironment`] answers the questions a layout needs (environment
//! variables, home, executable and roaming data directories).
//! [`PlatformLayout`] turns those answers into the root and user directories.
//! Both layouts are compiled on every target so they can be exercised with a
//! fake environment; [`NativeLayout`] picks the one for the build target.

use std::io;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use tracing::{info, warn};

use super::config::UserPathsConfig;
use crate::directory::{exists, is_dir};
use crate::error::{FileError, FileErrorKind, FileResult};
use crate::logging::targets;

// ============================================================================
// Host Environment
// ============================================================================

/// Read-only view of the process environment.
pub trait HostEnvironment {
    /// Returns an environment variable, or `None` if unset or not Unicode.
    fn var(&self, name: &str) -> Option<String>;

    /// Returns the user's home directory.
    fn home_dir(&self) -> Option<PathBuf>;

    /// Returns the directory containing the running executable.
    fn executable_dir(&self) -> Option<PathBuf>;

    /// Returns the roaming application data directory (`%APPDATA%`).
    fn roaming_app_data_dir(&self) -> Option<PathBuf>;

    /// Returns the process working directory.
    fn current_dir(&self) -> Option<PathBuf>;

    /// Returns the application bundle that contains the executable.
    ///
    /// Only hosts that package applications as bundles (macOS `.app`) have
    /// one.
    fn bundle_dir(&self) -> Option<PathBuf> {
        None
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl HostEnvironment for SystemEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
    }

    fn executable_dir(&self) -> Option<PathBuf> {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
    }

    fn roaming_app_data_dir(&self) -> Option<PathBuf> {
        // On Windows this is FOLDERID_RoamingAppData.
        BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf())
    }

    fn current_dir(&self) -> Option<PathBuf> {
        std::env::current_dir().ok()
    }

    fn bundle_dir(&self) -> Option<PathBuf> {
        if !cfg!(target_os = "macos") {
            return None;
        }
        // <name>.app/Contents/MacOS/<executable>
        self.executable_dir()?
            .ancestors()
            .nth(2)
            .filter(|bundle| bundle.extension().is_some_and(|ext| ext == "app"))
            .map(Path::to_path_buf)
    }
}

// ============================================================================
// XDG Base Directories
// ============================================================================

/// An XDG base directory.
///
/// [`XdgLayout`] only reads `DataHome`. Config and cache are kept under the
/// user directory like every other derived role, so moving the user
/// directory moves them too. `ConfigHome` and `CacheHome` are for callers
/// that want the host-wide locations, such as a launcher that migrates
/// files out of `~/.config/<app>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XdgDirectory {
    /// `$XDG_DATA_HOME`, default `~/.local/share`.
    DataHome,
    /// `$XDG_CONFIG_HOME`, default `~/.config`.
    ConfigHome,
    /// `$XDG_CACHE_HOME`, default `~/.cache`.
    CacheHome,
}

impl XdgDirectory {
    /// Returns the environment variable that overrides this directory.
    pub fn variable(self) -> &'static str {
        match self {
            XdgDirectory::DataHome => "XDG_DATA_HOME",
            XdgDirectory::ConfigHome => "XDG_CONFIG_HOME",
            XdgDirectory::CacheHome => "XDG_CACHE_HOME",
        }
    }

    /// Returns the location relative to the home directory used when the
    /// variable is not usable.
    pub fn home_relative_default(self) -> &'static Path {
        match self {
            XdgDirectory::DataHome => Path::new(".local/share"),
            XdgDirectory::ConfigHome => Path::new(".config"),
            XdgDirectory::CacheHome => Path::new(".cache"),
        }
    }

    /// Resolves the directory.
    ///
    /// The variable wins when it holds an absolute path. Empty or relative
    /// values are ignored with a warning. Returns `None` only when the
    /// variable is unusable and there is no home directory.
    pub fn resolve(self, env: &dyn HostEnvironment) -> Option<PathBuf> {
        if let Some(value) = env.var(self.variable()) {
            if value.is_empty() {
                warn!(target: targets::USER_PATHS, variable = self.variable(), "ignoring empty variable");
            } else if !Path::new(&value).is_absolute() {
                warn!(
                    target: targets::USER_PATHS,
                    variable = self.variable(),
                    value = %value,
                    "ignoring relative path"
                );
            } else {
                return Some(PathBuf::from(value));
            }
        }
        env.home_dir().map(|home| home.join(self.home_relative_default()))
    }
}

// ============================================================================
// Layouts
// ============================================================================

/// The two anchors every other role is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRoots {
    /// Installation or portable root.
    pub root: PathBuf,
    /// User data root.
    pub user: PathBuf,
}

/// Decides where the root and user directories live on a platform.
pub trait PlatformLayout {
    /// Resolves the root and user directories. Both are absolute on success.
    fn resolve(
        &self,
        config: &UserPathsConfig,
        env: &dyn HostEnvironment,
    ) -> FileResult<LayoutRoots>;
}

/// Layout for Linux, macOS and other Unix hosts.
///
/// The root is the configured root or the working directory. The user
/// directory is `<root>/<portable_dir>` if that exists, otherwise
/// `$XDG_DATA_HOME/<application_dir>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct XdgLayout;

impl PlatformLayout for XdgLayout {
    fn resolve(
        &self,
        config: &UserPathsConfig,
        env: &dyn HostEnvironment,
    ) -> FileResult<LayoutRoots> {
        let root = match config.root_dir() {
            Some(root) => absolutize(root, env),
            None => env
                .current_dir()
                .ok_or_else(|| unresolved("could not determine the working directory"))?,
        };

        let portable = root.join(config.portable_dir());
        if exists(&portable) {
            info!(target: targets::USER_PATHS, path = %portable.display(), "using the portable user directory");
            return Ok(LayoutRoots {
                root,
                user: portable,
            });
        }

        let data_home = XdgDirectory::DataHome
            .resolve(env)
            .ok_or_else(|| unresolved("could not determine the home directory"))?;
        Ok(LayoutRoots {
            root,
            user: data_home.join(config.application_dir()),
        })
    }
}

/// Layout for Windows hosts.
///
/// The root is the configured root or the executable's directory. The user
/// directory is `<root>/<portable_dir>` if that is a directory, otherwise
/// `%APPDATA%/<application_dir>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsLayout;

impl PlatformLayout for WindowsLayout {
    fn resolve(
        &self,
        config: &UserPathsConfig,
        env: &dyn HostEnvironment,
    ) -> FileResult<LayoutRoots> {
        let root = match config.root_dir() {
            Some(root) => absolutize(root, env),
            None => env
                .executable_dir()
                .ok_or_else(|| unresolved("could not determine the executable directory"))?,
        };

        let portable = root.join(config.portable_dir());
        if is_dir(&portable) {
            info!(target: targets::USER_PATHS, path = %portable.display(), "using the local user directory");
            return Ok(LayoutRoots {
                root,
                user: portable,
            });
        }

        let app_data = env
            .roaming_app_data_dir()
            .ok_or_else(|| unresolved("could not determine the roaming application data directory"))?;
        Ok(LayoutRoots {
            root,
            user: app_data.join(config.application_dir()),
        })
    }
}

/// The layout for the current build target.
#[cfg(windows)]
pub type NativeLayout = WindowsLayout;

/// The layout for the current build target.
#[cfg(not(windows))]
pub type NativeLayout = XdgLayout;

/// Makes `path` absolute against the working directory, if one is known.
pub(crate) fn absolutize(path: &Path, env: &dyn HostEnvironment) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match env.current_dir() {
        Some(current) => current.join(path),
        None => path.to_path_buf(),
    }
}

fn unresolved(message: &str) -> FileError {
    FileError::new(
        FileErrorKind::NotFound,
        None,
        Some(io::Error::new(io::ErrorKind::NotFound, message.to_string())),
    )
}
