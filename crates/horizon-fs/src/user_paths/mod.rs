//! Logical directory roles resolved to absolute paths.
//!
//! A [`UserPaths`] context maps each [`UserPath`] role to a directory. The
//! table is built on the first query: the platform layout picks the root and
//! user directories, and every other role is the user directory joined with
//! the role's suffix from [`UserPathsConfig`].
//!
//! Overrides must name an existing directory. Overriding `Root` or `User`
//! re-derives every other role from the new user directory; overriding any
//! other role replaces just that entry.
//!
//! # Example
//!
//! ```ignore
//! use horizon_fs::{UserPath, UserPaths, UserPathsConfig};
//!
//! let paths = UserPaths::with_config(UserPathsConfig::load("paths.toml")?)?;
//! let config_dir = paths.get(UserPath::Config);
//!
//! // Point everything at a portable install.
//! paths.set(UserPath::User, "/media/usb/app")?;
//! assert_eq!(paths.get(UserPath::Config), Path::new("/media/usb/app/config"));
//! ```

mod config;
mod platform;
mod role;

pub use config::{ConfigError, DEFAULT_APPLICATION_DIR, DEFAULT_PORTABLE_DIR, UserPathsConfig};
pub use platform::{
    HostEnvironment, LayoutRoots, NativeLayout, PlatformLayout, SystemEnvironment, WindowsLayout,
    XdgDirectory, XdgLayout,
};
pub use role::UserPath;

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use parking_lot::RwLock;
use tracing::{debug, error, info};

use crate::directory::{create_dirs, exists, is_dir};
use crate::error::{FileError, FileResult};
use crate::logging::targets;
use platform::absolutize;

type PathTable = HashMap<UserPath, PathBuf>;

/// Name of the read-only system data directory shipped with the application.
pub const SYS_DATA_DIR: &str = "sysdata";

/// Directory under the home directory where external tools keep their keys
/// and configuration.
pub const TOOL_CONFIG_DIR: &str = ".switch";

/// Lazily built table of role directories.
///
/// Cheap to construct; nothing touches the filesystem until the first
/// [`get`](Self::get), [`set`](Self::set) or [`snapshot`](Self::snapshot).
/// Safe to share between threads, and concurrent first queries build the
/// table exactly once.
pub struct UserPaths {
    config: UserPathsConfig,
    layout: Box<dyn PlatformLayout + Send + Sync>,
    environment: Box<dyn HostEnvironment + Send + Sync>,
    table: OnceLock<RwLock<PathTable>>,
}

static_assertions::assert_impl_all!(UserPaths: Send, Sync);

impl UserPaths {
    /// Creates a context with the built-in configuration for this platform.
    pub fn new() -> Self {
        Self::from_parts(UserPathsConfig::default(), NativeLayout::default(), SystemEnvironment)
    }

    /// Creates a context for this platform with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn with_config(config: UserPathsConfig) -> Result<Self, ConfigError> {
        Self::with_host(config, NativeLayout::default(), SystemEnvironment)
    }

    /// Creates a context with an explicit layout and environment.
    pub fn with_host(
        config: UserPathsConfig,
        layout: impl PlatformLayout + Send + Sync + 'static,
        environment: impl HostEnvironment + Send + Sync + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(config, layout, environment))
    }

    fn from_parts(
        config: UserPathsConfig,
        layout: impl PlatformLayout + Send + Sync + 'static,
        environment: impl HostEnvironment + Send + Sync + 'static,
    ) -> Self {
        Self {
            config,
            layout: Box::new(layout),
            environment: Box::new(environment),
            table: OnceLock::new(),
        }
    }

    /// Returns the configuration this context was built with.
    pub fn config(&self) -> &UserPathsConfig {
        &self.config
    }

    /// Returns true once the table has been built.
    pub fn is_initialized(&self) -> bool {
        self.table.get().is_some()
    }

    /// Returns the directory for `role`.
    pub fn get(&self, role: UserPath) -> PathBuf {
        let table = self.table().read();
        // The table holds every role from the moment it is built.
        table[&role].clone()
    }

    /// Points `role` at an existing directory.
    ///
    /// Relative paths are resolved against the working directory. Overriding
    /// `Root` moves both the root and the user directory; overriding `User`
    /// moves the user directory. Either way every derived role is recomputed,
    /// which discards earlier overrides of derived roles.
    ///
    /// # Errors
    ///
    /// Returns an error, and keeps the previous value, if `new_path` is not an
    /// existing directory.
    pub fn set(&self, role: UserPath, new_path: impl AsRef<Path>) -> FileResult<()> {
        let new_path = absolutize(new_path.as_ref(), self.environment.as_ref());
        if !is_dir(&new_path) {
            error!(
                target: targets::USER_PATHS,
                %role,
                path = %new_path.display(),
                "invalid path specified"
            );
            return Err(if exists(&new_path) {
                FileError::not_directory(new_path)
            } else {
                FileError::not_found(new_path)
            });
        }

        let mut table = self.table().write();
        match role {
            UserPath::Root => {
                table.insert(UserPath::Root, new_path.clone());
                table.insert(UserPath::User, new_path.clone());
                self.derive_roles(&mut table, &new_path);
            }
            UserPath::User => {
                table.insert(UserPath::User, new_path.clone());
                self.derive_roles(&mut table, &new_path);
            }
            leaf => {
                table.insert(leaf, new_path.clone());
            }
        }
        info!(target: targets::USER_PATHS, %role, path = %new_path.display(), "path overridden");
        Ok(())
    }

    /// Returns the registered-content directory inside the NAND.
    pub fn nand_registration_dir(&self, system: bool) -> PathBuf {
        let partition = if system { "system" } else { "user" };
        self.get(UserPath::Nand)
            .join(partition)
            .join("Contents")
            .join("registered")
    }

    /// Returns the directory containing the running executable.
    pub fn executable_dir(&self) -> Option<PathBuf> {
        self.environment.executable_dir()
    }

    /// Returns the read-only system data directory shipped with the
    /// application.
    ///
    /// Inside an application bundle this is `<bundle>/sysdata`, elsewhere
    /// `sysdata` under the working directory. It is unrelated to the per-user
    /// [`UserPath::SysData`] role.
    pub fn sys_directory(&self) -> PathBuf {
        let env = self.environment.as_ref();
        let dir = match env.bundle_dir() {
            Some(bundle) => bundle.join(SYS_DATA_DIR),
            None => absolutize(Path::new(SYS_DATA_DIR), env),
        };
        debug!(target: targets::USER_PATHS, path = %dir.display(), "system data directory");
        dir
    }

    /// Returns `~/.switch`, where external tools look for keys.
    ///
    /// `None` when the home directory is unknown.
    pub fn tool_config_dir(&self) -> Option<PathBuf> {
        self.environment
            .home_dir()
            .map(|home| home.join(TOOL_CONFIG_DIR))
    }

    /// Returns a copy of the whole table.
    pub fn snapshot(&self) -> BTreeMap<UserPath, PathBuf> {
        let table = self.table().read();
        table
            .iter()
            .map(|(&role, path)| (role, path.clone()))
            .collect()
    }

    /// Creates every role directory that does not exist yet.
    ///
    /// Stops at the first directory that cannot be created.
    pub fn ensure_all(&self) -> FileResult<()> {
        for path in self.snapshot().into_values() {
            create_dirs(&path)?;
        }
        Ok(())
    }

    fn table(&self) -> &RwLock<PathTable> {
        self.table.get_or_init(|| RwLock::new(self.build_table()))
    }

    fn build_table(&self) -> PathTable {
        let roots = match self
            .layout
            .resolve(&self.config, self.environment.as_ref())
        {
            Ok(roots) => roots,
            Err(e) => {
                let root = self
                    .environment
                    .current_dir()
                    .unwrap_or_else(|| PathBuf::from("."));
                let user = root.join(self.config.portable_dir());
                error!(
                    target: targets::USER_PATHS,
                    error = %e,
                    fallback = %user.display(),
                    "unable to resolve the user directory"
                );
                LayoutRoots { root, user }
            }
        };
        debug!(
            target: targets::USER_PATHS,
            root = %roots.root.display(),
            user = %roots.user.display(),
            "resolved user paths"
        );

        let mut table = PathTable::with_capacity(UserPath::ALL.len());
        table.insert(UserPath::Root, roots.root);
        table.insert(UserPath::User, roots.user.clone());
        self.derive_roles(&mut table, &roots.user);
        table
    }

    fn derive_roles(&self, table: &mut PathTable, user: &Path) {
        for role in UserPath::DERIVED {
            if let Some(suffix) = self.config.suffix(role) {
                table.insert(role, user.join(suffix));
            }
        }
    }
}

impl Default for UserPaths {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for UserPaths {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserPaths")
            .field("config", &self.config)
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}
