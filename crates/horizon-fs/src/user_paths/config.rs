//! Layout configuration for [`UserPaths`](super::UserPaths).
//!
//! The configuration names the application directory, the portable
//! directory that overrides the platform layout when present, and the
//! subdirectory each derived role uses. It can be built in code or read from
//! TOML:
//!
//! ```toml
//! application_dir = "myapp"
//! portable_dir = "portable"
//! root_dir = "/opt/myapp"
//!
//! [suffixes]
//! log = "logs"
//! sysdata = "system"
//! ```
//!
//! Roles missing from `[suffixes]` keep their built-in names.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::role::UserPath;
use crate::error::FileError;
use crate::operations::read_file_to_string;

/// Application directory used when none is configured.
pub const DEFAULT_APPLICATION_DIR: &str = "horizon";

/// Portable directory name used when none is configured.
pub const DEFAULT_PORTABLE_DIR: &str = "user";

/// Errors produced while loading or validating a [`UserPathsConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read user path config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: FileError,
    },

    /// The configuration is not valid TOML or has the wrong shape.
    #[error("Invalid user path config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A suffix was given for a role that is not derived from the user directory.
    #[error("Role '{0}' is not derived from the user directory and takes no suffix")]
    NotDerived(UserPath),

    /// A name that must be a single directory component is not.
    #[error("{field} must be a single directory name, got {value:?}")]
    InvalidComponent { field: String, value: String },
}

/// Describes how role paths are laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPathsConfig {
    application_dir: String,
    portable_dir: String,
    root_dir: Option<PathBuf>,
    suffixes: BTreeMap<UserPath, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    application_dir: Option<String>,
    portable_dir: Option<String>,
    root_dir: Option<PathBuf>,
    suffixes: BTreeMap<UserPath, String>,
}

impl Default for UserPathsConfig {
    fn default() -> Self {
        Self {
            application_dir: DEFAULT_APPLICATION_DIR.to_string(),
            portable_dir: DEFAULT_PORTABLE_DIR.to_string(),
            root_dir: None,
            suffixes: BTreeMap::new(),
        }
    }
}

impl UserPathsConfig {
    /// Creates the built-in configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(source)?;

        let mut config = Self::default();
        if let Some(application_dir) = raw.application_dir {
            config.application_dir = application_dir;
        }
        if let Some(portable_dir) = raw.portable_dir {
            config.portable_dir = portable_dir;
        }
        config.root_dir = raw.root_dir;
        config.suffixes = raw.suffixes;

        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = read_file_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Sets the directory name used under the platform data directory.
    pub fn with_application_dir(mut self, name: impl Into<String>) -> Self {
        self.application_dir = name.into();
        self
    }

    /// Sets the name of the portable directory looked for under the root.
    pub fn with_portable_dir(mut self, name: impl Into<String>) -> Self {
        self.portable_dir = name.into();
        self
    }

    /// Sets the root searched for the portable directory.
    pub fn with_root_dir(mut self, root: impl Into<PathBuf>) -> Self {
        self.root_dir = Some(root.into());
        self
    }

    /// Overrides the subdirectory used for a derived role.
    pub fn with_suffix(mut self, role: UserPath, suffix: impl Into<String>) -> Self {
        self.suffixes.insert(role, suffix.into());
        self
    }

    /// Returns the application directory name.
    pub fn application_dir(&self) -> &str {
        &self.application_dir
    }

    /// Returns the portable directory name.
    pub fn portable_dir(&self) -> &str {
        &self.portable_dir
    }

    /// Returns the configured root, if any.
    pub fn root_dir(&self) -> Option<&Path> {
        self.root_dir.as_deref()
    }

    /// Returns the subdirectory for `role`, or `None` for `Root` and `User`.
    pub fn suffix(&self, role: UserPath) -> Option<&str> {
        if !role.is_derived() {
            return None;
        }
        self.suffixes
            .get(&role)
            .map(String::as_str)
            .or_else(|| role.default_suffix())
    }

    /// Checks that every configured name is a single directory component
    /// and that only derived roles carry suffixes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_component("application_dir", &self.application_dir)?;
        check_component("portable_dir", &self.portable_dir)?;
        for (&role, suffix) in &self.suffixes {
            if !role.is_derived() {
                return Err(ConfigError::NotDerived(role));
            }
            check_component(&format!("suffix for {role}"), suffix)?;
        }
        Ok(())
    }
}

fn check_component(field: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = value.is_empty()
        || value == "."
        || value == ".."
        || value.contains(['/', '\\']);
    if invalid {
        return Err(ConfigError::InvalidComponent {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
    Ok(())
}
