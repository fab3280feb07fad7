//! Logical directory roles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A purpose-specific directory tracked by [`UserPaths`](super::UserPaths).
///
/// `Root` and `User` anchor the layout. Every other role is derived from the
/// user directory by a suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserPath {
    /// Installation or portable root.
    Root,
    /// User data root; every derived role lives under it.
    User,
    /// Configuration files.
    Config,
    /// Regenerable cached data.
    Cache,
    /// Emulated SD card storage.
    Sdmc,
    /// Emulated NAND storage.
    Nand,
    /// Content loaded alongside titles (mods, patches).
    Load,
    /// Extracted content.
    Dump,
    /// Captured screenshots.
    Screenshots,
    /// Compiled shader cache.
    Shader,
    /// System data files.
    SysData,
    /// Key storage.
    Keys,
    /// Log files.
    Log,
}

impl UserPath {
    /// Every role.
    pub const ALL: [UserPath; 13] = [
        UserPath::Root,
        UserPath::User,
        UserPath::Config,
        UserPath::Cache,
        UserPath::Sdmc,
        UserPath::Nand,
        UserPath::Load,
        UserPath::Dump,
        UserPath::Screenshots,
        UserPath::Shader,
        UserPath::SysData,
        UserPath::Keys,
        UserPath::Log,
    ];

    /// Every role derived from the user directory.
    pub const DERIVED: [UserPath; 11] = [
        UserPath::Config,
        UserPath::Cache,
        UserPath::Sdmc,
        UserPath::Nand,
        UserPath::Load,
        UserPath::Dump,
        UserPath::Screenshots,
        UserPath::Shader,
        UserPath::SysData,
        UserPath::Keys,
        UserPath::Log,
    ];

    /// Returns true for roles that live under the user directory.
    pub fn is_derived(self) -> bool {
        !matches!(self, UserPath::Root | UserPath::User)
    }

    /// Returns the built-in subdirectory name for a derived role.
    pub fn default_suffix(self) -> Option<&'static str> {
        match self {
            UserPath::Root | UserPath::User => None,
            role => Some(role.name()),
        }
    }

    /// Returns the lowercase name used in configuration files.
    pub fn name(self) -> &'static str {
        match self {
            UserPath::Root => "root",
            UserPath::User => "user",
            UserPath::Config => "config",
            UserPath::Cache => "cache",
            UserPath::Sdmc => "sdmc",
            UserPath::Nand => "nand",
            UserPath::Load => "load",
            UserPath::Dump => "dump",
            UserPath::Screenshots => "screenshots",
            UserPath::Shader => "shader",
            UserPath::SysData => "sysdata",
            UserPath::Keys => "keys",
            UserPath::Log => "log",
        }
    }
}

impl fmt::Display for UserPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
