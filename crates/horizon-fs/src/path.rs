//! Path string normalization and decomposition.
//!
//! These helpers operate on path *text* rather than `std::path::Path`, so
//! they behave identically on every host: both `/` and `\` are treated as
//! separators no matter which platform the code runs on. That matters for
//! paths that come from foreign sources (archives, guest filesystems,
//! configuration written on another OS).
//!
//! # Examples
//!
//! ```
//! use horizon_fs::path::{get_filename, get_parent_path, sanitize_path, DirectorySeparator};
//!
//! assert_eq!(get_parent_path("/a/b/c"), "/a/b");
//! assert_eq!(get_filename("/a/b/c.txt"), "c.txt");
//! assert_eq!(sanitize_path("a\\\\b//c/", DirectorySeparator::ForwardSlash), "a/b/c");
//! ```

/// The separator used by the host platform.
pub const NATIVE_SEPARATOR: char = if cfg!(windows) { '\\' } else { '/' };

/// Which separator [`sanitize_path`] should normalize to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DirectorySeparator {
    /// Normalize to `/`.
    ForwardSlash,
    /// Normalize to `\`.
    BackwardSlash,
    /// Normalize to the host separator (`\` on Windows, `/` elsewhere).
    #[default]
    PlatformDefault,
}

impl DirectorySeparator {
    /// Returns the separator character this setting normalizes to.
    pub fn as_char(self) -> char {
        match self {
            DirectorySeparator::ForwardSlash => '/',
            DirectorySeparator::BackwardSlash => '\\',
            DirectorySeparator::PlatformDefault => NATIVE_SEPARATOR,
        }
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Normalizes the separators of a path.
///
/// Every `/` and `\` becomes the separator selected by `separator`, runs of
/// that separator collapse into one, and a single trailing separator is
/// removed. When the target is the native Windows backslash, a leading `\\`
/// (network share prefix such as `\\server\share`) is kept intact.
///
/// The result is stable: sanitizing an already sanitized path returns it
/// unchanged.
///
/// # Examples
///
/// ```
/// use horizon_fs::path::{sanitize_path, DirectorySeparator};
///
/// assert_eq!(sanitize_path("C:\\games//roms\\", DirectorySeparator::ForwardSlash), "C:/games/roms");
/// assert_eq!(sanitize_path("a/b", DirectorySeparator::BackwardSlash), "a\\b");
/// ```
pub fn sanitize_path(path: &str, separator: DirectorySeparator) -> String {
    let target = separator.as_char();
    let keep_network_prefix = cfg!(windows) && target == '\\';
    sanitize_with(path, target, keep_network_prefix)
}

fn sanitize_with(path: &str, target: char, keep_network_prefix: bool) -> String {
    let mut out = String::with_capacity(path.len());
    let mut chars = path
        .chars()
        .map(|c| if is_separator(c) { target } else { c });

    // The first character sits outside the collapsing window, so a leading
    // doubled separator survives as exactly one pair.
    if keep_network_prefix
        && let Some(first) = chars.next()
    {
        out.push(first);
    }

    let mut previous = None;
    for c in chars {
        if c == target && previous == Some(target) {
            continue;
        }
        out.push(c);
        previous = Some(c);
    }

    let mut protected = 0;
    if keep_network_prefix && out.starts_with(target) && out[target.len_utf8()..].starts_with(target)
    {
        protected = 2 * target.len_utf8();
    }
    if out.len() > protected && out.ends_with(target) {
        out.pop();
    }
    out
}

/// Returns everything before the right-most separator.
///
/// Both `/` and `\` count as separators; whichever occurs later wins. A path
/// without any separator has an empty parent.
///
/// # Examples
///
/// ```
/// use horizon_fs::path::get_parent_path;
///
/// assert_eq!(get_parent_path("/a/b/c"), "/a/b");
/// assert_eq!(get_parent_path("a/b\\c"), "a/b");
/// assert_eq!(get_parent_path("file.txt"), "");
/// ```
pub fn get_parent_path(path: &str) -> &str {
    match path.rfind(is_separator) {
        Some(index) => &path[..index],
        None => "",
    }
}

/// Returns everything after the right-most separator.
///
/// A path without any separator yields an empty filename.
pub fn get_filename(path: &str) -> &str {
    match path.rfind(is_separator) {
        Some(index) => &path[index + 1..],
        None => "",
    }
}

/// Returns everything after the last `.` of a filename, or an empty string.
///
/// # Examples
///
/// ```
/// use horizon_fs::path::get_extension_from_filename;
///
/// assert_eq!(get_extension_from_filename("c.txt"), "txt");
/// assert_eq!(get_extension_from_filename("archive.tar.gz"), "gz");
/// assert_eq!(get_extension_from_filename("noext"), "");
/// ```
pub fn get_extension_from_filename(name: &str) -> &str {
    match name.rfind('.') {
        Some(index) => &name[index + 1..],
        None => "",
    }
}

/// Drops the first component of a path.
///
/// Leading separators are skipped, then the first component and the
/// separator that ends it are removed. A single-component path is returned
/// as is (without its leading separators).
///
/// # Examples
///
/// ```
/// use horizon_fs::path::get_path_without_top;
///
/// assert_eq!(get_path_without_top("//top/rest/of/path"), "rest/of/path");
/// assert_eq!(get_path_without_top("top\\rest"), "rest");
/// ```
pub fn get_path_without_top(path: &str) -> &str {
    let trimmed = path.trim_start_matches(is_separator);
    match trimmed.find(is_separator) {
        Some(index) => &trimmed[index + 1..],
        None => trimmed,
    }
}

/// Splits a path into its components.
///
/// Backslashes are treated as forward slashes. Empty components are kept, so
/// a leading or trailing separator produces an empty first or last entry.
/// An empty path has no components.
///
/// # Examples
///
/// ```
/// use horizon_fs::path::split_path_components;
///
/// assert_eq!(split_path_components("a\\b/c"), vec!["a", "b", "c"]);
/// assert_eq!(split_path_components("/a/"), vec!["", "a", ""]);
/// ```
pub fn split_path_components(path: &str) -> Vec<String> {
    if path.is_empty() {
        return Vec::new();
    }
    path.replace('\\', "/")
        .split('/')
        .map(str::to_string)
        .collect()
}

/// Removes exactly one trailing separator, if present.
pub fn remove_trailing_slash(path: &str) -> &str {
    path.strip_suffix(is_separator).unwrap_or(path)
}

/// Picks the directory that `create_full_path` creates for a sanitized path.
///
/// Paths without a `.` are taken to be directories. Anything with a `.` is a
/// file, and only the text before the last `/` is created. A file name with
/// no directory part therefore maps to the empty string.
pub(crate) fn full_path_directory(sanitized: &str) -> &str {
    if !sanitized.contains('.') {
        return sanitized;
    }
    match sanitized.rfind('/') {
        Some(index) => &sanitized[..index],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_forward_slash() {
        assert_eq!(
            sanitize_path("a\\b\\\\c//d/", DirectorySeparator::ForwardSlash),
            "a/b/c/d"
        );
        assert_eq!(sanitize_path("/", DirectorySeparator::ForwardSlash), "");
        assert_eq!(sanitize_path("", DirectorySeparator::ForwardSlash), "");
    }

    #[test]
    fn test_sanitize_backward_slash() {
        assert_eq!(sanitize_with("a/b//c\\", '\\', false), "a\\b\\c");
    }

    #[test]
    fn test_sanitize_only_strips_one_trailing_separator() {
        // The collapse leaves a single separator, which is then removed.
        assert_eq!(sanitize_with("dir///", '/', false), "dir");
    }

    #[test]
    fn test_sanitize_keeps_network_prefix() {
        assert_eq!(
            sanitize_with("\\\\server\\\\share\\", '\\', true),
            "\\\\server\\share"
        );
        assert_eq!(
            sanitize_with("////server/share", '\\', true),
            "\\\\server\\share"
        );
        assert_eq!(sanitize_with("\\a\\\\b", '\\', true), "\\a\\b");
    }

    #[test]
    fn test_sanitize_network_prefix_only() {
        assert_eq!(sanitize_with("\\\\", '\\', true), "\\\\");
        assert_eq!(sanitize_with("\\\\\\\\", '\\', true), "\\\\");
    }

    #[test]
    fn test_sanitize_without_network_prefix_collapses_leading_pair() {
        assert_eq!(sanitize_with("\\\\server\\share", '/', false), "/server/share");
    }

    #[test]
    fn test_sanitize_idempotent() {
        let samples = [
            "",
            "/",
            "\\\\",
            "\\\\\\",
            "a",
            "a/",
            "//a//b\\\\c//",
            "\\\\server\\share\\dir\\",
            "C:\\Users\\\\me\\",
            "./relative/../path/",
            "no_separators.txt",
        ];
        for sample in samples {
            for (target, keep) in [('/', false), ('\\', false), ('\\', true)] {
                let once = sanitize_with(sample, target, keep);
                let twice = sanitize_with(&once, target, keep);
                assert_eq!(once, twice, "sanitize not idempotent for {sample:?}");
            }
            for separator in [
                DirectorySeparator::ForwardSlash,
                DirectorySeparator::BackwardSlash,
                DirectorySeparator::PlatformDefault,
            ] {
                let once = sanitize_path(sample, separator);
                assert_eq!(sanitize_path(&once, separator), once);
            }
        }
    }

    #[test]
    fn test_sanitize_leaves_no_separator_runs() {
        let sanitized = sanitize_with("a//\\\\b\\/c", '/', false);
        assert!(!sanitized.contains("//"));
        assert!(!sanitized.contains('\\'));
    }

    #[test]
    fn test_platform_default_separator() {
        let expected = if cfg!(windows) { "a\\b" } else { "a/b" };
        assert_eq!(sanitize_path("a\\b", DirectorySeparator::PlatformDefault), expected);
        assert_eq!(DirectorySeparator::default(), DirectorySeparator::PlatformDefault);
    }

    #[test]
    fn test_get_parent_path() {
        assert_eq!(get_parent_path("/a/b/c"), "/a/b");
        assert_eq!(get_parent_path("a\\b/c"), "a\\b");
        assert_eq!(get_parent_path("a/b\\c"), "a/b");
        assert_eq!(get_parent_path("/top"), "");
        assert_eq!(get_parent_path("file.txt"), "");
        assert_eq!(get_parent_path(""), "");
    }

    #[test]
    fn test_get_filename() {
        assert_eq!(get_filename("/a/b/c.txt"), "c.txt");
        assert_eq!(get_filename("a\\b\\c.bin"), "c.bin");
        assert_eq!(get_filename("/a/b/"), "");
        assert_eq!(get_filename("c.txt"), "");
    }

    #[test]
    fn test_get_extension_from_filename() {
        assert_eq!(get_extension_from_filename("c.txt"), "txt");
        assert_eq!(get_extension_from_filename("archive.tar.gz"), "gz");
        assert_eq!(get_extension_from_filename("noext"), "");
        assert_eq!(get_extension_from_filename("trailing."), "");
        assert_eq!(get_extension_from_filename(".hidden"), "hidden");
    }

    #[test]
    fn test_get_path_without_top() {
        assert_eq!(get_path_without_top("top/rest/of/path"), "rest/of/path");
        assert_eq!(get_path_without_top("///top/rest"), "rest");
        assert_eq!(get_path_without_top("\\top\\rest"), "rest");
        assert_eq!(get_path_without_top("top/"), "");
        assert_eq!(get_path_without_top("single"), "single");
        assert_eq!(get_path_without_top("///"), "");
        assert_eq!(get_path_without_top(""), "");
    }

    #[test]
    fn test_split_path_components() {
        assert_eq!(split_path_components("a\\b/c"), vec!["a", "b", "c"]);
        assert_eq!(split_path_components("/a/b/"), vec!["", "a", "b", ""]);
        assert_eq!(split_path_components("a//b"), vec!["a", "", "b"]);
        assert_eq!(split_path_components("single"), vec!["single"]);
        assert!(split_path_components("").is_empty());
    }

    #[test]
    fn test_remove_trailing_slash() {
        assert_eq!(remove_trailing_slash("a/b/"), "a/b");
        assert_eq!(remove_trailing_slash("a\\b\\"), "a\\b");
        assert_eq!(remove_trailing_slash("a/b//"), "a/b/");
        assert_eq!(remove_trailing_slash("a/b"), "a/b");
        assert_eq!(remove_trailing_slash(""), "");
    }

    #[test]
    fn test_full_path_directory() {
        assert_eq!(full_path_directory("a/b/c"), "a/b/c");
        assert_eq!(full_path_directory("a/b/file.txt"), "a/b");
        assert_eq!(full_path_directory("a.d/b/c"), "a.d/b");
        assert_eq!(full_path_directory("file.txt"), "");
    }
}
