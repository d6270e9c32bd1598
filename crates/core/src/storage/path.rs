//! Remote path normalization.

use std::fmt;
use std::path::Path;

/// Separator used by every backend namespace.
pub const SEPARATOR: char = '/';

/// Strip leading and trailing separators from a caller-supplied path.
///
/// `"/a/b/"` and `"a/b"` both normalize to `"a/b"`.
#[must_use]
pub fn normalize(path: &str) -> &str {
    path.trim_matches(SEPARATOR)
}

/// Whether `path` stays inside its namespace root.
///
/// Paths with a `.` or `..` segment are rejected rather than resolved.
#[must_use]
pub fn is_contained(path: &str) -> bool {
    normalize(path)
        .split(SEPARATOR)
        .all(|segment| segment != "." && segment != "..")
}

/// Join a directory and an entry name, skipping an empty directory.
#[must_use]
pub fn join(directory: &str, name: &str) -> String {
    let directory = normalize(directory);
    if directory.is_empty() {
        name.to_string()
    } else {
        format!("{directory}{SEPARATOR}{name}")
    }
}

/// Final component of a local file path, used as the remote file name.
#[must_use]
pub fn local_file_name(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

/// A remote file split into its directory and file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemotePath {
    /// Normalized directory, empty at the namespace root.
    pub directory: String,
    /// File name without separators.
    pub name: String,
}

impl RemotePath {
    /// Create a remote path from an already split directory and name.
    #[must_use]
    pub fn new(directory: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            name: name.into(),
        }
    }

    /// Split a caller-supplied file path at its last separator.
    ///
    /// The path is normalized first, so `"/dir/name.txt"` and
    /// `"dir/name.txt"` split identically.
    #[must_use]
    pub fn split(path: &str) -> Self {
        match normalize(path).rsplit_once(SEPARATOR) {
            Some((directory, name)) => Self::new(directory, name),
            None => Self::new("", normalize(path)),
        }
    }

    /// The normalized full path.
    #[must_use]
    pub fn full(&self) -> String {
        join(&self.directory, &self.name)
    }
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/a/b", "a/b")]
    #[case("a/b", "a/b")]
    #[case("a/b/", "a/b")]
    #[case("//a/b", "a/b")]
    #[case("/", "")]
    #[case("", "")]
    fn test_normalize(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(input), expected);
    }

    #[rstest]
    #[case("a/b", true)]
    #[case("", true)]
    #[case("/a/b.c/..d/", true)]
    #[case("..", false)]
    #[case("a/../..", false)]
    #[case("./x", false)]
    #[case("/a/./b", false)]
    fn test_is_contained(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_contained(input), expected);
    }

    #[rstest]
    #[case("/dir/name.txt", "dir", "name.txt")]
    #[case("dir/name.txt", "dir", "name.txt")]
    #[case("/a/b/c/name.txt", "a/b/c", "name.txt")]
    #[case("name.txt", "", "name.txt")]
    #[case("/name.txt", "", "name.txt")]
    fn test_split(#[case] input: &str, #[case] directory: &str, #[case] name: &str) {
        let split = RemotePath::split(input);
        assert_eq!(split.directory, directory);
        assert_eq!(split.name, name);
    }

    #[test]
    fn test_full_path() {
        assert_eq!(RemotePath::new("dir", "a.txt").full(), "dir/a.txt");
        assert_eq!(RemotePath::new("", "a.txt").full(), "a.txt");
        assert_eq!(RemotePath::split("/x/y/z.bin").to_string(), "x/y/z.bin");
    }

    #[test]
    fn test_join() {
        assert_eq!(join("/dir1/dir2/", "file.txt"), "dir1/dir2/file.txt");
        assert_eq!(join("", "file.txt"), "file.txt");
        assert_eq!(join("/", "file.txt"), "file.txt");
    }

    #[test]
    fn test_local_file_name() {
        assert_eq!(
            local_file_name(Path::new("/tmp/uploads/report.pdf")).as_deref(),
            Some("report.pdf")
        );
        assert_eq!(local_file_name(Path::new("/")), None);
    }
}
