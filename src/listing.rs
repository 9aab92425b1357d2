//! File system enumeration that never follows symbolic links.
//!
//! Symbolic links are listed like any other entry but never descended into, so a link pointing
//! at one of its parent directories cannot make a traversal loop forever.

use log::{error, warn};
use regex::Regex;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

/// A pattern matching every path.
pub const MATCH_ALL: &str = ".*";

/// Regular expression that has to match a path's entire string form.
#[derive(Debug, Clone)]
pub struct PathFilter {
    regex: Regex,
}

impl PathFilter {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self { regex: Regex::new(&format!("^(?:{pattern})$"))? })
    }

    pub fn match_all() -> Self {
        Self::new(MATCH_ALL).expect("MATCH_ALL is a valid regex")
    }

    pub fn matches(&self, path: &Path) -> bool {
        self.regex.is_match(&path.to_string_lossy())
    }
}

impl Default for PathFilter {
    fn default() -> Self {
        Self::match_all()
    }
}

/// Cooperative stop signal for long traversals. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct Cancellation(Arc<AtomicBool>);

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Lists the entries under `start` whose path matches `filter`, files and directories alike.
///
/// Returns nothing if `start` is not a directory. Directories that can't be opened are logged
/// and skipped.
pub fn list_files(start: &Path, recursive: bool, filter: &PathFilter) -> Vec<PathBuf> {
    list_files_until(start, recursive, filter, &Cancellation::new())
}

/// Like [`list_files`], but stops entering new directories once `cancellation` is signaled.
/// Whatever was collected up to that point is still returned.
pub fn list_files_until(
    start: &Path,
    recursive: bool,
    filter: &PathFilter,
    cancellation: &Cancellation,
) -> Vec<PathBuf> {
    list_files_notifying(start, recursive, filter, cancellation, |_| {})
}

/// Like [`list_files_until`], calling `on_match` with each matching path as soon as it's found.
pub fn list_files_notifying(
    start: &Path,
    recursive: bool,
    filter: &PathFilter,
    cancellation: &Cancellation,
    mut on_match: impl FnMut(&Path),
) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if start.is_dir() {
        collect(&mut paths, start, recursive, filter, cancellation, &mut on_match);
    }
    paths
}

fn collect(
    paths: &mut Vec<PathBuf>,
    dir: &Path,
    recursive: bool,
    filter: &PathFilter,
    cancellation: &Cancellation,
    on_match: &mut dyn FnMut(&Path),
) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            error!("Could not open directory {}: {e}", dir.display());
            return;
        },
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Could not read an entry of {}: {e}", dir.display());
                continue;
            },
        };
        let path = entry.path();
        if filter.matches(&path) {
            on_match(&path);
            paths.push(path.clone());
        }

        if !recursive || cancellation.is_cancelled() {
            continue;
        }
        // `DirEntry::file_type` doesn't traverse symlinks, so a link to a directory reports
        // itself as a link here.
        match entry.file_type() {
            Ok(file_type) if file_type.is_dir() => {
                collect(paths, &path, recursive, filter, cancellation, on_match)
            },
            Ok(_) => {},
            Err(e) => warn!("Could not determine the type of {}: {e}", path.display()),
        }
    }
}

/// Expands every directory among `paths` into the files it contains, recursively, and returns
/// only paths that aren't directories.
pub fn flatten<I, P>(paths: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let match_all = PathFilter::match_all();
    let mut all_paths = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if path.is_dir() {
            all_paths.extend(list_files(path, true, &match_all));
        } else {
            all_paths.push(path.to_path_buf());
        }
    }
    all_paths.retain(|path| !path.is_dir());
    all_paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, b"x").unwrap();
    }

    /// root/
    ///   a.png
    ///   notes.txt
    ///   sub/
    ///     b.png
    ///     deeper/
    ///       c.jpg
    fn sample_tree() -> TempDir {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("sub/deeper")).unwrap();
        touch(&root.path().join("a.png"));
        touch(&root.path().join("notes.txt"));
        touch(&root.path().join("sub/b.png"));
        touch(&root.path().join("sub/deeper/c.jpg"));
        root
    }

    fn set(paths: Vec<PathBuf>) -> BTreeSet<PathBuf> {
        paths.into_iter().collect()
    }

    #[test]
    fn non_directory_start_is_empty() {
        let root = sample_tree();
        let filter = PathFilter::match_all();
        assert!(list_files(&root.path().join("a.png"), true, &filter).is_empty());
        assert!(list_files(&root.path().join("missing"), true, &filter).is_empty());
    }

    #[test]
    fn flat_listing_includes_directories() {
        let root = sample_tree();
        let listed = set(list_files(root.path(), false, &PathFilter::match_all()));
        let expected = set(vec![
            root.path().join("a.png"),
            root.path().join("notes.txt"),
            root.path().join("sub"),
        ]);
        assert_eq!(expected, listed);
    }

    #[test]
    fn recursive_listing_with_pattern() {
        let root = sample_tree();
        let filter = PathFilter::new(r".*\.(png|jpg)").unwrap();
        let listed = set(list_files(root.path(), true, &filter));
        let expected = set(vec![
            root.path().join("a.png"),
            root.path().join("sub/b.png"),
            root.path().join("sub/deeper/c.jpg"),
        ]);
        assert_eq!(expected, listed);
    }

    #[test]
    fn pattern_has_to_match_the_whole_path() {
        let filter = PathFilter::new("a").unwrap();
        assert!(!filter.matches(Path::new("/tmp/a.png")));
        assert!(PathFilter::new(r".*/a\.png").unwrap().matches(Path::new("/tmp/a.png")));
        assert!(PathFilter::new("(").is_err());
    }

    #[test]
    fn cancelled_traversal_stays_at_top_level() {
        let root = sample_tree();
        let cancellation = Cancellation::new();
        cancellation.cancel();
        let listed =
            set(list_files_until(root.path(), true, &PathFilter::match_all(), &cancellation));
        assert_eq!(set(list_files(root.path(), false, &PathFilter::match_all())), listed);
    }

    #[test]
    fn cancelling_midway_keeps_what_was_found() {
        // One entry per directory, so the visiting order is fixed.
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("a/b")).unwrap();
        touch(&root.path().join("a/b/c.txt"));
        let stop_at = root.path().join("a/b");

        let cancellation = Cancellation::new();
        let listed = list_files_notifying(
            root.path(),
            true,
            &PathFilter::match_all(),
            &cancellation,
            |path| {
                if path == stop_at.as_path() {
                    cancellation.cancel();
                }
            },
        );
        assert!(cancellation.is_cancelled());
        assert_eq!(vec![root.path().join("a"), root.path().join("a/b")], listed);
    }

    #[test]
    fn flatten_mixes_files_and_directories() {
        let root = sample_tree();
        let loose = tempfile::NamedTempFile::new().unwrap();
        let flattened = set(flatten([root.path(), loose.path()]));
        let expected = set(vec![
            loose.path().to_path_buf(),
            root.path().join("a.png"),
            root.path().join("notes.txt"),
            root.path().join("sub/b.png"),
            root.path().join("sub/deeper/c.jpg"),
        ]);
        assert_eq!(expected, flattened);
    }

    #[cfg(unix)]
    #[test]
    fn self_referential_link_terminates() {
        let root = sample_tree();
        std::os::unix::fs::symlink(root.path(), root.path().join("sub/loop")).unwrap();

        let listed = list_files(root.path(), true, &PathFilter::match_all());
        assert!(listed.contains(&root.path().join("sub/loop")));
        assert!(!listed.iter().any(|p| p.starts_with(root.path().join("sub/loop"))
            && p != &root.path().join("sub/loop")));

        let flattened = set(flatten([root.path()]));
        let expected = set(vec![
            root.path().join("a.png"),
            root.path().join("notes.txt"),
            root.path().join("sub/b.png"),
            root.path().join("sub/deeper/c.jpg"),
        ]);
        assert_eq!(expected, flattened);
    }
}
