//! Reading and writing single files under a project root.
//!
//! Paths are joined onto the root without containment checks: the caller
//! is trusted not to pass `..` sequences that escape the project.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ProjectError;
use crate::project::scanner::{is_excluded_dir, is_listed_file, to_posix};

/// Reads the UTF-8 text of `relative_path` under `root`.
pub fn read_file(root: impl AsRef<Path>, relative_path: &str) -> Result<String, ProjectError> {
    let full_path = resolve(root.as_ref(), relative_path);

    fs::read_to_string(&full_path).map_err(|source| ProjectError::Read {
        path: relative_path.to_string(),
        source,
    })
}

/// Writes `content` to `relative_path` under `root`, creating any missing
/// parent directories and replacing whatever the file held before.
///
/// Returns the confirmation message. Directories created before a failed
/// write are left in place.
pub fn write_file(
    root: impl AsRef<Path>,
    relative_path: &str,
    content: &str,
) -> Result<String, ProjectError> {
    let full_path = resolve(root.as_ref(), relative_path);
    let write_err = |source| ProjectError::Write {
        path: relative_path.to_string(),
        source,
    };

    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(&full_path, content).map_err(write_err)?;

    tracing::info!("Wrote {} bytes to {}", content.len(), full_path.display());
    Ok(format!("Successfully written to {}", relative_path))
}

/// Outcome of looking for the unit test of a production class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestLookup {
    /// `src/test/java` does not exist under the root.
    NoTestFolder,
    /// A matching test file, relative to the root.
    Found(String),
    /// The folder exists but holds no matching file.
    Missing,
}

impl std::fmt::Display for TestLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestLookup::NoTestFolder => write!(f, "Test folder not found"),
            TestLookup::Found(path) => write!(f, "{}", path),
            TestLookup::Missing => write!(f, "No existing test found."),
        }
    }
}

/// Looks for `<ClassName>Test.java` anywhere under `<root>/src/test/java`.
///
/// `class_name` may carry a trailing `.java`.
pub fn find_existing_test(root: impl AsRef<Path>, class_name: &str) -> TestLookup {
    let root = root.as_ref();
    let test_root = root.join("src").join("test").join("java");
    if !test_root.is_dir() {
        return TestLookup::NoTestFolder;
    }

    let class_name = class_name.trim();
    let class_name = class_name.strip_suffix(".java").unwrap_or(class_name);
    let target = format!("{}Test.java", class_name);

    WalkDir::new(&test_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0
                || !(e.file_type().is_dir()
                    && e.file_name().to_str().is_some_and(is_excluded_dir))
        })
        .filter_map(|e| e.ok())
        .find(|e| is_listed_file(e) && e.file_name().to_str() == Some(target.as_str()))
        .and_then(|e| e.path().strip_prefix(root).ok().map(to_posix))
        .map(TestLookup::Found)
        .unwrap_or(TestLookup::Missing)
}

fn resolve(root: &Path, relative_path: &str) -> PathBuf {
    root.join(relative_path)
}
