//! Project tree scanning.
//!
//! Walks a project root, prunes well-known build/VCS/dependency directories
//! before descending into them, and reports files whose name ends with one
//! of the extensions of the requested [`FileKind`].

use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::ProjectError;

/// Directory names whose whole subtree is skipped during a walk.
pub const EXCLUDED_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "build",
    "dist",
    "target",
    ".idea",
    "venv",
    ".venv",
    "__pycache__",
    "public",
];

/// Returns true if a directory with this name is never descended into.
pub fn is_excluded_dir(name: &str) -> bool {
    EXCLUDED_DIRS.contains(&name)
}

/// How reported paths are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStyle {
    /// Relative to the project root, `/`-separated, no leading `./`.
    Relative,
    /// Absolute path under the resolved project root.
    Absolute,
}

/// The family of files a scan is looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Frontend component sources (Vue single-file components, scripts, styles, manifests).
    Frontend,
    /// Java production classes.
    Backend,
    /// Markup-bearing files that may contain interactive elements.
    Markup,
}

impl FileKind {
    /// File name suffixes matched by this kind.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FileKind::Frontend => &[".vue", ".json", ".js", ".css", ".ts"],
            FileKind::Backend => &[".java"],
            FileKind::Markup => &[".html", ".vue", ".jsp", ".js", ".jsx", ".tsx"],
        }
    }

    /// Path form used when reporting files of this kind.
    ///
    /// Component and class listings are fed back into read/write tools that
    /// take a root-relative path; markup listings feed the selector
    /// extractor which takes a bare path.
    pub fn path_style(self) -> PathStyle {
        match self {
            FileKind::Frontend | FileKind::Backend => PathStyle::Relative,
            FileKind::Markup => PathStyle::Absolute,
        }
    }

    /// Returns true if `file_name` carries one of this kind's suffixes.
    pub fn matches(self, file_name: &str) -> bool {
        self.extensions().iter().any(|ext| file_name.ends_with(ext))
    }
}

/// Lists files of `kind` under `root`, in the kind's declared path style.
pub fn scan(root: impl AsRef<Path>, kind: FileKind) -> Result<Vec<String>, ProjectError> {
    scan_with_style(root, kind, kind.path_style())
}

/// Lists files of `kind` under `root`, reporting paths in `style`.
///
/// A missing root is a [`ProjectError::NotFound`]. Entries the walker
/// cannot read (permissions, races with deletion) are skipped.
pub fn scan_with_style(
    root: impl AsRef<Path>,
    kind: FileKind,
    style: PathStyle,
) -> Result<Vec<String>, ProjectError> {
    let root = root.as_ref();
    if !root.exists() {
        return Err(ProjectError::NotFound {
            path: root.to_path_buf(),
        });
    }

    let root = resolve_root(root);
    let mut found = Vec::new();

    let walker = WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_pruned(e));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        if !is_listed_file(&entry) {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if !kind.matches(name) {
            continue;
        }

        match style {
            PathStyle::Absolute => found.push(entry.path().to_string_lossy().into_owned()),
            PathStyle::Relative => {
                if let Ok(rel) = entry.path().strip_prefix(&root) {
                    found.push(to_posix(rel));
                }
            }
        }
    }

    tracing::debug!(
        "Scanned {} for {:?} files: {} found",
        root.display(),
        kind,
        found.len()
    );

    Ok(found)
}

/// A regular file, or a symlink to one, strictly below the walk root.
///
/// Directory links are never followed; a root that is itself a file lists
/// nothing.
pub(crate) fn is_listed_file(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

/// The root itself is never pruned, only directories below it.
fn is_pruned(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_str().is_some_and(is_excluded_dir)
}

fn resolve_root(root: &Path) -> PathBuf {
    std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf())
}

/// Joins path components with `/` regardless of host separator.
pub(crate) fn to_posix(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::fs;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    fn as_set(paths: Vec<String>) -> HashSet<String> {
        paths.into_iter().collect()
    }

    #[test]
    fn test_backend_scan_lists_java_relative() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "src/main/java/com/acme/UserService.java");
        touch(dir.path(), "src/main/java/com/acme/App.java");
        touch(dir.path(), "src/main/resources/application.yml");
        touch(dir.path(), "pom.xml");

        let found = as_set(scan(dir.path(), FileKind::Backend).unwrap());
        let expected: HashSet<String> = [
            "src/main/java/com/acme/UserService.java",
            "src/main/java/com/acme/App.java",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_excluded_dirs_are_pruned_at_any_depth() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "src/App.vue");
        touch(dir.path(), "node_modules/lib/index.js");
        touch(dir.path(), "packages/ui/node_modules/x/.git/hooks.js");
        touch(dir.path(), "packages/ui/dist/bundle.js");
        touch(dir.path(), "packages/ui/src/Button.vue");
        touch(dir.path(), "public/index.html.js");
        touch(dir.path(), "deep/a/b/c/__pycache__/gen.ts");

        let found = scan(dir.path(), FileKind::Frontend).unwrap();
        for path in &found {
            for segment in path.split('/') {
                assert!(!is_excluded_dir(segment), "{} leaked through", path);
            }
        }
        assert_eq!(
            as_set(found),
            as_set(vec!["src/App.vue".into(), "packages/ui/src/Button.vue".into()])
        );
    }

    #[test]
    fn test_each_file_reported_once() {
        let dir = tempfile::tempdir().unwrap();
        // ".js" is a prefix of ".jsx"; neither file may be counted twice.
        touch(dir.path(), "pages/Login.vue");
        touch(dir.path(), "pages/login.jsx");
        touch(dir.path(), "pages/login.js");

        let found = scan(dir.path(), FileKind::Markup).unwrap();
        assert_eq!(found.len(), 3);
        assert_eq!(as_set(found.clone()).len(), 3);
    }

    #[test]
    fn test_markup_scan_reports_absolute_paths() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "web/index.html");
        touch(dir.path(), "web/style.css");

        let found = scan(dir.path(), FileKind::Markup).unwrap();
        assert_eq!(found.len(), 1);
        let path = Path::new(&found[0]);
        assert!(path.is_absolute());
        assert!(path.exists());
        assert!(found[0].ends_with("index.html"));
    }

    #[test]
    fn test_missing_root_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        let err = scan(&missing, FileKind::Backend).unwrap_err();
        assert!(matches!(err, ProjectError::NotFound { .. }));

        let msg = err.to_string();
        assert!(msg.starts_with("Error: Path"));
        assert!(msg.contains("does not exist"));
    }

    #[test]
    fn test_file_root_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "src/Real.java");

        let found = scan(dir.path().join("src/Real.java"), FileKind::Backend).unwrap();
        assert!(found.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_symlinks_listed_dir_symlinks_not_followed() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "src/Real.java");
        touch(dir.path(), "shared/Util.java");
        symlink(dir.path().join("src/Real.java"), dir.path().join("src/Link.java")).unwrap();
        symlink(dir.path().join("shared"), dir.path().join("src/shared_link")).unwrap();
        symlink(dir.path().join("src/Gone.java"), dir.path().join("src/Dangling.java")).unwrap();

        let found = scan(dir.path(), FileKind::Backend).unwrap();
        assert_eq!(
            as_set(found),
            as_set(vec![
                "src/Real.java".into(),
                "src/Link.java".into(),
                "shared/Util.java".into(),
            ])
        );
    }

    #[test]
    fn test_excluded_root_name_is_still_scanned() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "build/src/Main.java");

        let found = scan(dir.path().join("build"), FileKind::Backend).unwrap();
        assert_eq!(found, vec!["src/Main.java".to_string()]);
    }

    #[test]
    fn test_relative_style_has_no_leading_dot() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "Main.java");

        let found = scan_with_style(dir.path(), FileKind::Backend, PathStyle::Relative).unwrap();
        assert_eq!(found, vec!["Main.java".to_string()]);
    }
}
