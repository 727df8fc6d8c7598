use ignore::WalkBuilder;
use std::path::{Component, Path, PathBuf};

/// True if any path component is `vendor`.
pub fn is_vendored(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::Normal(name) if name == "vendor"))
}

/// True if a component of `path` below `base` is `vendor`. Paths outside
/// `base` are checked whole.
pub fn is_vendored_below(path: &Path, base: &Path) -> bool {
    match path.strip_prefix(base) {
        Ok(rel) => is_vendored(rel),
        Err(_) => is_vendored(path),
    }
}

/// True for `.go` files that are not themselves tests.
pub fn is_go_source(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(".go") && !name.ends_with("_test.go")
}

/// Collects Go sources from a file or directory, respecting .gitignore and
/// skipping vendored code and existing tests.
pub struct Scanner<'a> {
    root: &'a Path,
}

impl<'a> Scanner<'a> {
    pub fn new(root: &'a Path) -> Self {
        Self { root }
    }

    /// Return the Go sources under the root, sorted by path. A root that is
    /// itself a file is returned as-is when it passes the same filters.
    pub fn scan(&self) -> anyhow::Result<Vec<PathBuf>> {
        if self.root.is_file() {
            return Ok(self.accept(self.root).into_iter().collect());
        }

        let mut files = Vec::new();
        let walker = WalkBuilder::new(self.root)
            .hidden(false) // dot-directories are walked; .gitignore still applies
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    tracing::debug!(%err, "skipping unreadable entry");
                    continue;
                }
            };

            // Skip directories
            if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                continue;
            }

            let rel = entry.path().strip_prefix(self.root).unwrap_or(entry.path());
            if is_vendored(rel) {
                tracing::info!(path = %entry.path().display(), "skipping vendor file");
                continue;
            }
            if let Some(path) = self.accept(entry.path()) {
                files.push(path);
            }
        }

        // Sort by path for deterministic output
        files.sort();
        Ok(files)
    }

    fn accept(&self, path: &Path) -> Option<PathBuf> {
        if !is_go_source(path) {
            return None;
        }
        let base = std::env::current_dir().unwrap_or_default();
        if self.root == path && is_vendored_below(path, &base) {
            tracing::info!(path = %path.display(), "skipping vendor file");
            return None;
        }
        Some(path.to_path_buf())
    }
}
