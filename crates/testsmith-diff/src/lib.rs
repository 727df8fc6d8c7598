//! Changed-function detection over unified diff text.
//!
//! Diffs are fragments that will not parse as whole Go files, so this crate
//! never builds a syntax tree. Each line is matched against a declaration
//! pattern instead: an optional `+`/`-` marker, optional whitespace, `func`,
//! whitespace, an identifier, then `(`.
//!
//! Method declarations (`func (r *T) Name(`) do not match the default
//! pattern. Set [`DiffOptions::include_methods`] to capture their names.

use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::hash::Hash;
use std::sync::LazyLock;

fn compile_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(_compile_err) => match Regex::new(r"$^") {
            Ok(fallback) => fallback,
            Err(fallback_err) => panic!("hardcoded fallback regex must compile: {fallback_err}"),
        },
    }
}

static FUNC_DECL: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"^([+-]?)\s*func\s+([\p{L}_][\p{L}\p{Nd}_]*)\("));
static FUNC_OR_METHOD_DECL: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex(r"^([+-]?)\s*func(?:\s*\([^)]*\)\s*|\s+)([\p{L}_][\p{L}\p{Nd}_]*)\(")
});

/// Pattern options for the diff scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiffOptions {
    /// Also match declarations with a parenthesised receiver.
    pub include_methods: bool,
}

/// Which side of the diff a matched line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineChange {
    Added,
    Removed,
    Context,
}

impl LineChange {
    fn from_marker(marker: &str) -> Self {
        match marker {
            "+" => Self::Added,
            "-" => Self::Removed,
            _ => Self::Context,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Context => "context",
        }
    }
}

/// One matched declaration line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffFunction {
    pub name: String,
    pub change: LineChange,
    /// File from the nearest preceding `+++`/`---` header, if any.
    pub file: Option<String>,
    /// 1-based line number within the diff text.
    pub line: usize,
}

/// Scans diff text line by line for function declarations.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffScanner {
    options: DiffOptions,
}

impl DiffScanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DiffOptions) -> Self {
        Self { options }
    }

    fn pattern(&self) -> &'static Regex {
        if self.options.include_methods {
            &*FUNC_OR_METHOD_DECL
        } else {
            &*FUNC_DECL
        }
    }

    /// Every matching line, in diff order. Never fails; unmatched lines are
    /// skipped.
    pub fn scan(&self, diff: &str) -> Vec<DiffFunction> {
        let pattern = self.pattern();
        let mut found = Vec::new();
        let mut old_file: Option<String> = None;
        let mut file: Option<String> = None;

        for (idx, line) in diff.lines().enumerate() {
            if line.starts_with("diff --git ") {
                old_file = None;
                file = None;
                continue;
            }
            if let Some(path) = line.strip_prefix("--- ") {
                old_file = header_path(path);
                continue;
            }
            if let Some(path) = line.strip_prefix("+++ ") {
                file = header_path(path).or_else(|| old_file.clone());
                continue;
            }

            let Some(caps) = pattern.captures(line) else {
                continue;
            };
            let (Some(marker), Some(name)) = (caps.get(1), caps.get(2)) else {
                continue;
            };
            found.push(DiffFunction {
                name: name.as_str().to_string(),
                change: LineChange::from_marker(marker.as_str()),
                file: file.clone(),
                line: idx + 1,
            });
        }

        tracing::debug!(matches = found.len(), "scanned diff for function declarations");
        found
    }

    /// Names of every matching line, in diff order, duplicates kept.
    pub fn function_names(&self, diff: &str) -> Vec<String> {
        self.scan(diff).into_iter().map(|f| f.name).collect()
    }
}

/// Extract changed function names with the default (functions-only) pattern.
pub fn extract_function_names_from_diff(diff: &str) -> Vec<String> {
    DiffScanner::new().function_names(diff)
}

/// Remove repeated names, keeping the first occurrence of each.
pub fn dedupe<I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    dedupe_by(names, String::clone)
}

/// Keep the first item for each distinct key, in input order.
pub fn dedupe_by<I, T, K, F>(items: I, mut key: F) -> Vec<T>
where
    I: IntoIterator<Item = T>,
    K: Eq + Hash,
    F: FnMut(&T) -> K,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}

/// Group matches by file, each list deduplicated in diff order. Matches that
/// appear before any file header are grouped under the empty string.
pub fn functions_by_file(functions: &[DiffFunction]) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for func in functions {
        let key = func.file.clone().unwrap_or_default();
        let names = grouped.entry(key).or_default();
        if !names.contains(&func.name) {
            names.push(func.name.clone());
        }
    }
    grouped
}

/// Path named by a `---`/`+++` header with the `a/`/`b/` prefix and any
/// trailing timestamp removed. `/dev/null` yields `None`.
fn header_path(raw: &str) -> Option<String> {
    let path = raw.split('\t').next().unwrap_or(raw).trim();
    if path.is_empty() || path == "/dev/null" {
        return None;
    }
    let path = path
        .strip_prefix("a/")
        .or_else(|| path.strip_prefix("b/"))
        .unwrap_or(path);
    Some(path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIT_DIFF: &str = "\
diff --git a/widget.go b/widget.go
index 1111111..2222222 100644
--- a/widget.go
+++ b/widget.go
@@ -1,7 +1,7 @@
 package widget

-func OldWidget() {
+func NewWidget() {
 \treturn
 }
diff --git a/gone.go b/gone.go
deleted file mode 100644
--- a/gone.go
+++ /dev/null
@@ -1,3 +0,0 @@
-package gone
-
-func Removed(x int) int { return x }
";

    #[test]
    fn added_and_removed_in_order() {
        let diff = "+func NewWidget() {\n-func OldWidget() {\n";
        assert_eq!(
            extract_function_names_from_diff(diff),
            vec!["NewWidget", "OldWidget"]
        );
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(extract_function_names_from_diff("").is_empty());
    }

    #[test]
    fn text_without_declarations_yields_nothing() {
        let text = "hello world\n+added line\n-removed line\n@@ -1 +1 @@\n";
        assert!(extract_function_names_from_diff(text).is_empty());
    }

    #[test]
    fn arbitrary_bytes_do_not_panic() {
        let junk = "\u{0}\u{7f}+func\n-func (\n+func 9bad(\nfunc\tA(\n(((((\n+++\n---\n";
        let names = extract_function_names_from_diff(junk);
        assert_eq!(names, vec!["A"]);
    }

    #[test]
    fn method_not_matched_by_default() {
        let diff = "+func (r *Receiver) Method() {\n";
        assert!(extract_function_names_from_diff(diff).is_empty());
    }

    #[test]
    fn method_matched_when_enabled() {
        let scanner = DiffScanner::with_options(DiffOptions {
            include_methods: true,
        });
        let diff = "+func (r *Receiver) Method() {\n+func Plain() {\n";
        assert_eq!(scanner.function_names(diff), vec!["Method", "Plain"]);
    }

    #[test]
    fn method_pattern_skips_calls() {
        let scanner = DiffScanner::with_options(DiffOptions {
            include_methods: true,
        });
        assert!(scanner.function_names("+funcName(x)\n").is_empty());
        assert!(scanner.function_names("+\tf := func(x int) {\n").is_empty());
    }

    #[test]
    fn duplicates_are_kept() {
        let diff = "-func Run() error {\n+func Run() error {\n";
        assert_eq!(extract_function_names_from_diff(diff), vec!["Run", "Run"]);
    }

    #[test]
    fn leading_whitespace_and_context_lines_match() {
        let diff = " func Context() {\n+   func Indented() {\n";
        let found = DiffScanner::new().scan(diff);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].change, LineChange::Context);
        assert_eq!(found[1].name, "Indented");
        assert_eq!(found[1].change, LineChange::Added);
    }

    #[test]
    fn identifier_must_touch_paren() {
        assert!(extract_function_names_from_diff("+func Spaced () {\n").is_empty());
        assert!(extract_function_names_from_diff("+func Map[T any](xs []T) {\n").is_empty());
    }

    #[test]
    fn unicode_identifiers() {
        assert_eq!(
            extract_function_names_from_diff("+func größe() int {\n"),
            vec!["größe"]
        );
    }

    #[test]
    fn scan_tracks_files_and_lines() {
        let found = DiffScanner::new().scan(GIT_DIFF);
        assert_eq!(found.len(), 3);

        assert_eq!(found[0].name, "OldWidget");
        assert_eq!(found[0].change, LineChange::Removed);
        assert_eq!(found[0].file.as_deref(), Some("widget.go"));
        assert_eq!(found[0].line, 8);

        assert_eq!(found[1].name, "NewWidget");
        assert_eq!(found[1].change, LineChange::Added);

        // deleted file: +++ is /dev/null, fall back to the --- path
        assert_eq!(found[2].name, "Removed");
        assert_eq!(found[2].file.as_deref(), Some("gone.go"));
    }

    #[test]
    fn headers_are_not_declarations() {
        let diff = "--- a/func.go\n+++ b/func.go\n";
        assert!(DiffScanner::new().scan(diff).is_empty());
    }

    #[test]
    fn group_by_file() {
        let found = DiffScanner::new().scan(GIT_DIFF);
        let grouped = functions_by_file(&found);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped["widget.go"], vec!["OldWidget", "NewWidget"]);
        assert_eq!(grouped["gone.go"], vec!["Removed"]);
    }

    #[test]
    fn group_without_headers_uses_empty_key() {
        let found = DiffScanner::new().scan("+func A() {\n-func A() {\n");
        let grouped = functions_by_file(&found);
        assert_eq!(grouped[""], vec!["A"]);
    }

    #[test]
    fn dedupe_keeps_first_occurrence() {
        let names = vec!["b", "a", "b", "c", "a"]
            .into_iter()
            .map(String::from);
        assert_eq!(dedupe(names), vec!["b", "a", "c"]);
    }

    #[test]
    fn dedupe_by_name_keeps_first_match_record() {
        let found = DiffScanner::new().scan("-func Add(a int) {\n+func Add(a, b int) {\n+func Sub() {\n");
        let unique = dedupe_by(found, |f| f.name.clone());
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].name, "Add");
        assert_eq!(unique[0].change, LineChange::Removed);
        assert_eq!(unique[0].line, 1);
        assert_eq!(unique[1].name, "Sub");
    }

    #[test]
    fn header_path_strips_prefix_and_timestamp() {
        assert_eq!(header_path("b/pkg/x.go").as_deref(), Some("pkg/x.go"));
        assert_eq!(
            header_path("pkg/x.go\t2024-01-01 00:00:00").as_deref(),
            Some("pkg/x.go")
        );
        assert_eq!(header_path("/dev/null"), None);
    }
}
