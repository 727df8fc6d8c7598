use crate::ExtractError;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// The full text of one source file plus the path it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub path: PathBuf,
    pub text: String,
}

impl SourceUnit {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Read a source file from disk.
    pub fn read(path: &Path) -> Result<Self, ExtractError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ExtractError::Io(format!("{}: {e}", path.display())))?;
        Ok(Self::new(path, text))
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Borrow the text covered by `span`, or `None` if the span does not
    /// index into this unit on character boundaries.
    pub fn slice(&self, span: &FunctionSpan) -> Option<&str> {
        self.text.get(span.range())
    }
}

/// Whether a declaration is a plain function or a method with a receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionKind {
    Function,
    Method,
}

impl FunctionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Method => "method",
        }
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Location of one declared function inside a [`SourceUnit`].
///
/// `start..end` is a half-open byte range running from the `func` keyword
/// through the closing brace of the body. Lines are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionSpan {
    pub name: String,
    pub receiver: Option<String>,
    pub kind: FunctionKind,
    pub start: usize,
    pub end: usize,
    pub start_line: usize,
    pub end_line: usize,
}

impl FunctionSpan {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `Receiver.Method` for methods, the bare name for functions.
    pub fn qualified_name(&self) -> String {
        match &self.receiver {
            Some(recv) => format!("{recv}.{}", self.name),
            None => self.name.clone(),
        }
    }
}

/// Unique-keyed mapping from function name to its span, built by one locator
/// pass over one source unit.
///
/// When a name repeats, the later declaration replaces the earlier one and
/// the replaced span is kept in [`FunctionTable::collisions`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionTable {
    spans: BTreeMap<String, FunctionSpan>,
    collisions: Vec<FunctionSpan>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a span, returning the span it replaced, if any.
    pub fn insert(&mut self, span: FunctionSpan) -> Option<FunctionSpan> {
        let replaced = self.spans.insert(span.name.clone(), span);
        if let Some(old) = &replaced {
            self.collisions.push(old.clone());
        }
        replaced
    }

    pub fn get(&self, name: &str) -> Option<&FunctionSpan> {
        self.spans.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.spans.contains_key(name)
    }

    /// Look a span up by `Receiver.Method` or bare function name. Also
    /// searches spans that were shadowed by a later same-named declaration.
    pub fn find_qualified(&self, qualified: &str) -> Option<&FunctionSpan> {
        self.spans
            .values()
            .chain(self.collisions.iter())
            .find(|s| s.qualified_name() == qualified)
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.spans.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FunctionSpan> {
        self.spans.values()
    }

    /// Surviving spans ordered by their position in the source.
    pub fn in_source_order(&self) -> Vec<&FunctionSpan> {
        let mut spans: Vec<&FunctionSpan> = self.spans.values().collect();
        spans.sort_by_key(|s| s.start);
        spans
    }

    /// Spans that were overwritten by a later declaration with the same name.
    pub fn collisions(&self) -> &[FunctionSpan] {
        &self.collisions
    }

    pub fn has_collisions(&self) -> bool {
        !self.collisions.is_empty()
    }
}

/// Function name to its literal source text.
pub type ExtractedFunctions = BTreeMap<String, String>;

/// What the extractor does when none of the requested names are found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Return an empty mapping.
    #[default]
    AllowEmpty,
    /// Fail with [`ExtractError::NotFound`].
    RequireAny,
}

impl MatchPolicy {
    pub fn from_required(required: bool) -> Self {
        if required {
            Self::RequireAny
        } else {
            Self::AllowEmpty
        }
    }
}
