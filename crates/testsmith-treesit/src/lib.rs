//! Function boundary extraction for Go sources.
//!
//! The locator parses a whole file with tree-sitter and indexes every named
//! top-level declaration; the extractor slices requested functions back out
//! of the original text.

mod extractor;
mod locator;

pub use extractor::{extract_all, extract_functions};
pub use locator::{FunctionLocator, LocatorOptions};

use std::path::Path;
use testsmith_core::{ExtractError, ExtractedFunctions, MatchPolicy, SourceUnit};

/// Create the default locator (methods included).
pub fn default_locator() -> FunctionLocator {
    FunctionLocator::new()
}

/// Read `path`, locate its functions, and extract the requested ones.
pub fn locate_and_extract<S: AsRef<str>>(
    path: &Path,
    names: &[S],
    policy: MatchPolicy,
) -> Result<ExtractedFunctions, ExtractError> {
    let unit = SourceUnit::read(path)?;
    extract_from_unit(&default_locator(), &unit, names, policy)
}

/// Locate and extract from an already loaded source unit.
pub fn extract_from_unit<S: AsRef<str>>(
    locator: &FunctionLocator,
    unit: &SourceUnit,
    names: &[S],
    policy: MatchPolicy,
) -> Result<ExtractedFunctions, ExtractError> {
    let table = locator.locate(&unit.text)?;
    tracing::debug!(
        path = %unit.path.display(),
        functions = table.len(),
        requested = names.len(),
        "extracting functions"
    );
    extract_functions(&unit.text, &table, names, policy)
}
