//! Go source discovery with gitignore support.

mod scanner;

pub use scanner::{Scanner, is_go_source, is_vendored, is_vendored_below};

use std::path::PathBuf;

/// Expand each input path (file or directory) into Go sources, keeping the
/// order of the inputs and dropping repeats.
pub fn collect_sources(inputs: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut out: Vec<PathBuf> = Vec::new();
    for input in inputs {
        if !input.exists() {
            anyhow::bail!("path does not exist: {}", input.display());
        }
        for path in Scanner::new(input).scan()? {
            if !out.contains(&path) {
                out.push(path);
            }
        }
    }
    Ok(out)
}
