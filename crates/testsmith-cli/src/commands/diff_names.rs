use crate::commands::read_input;
use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use testsmith_diff::{DiffFunction, DiffOptions, DiffScanner};

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DiffEntry<'a> {
    name: &'a str,
    change: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<&'a str>,
    line: usize,
}

pub fn run(diff: Option<&Path>, methods: bool, unique: bool, json: bool) -> Result<()> {
    let text = read_input(diff)?;
    let scanner = DiffScanner::with_options(DiffOptions {
        include_methods: methods,
    });
    let found = select(scanner.scan(&text), unique);
    tracing::info!(matches = found.len(), "scanned diff");

    for func in &found {
        if json {
            let entry = DiffEntry {
                name: &func.name,
                change: func.change.as_str(),
                file: func.file.as_deref(),
                line: func.line,
            };
            println!("{}", serde_json::to_string(&entry)?);
        } else {
            println!("{}", func.name);
        }
    }
    Ok(())
}

/// Keep the first match of each name when `unique` is set.
fn select(found: Vec<DiffFunction>, unique: bool) -> Vec<DiffFunction> {
    if !unique {
        return found;
    }
    testsmith_diff::dedupe_by(found, |f| f.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIFF: &str = "\
--- a/calc.go
+++ b/calc.go
-func Add(a, b int) int {
+func Add(a, b, c int) int {
+func Sub(a, b int) int {
";

    #[test]
    fn keeps_duplicates_by_default() {
        let names: Vec<_> = select(DiffScanner::new().scan(DIFF), false)
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["Add", "Add", "Sub"]);
    }

    #[test]
    fn unique_keeps_first_occurrence() {
        let found = select(DiffScanner::new().scan(DIFF), true);
        let names: Vec<_> = found.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Add", "Sub"]);
        assert_eq!(found[0].line, 3);
    }
}
