use anyhow::Result;
use serde::Serialize;
use std::path::Path;
use testsmith_core::MatchPolicy;

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct ExtractedEntry<'a> {
    name: &'a str,
    source: &'a str,
}

pub fn run(file: &Path, names: &[String], require_match: bool, json: bool) -> Result<()> {
    let policy = MatchPolicy::from_required(require_match);
    let extracted = testsmith_treesit::locate_and_extract(file, names, policy)?;

    for name in names {
        if !extracted.contains_key(name) {
            tracing::warn!(%name, path = %file.display(), "function not found");
        }
    }

    for (name, source) in &extracted {
        if json {
            println!("{}", serde_json::to_string(&ExtractedEntry { name, source })?);
        } else {
            println!("// {name}\n{source}\n");
        }
    }
    Ok(())
}
