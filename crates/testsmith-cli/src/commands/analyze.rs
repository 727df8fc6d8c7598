use crate::commands::read_input;
use crate::{Cli, ServiceArgs};
use anyhow::Result;
use std::path::Path;
use testsmith_generate::{DiffAnalyzer, OpenAiClient};

pub fn run(cli: &Cli, diff: Option<&Path>, service: &ServiceArgs) -> Result<()> {
    let text = read_input(diff)?;
    if text.trim().is_empty() {
        anyhow::bail!("diff is empty; nothing to analyze");
    }

    let changed = testsmith_diff::dedupe(testsmith_diff::extract_function_names_from_diff(&text));
    if !cli.is_quiet() {
        eprintln!("Modified functions: {}", changed.join(", "));
    }

    let client = OpenAiClient::new(service.config()?)?;
    println!("{}", analyze(&client, &text)?.trim_end());
    Ok(())
}

fn analyze(analyzer: &dyn DiffAnalyzer, diff: &str) -> Result<String> {
    Ok(analyzer.analyze_diff(diff)?)
}
