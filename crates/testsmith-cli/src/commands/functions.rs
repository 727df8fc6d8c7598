use crate::Cli;
use crate::commands::display_path;
use anyhow::Result;
use std::path::PathBuf;
use testsmith_core::{FunctionTable, SourceUnit};
use testsmith_render::{FileFunctions, JsonlWriter, render_table};
use testsmith_treesit::{FunctionLocator, LocatorOptions};

pub fn run(cli: &Cli, paths: &[PathBuf], json: bool, no_methods: bool) -> Result<()> {
    let files = testsmith_scanner::collect_sources(paths)?;
    if !cli.is_quiet() {
        eprintln!("Scanning {} Go files...", files.len());
    }

    let locator = FunctionLocator::with_options(LocatorOptions {
        include_methods: !no_methods,
    });

    let mut tables: Vec<(String, FunctionTable)> = Vec::with_capacity(files.len());
    let mut failed = 0usize;
    for path in &files {
        let located = SourceUnit::read(path).and_then(|unit| locator.locate(&unit.text));
        match located {
            Ok(table) => tables.push((display_path(path), table)),
            Err(err) => {
                tracing::error!(path = %path.display(), %err, "failed to locate functions");
                failed += 1;
            }
        }
    }

    if json {
        let entries: Vec<FileFunctions<'_>> = tables
            .iter()
            .map(|(path, table)| FileFunctions { path, table })
            .collect();
        let source = paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let mut stdout = std::io::stdout().lock();
        JsonlWriter::new(&source).write_to(&mut stdout, &entries, failed)?;
    } else {
        for (path, table) in &tables {
            print!("{}", render_table(path, table));
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} files could not be parsed", files.len());
    }
    Ok(())
}
