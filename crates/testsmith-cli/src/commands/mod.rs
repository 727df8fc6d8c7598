pub mod analyze;
pub mod diff_names;
pub mod extract;
pub mod functions;
pub mod generate;

use crate::{Cli, Command};
use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

pub fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Functions {
            paths,
            json,
            no_methods,
        } => functions::run(cli, paths, *json, *no_methods),
        Command::Extract {
            file,
            names,
            require_match,
            json,
        } => extract::run(file, names, *require_match, *json),
        Command::DiffNames {
            diff,
            methods,
            unique,
            json,
        } => diff_names::run(diff.as_deref(), *methods, *unique, *json),
        Command::Generate(args) => generate::run(cli, args),
        Command::Analyze { diff, service } => analyze::run(cli, diff.as_deref(), service),
    }
}

/// Read a diff from `path`, or from stdin when no path (or `-`) is given.
pub(crate) fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => std::fs::read_to_string(p)
            .with_context(|| format!("failed to read {}", p.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read diff from stdin")?;
            Ok(buf)
        }
    }
}

/// Path shown to the user: relative to the current directory when possible.
pub(crate) fn display_path(path: &Path) -> String {
    let shown = std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf());
    shown.to_string_lossy().replace('\\', "/")
}
