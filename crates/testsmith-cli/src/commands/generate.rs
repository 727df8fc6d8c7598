use crate::commands::{display_path, read_input};
use crate::{Cli, GenerateArgs};
use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use testsmith_core::{MatchPolicy, SourceUnit};
use testsmith_diff::{DiffOptions, DiffScanner};
use testsmith_generate::{OpenAiClient, TestGenerator, is_valid_function_name, strip_code_fence};
use testsmith_render::{OutputNaming, TestFileWriter, WriteMode, WriteResult};
use testsmith_treesit::{FunctionLocator, extract_all, extract_from_unit};

/// Which functions of a file to generate tests for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Selection {
    All,
    Names(Vec<String>),
}

/// Totals for one source file.
#[derive(Debug, Default)]
struct FileReport {
    generated: usize,
    written: Vec<(PathBuf, WriteResult)>,
}

/// Extract, generate, and write for one file at a time.
struct Pipeline<'a> {
    generator: &'a dyn TestGenerator,
    locator: FunctionLocator,
    writer: TestFileWriter,
    policy: MatchPolicy,
    raw: bool,
    quiet: bool,
    /// Outputs already written this run; later writes to them append.
    touched: HashSet<PathBuf>,
}

impl<'a> Pipeline<'a> {
    fn new(generator: &'a dyn TestGenerator, writer: TestFileWriter, policy: MatchPolicy) -> Self {
        Self {
            generator,
            locator: FunctionLocator::new(),
            writer,
            policy,
            raw: false,
            quiet: true,
            touched: HashSet::new(),
        }
    }

    /// Tests written before a failure stay recorded in `report`.
    fn process(
        &mut self,
        path: &Path,
        selection: &Selection,
        report: &mut FileReport,
    ) -> Result<()> {
        let unit = SourceUnit::read(path)?;
        let extracted = match selection {
            Selection::All => extract_all(&unit.text, &self.locator.locate(&unit.text)?)?,
            Selection::Names(names) => extract_from_unit(&self.locator, &unit, names, self.policy)?,
        };
        if extracted.is_empty() {
            tracing::info!(path = %path.display(), "no requested functions in file");
        }

        for (name, source) in &extracted {
            let reply = self
                .generator
                .generate_test(name, source)
                .with_context(|| format!("test generation failed for {name}"))?;
            let contents = if self.raw {
                reply
            } else {
                strip_code_fence(&reply)
            };

            let target = self.writer.path_for(path, name);
            let result = if self.touched.contains(&target) {
                self.writer.clone().mode(WriteMode::Append).write(&target, &contents)?
            } else {
                self.writer.write(&target, &contents)?
            };
            self.touched.insert(target.clone());

            if !self.quiet {
                println!(
                    "Generated test case for: {name} -> {} ({})",
                    display_path(&target),
                    result.as_str()
                );
            }
            report.generated += 1;
            report.written.push((target, result));
        }
        Ok(())
    }
}

pub fn run(cli: &Cli, args: &GenerateArgs) -> Result<()> {
    let diff_groups = match &args.diff {
        Some(diff) => Some(diff_functions(&read_input(Some(diff))?, args.methods)),
        None => None,
    };

    let files = if args.paths.is_empty() {
        match &diff_groups {
            Some(groups) => files_named_in_diff(groups, Path::new(""))?,
            None => anyhow::bail!("no source paths given; pass paths or --diff"),
        }
    } else {
        testsmith_scanner::collect_sources(&args.paths)?
    };

    let names = valid_names(&args.names);
    if !args.names.is_empty() && names.is_empty() {
        anyhow::bail!("none of the --name values are valid function names");
    }

    let client = OpenAiClient::new(args.service.config()?)?;
    tracing::info!(model = %client.config().model, files = files.len(), "generating tests");

    let writer = TestFileWriter::new()
        .out_dir(args.out_dir.clone())
        .naming(if args.per_source {
            OutputNaming::PerSource
        } else {
            OutputNaming::PerFunction
        })
        .mode(if args.overwrite {
            WriteMode::Overwrite
        } else {
            WriteMode::Append
        });
    let mut pipeline = Pipeline::new(
        &client,
        writer,
        MatchPolicy::from_required(args.require_match),
    );
    pipeline.raw = args.raw;
    pipeline.quiet = cli.is_quiet();

    let summary = run_pipeline(&mut pipeline, &files, &names, diff_groups.as_ref());
    if !cli.is_quiet() {
        eprintln!(
            "Generated {} tests from {} files",
            summary.generated, summary.processed
        );
    }
    if summary.failed > 0 {
        anyhow::bail!("{} of {} files failed", summary.failed, files.len());
    }
    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    processed: usize,
    generated: usize,
    failed: usize,
}

/// Process every file, logging failures and carrying on with the rest.
fn run_pipeline(
    pipeline: &mut Pipeline<'_>,
    files: &[PathBuf],
    names: &[String],
    diff_groups: Option<&BTreeMap<String, Vec<String>>>,
) -> Summary {
    let mut summary = Summary::default();
    for path in files {
        let Some(selection) = selection_for(path, names, diff_groups) else {
            tracing::debug!(path = %path.display(), "no changed functions in file");
            continue;
        };
        summary.processed += 1;
        let mut report = FileReport::default();
        let outcome = pipeline.process(path, &selection, &mut report);
        summary.generated += report.generated;
        if let Err(err) = outcome {
            tracing::error!(
                path = %path.display(),
                written = report.generated,
                "{err:#}"
            );
            summary.failed += 1;
        }
    }
    summary
}

fn diff_functions(diff: &str, methods: bool) -> BTreeMap<String, Vec<String>> {
    let scanner = DiffScanner::with_options(DiffOptions {
        include_methods: methods,
    });
    testsmith_diff::functions_by_file(&scanner.scan(diff))
}

fn valid_names(names: &[String]) -> Vec<String> {
    let mut out = Vec::new();
    for name in names {
        if !is_valid_function_name(name) {
            tracing::warn!(name = %name, "skipping invalid function name");
        } else if !out.contains(name) {
            out.push(name.clone());
        }
    }
    out
}

/// Functions to generate for `path`, or `None` when the file has nothing to do.
///
/// Explicit names win. Otherwise a diff narrows the file to the functions it
/// touches: entries under a header whose path is a suffix of `path`, plus any
/// found before the first header. With neither, every function is selected.
fn selection_for(
    path: &Path,
    names: &[String],
    diff_groups: Option<&BTreeMap<String, Vec<String>>>,
) -> Option<Selection> {
    if !names.is_empty() {
        return Some(Selection::Names(names.to_vec()));
    }
    let Some(groups) = diff_groups else {
        return Some(Selection::All);
    };

    let mut wanted: Vec<String> = Vec::new();
    for (file, funcs) in groups {
        if file.is_empty() || path.ends_with(Path::new(file)) {
            for name in funcs {
                if is_valid_function_name(name) && !wanted.contains(name) {
                    wanted.push(name.clone());
                }
            }
        }
    }
    if wanted.is_empty() {
        None
    } else {
        Some(Selection::Names(wanted))
    }
}

/// Go sources named by diff headers that exist under `root`. Vendored paths
/// are skipped.
fn files_named_in_diff(
    groups: &BTreeMap<String, Vec<String>>,
    root: &Path,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for file in groups.keys().filter(|f| !f.is_empty()) {
        let rel = Path::new(file);
        if !testsmith_scanner::is_go_source(rel) {
            continue;
        }
        if testsmith_scanner::is_vendored(rel) {
            tracing::info!(path = %file, "skipping vendor file");
            continue;
        }
        let path = root.join(rel);
        if path.is_file() {
            files.push(path);
        } else {
            tracing::warn!(path = %file, "file named in diff not found");
        }
    }
    if files.is_empty() {
        anyhow::bail!("the diff names no existing Go source files; pass paths explicitly");
    }
    Ok(files)
}
