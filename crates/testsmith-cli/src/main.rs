//! testsmith CLI: locate Go functions, pick changed ones from a diff, and
//! generate unit tests for them.
//!
//! Logging goes to stderr. `RUST_LOG` overrides the `-v`/`-q` levels.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use testsmith_generate::GeneratorConfig;
use tracing_subscriber::EnvFilter;

/// Testsmith: extract Go functions and generate unit tests for them with an LLM.
#[derive(Parser, Debug)]
#[command(name = "testsmith", version, about)]
pub struct Cli {
    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn,testsmith=info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the functions declared in Go sources
    Functions {
        /// Go files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Emit JSONL instead of a text listing
        #[arg(long)]
        json: bool,

        /// Leave methods out of the listing
        #[arg(long)]
        no_methods: bool,
    },

    /// Print the source of named functions from one file
    Extract {
        /// Go source file
        file: PathBuf,

        /// Function to extract (repeatable)
        #[arg(short = 'n', long = "name", required = true)]
        names: Vec<String>,

        /// Fail when none of the names are found
        #[arg(long)]
        require_match: bool,

        /// Emit JSONL instead of raw source
        #[arg(long)]
        json: bool,
    },

    /// List function names declared on diff lines
    DiffNames {
        /// Diff file to read (stdin when omitted or `-`)
        #[arg(long)]
        diff: Option<PathBuf>,

        /// Also match method declarations
        #[arg(long)]
        methods: bool,

        /// Drop repeated names
        #[arg(long)]
        unique: bool,

        /// Emit JSONL with change kind, file, and line
        #[arg(long)]
        json: bool,
    },

    /// Generate unit tests for functions with an LLM
    Generate(GenerateArgs),

    /// Ask the LLM to describe the function changes in a diff
    Analyze {
        /// Diff file to read (stdin when omitted or `-`)
        #[arg(long)]
        diff: Option<PathBuf>,

        #[command(flatten)]
        service: ServiceArgs,
    },
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Go files or directories; defaults to the files named in --diff
    paths: Vec<PathBuf>,

    /// Only generate for these functions (repeatable)
    #[arg(short = 'n', long = "name")]
    names: Vec<String>,

    /// Only generate for functions declared on lines of this diff
    #[arg(long)]
    diff: Option<PathBuf>,

    /// Match method declarations in --diff too
    #[arg(long)]
    methods: bool,

    /// Directory for generated files (default: next to each source)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Name output after the source file instead of the function
    #[arg(long)]
    per_source: bool,

    /// Replace existing test files instead of appending
    #[arg(long)]
    overwrite: bool,

    /// Treat a file with none of the requested functions as a failure
    #[arg(long)]
    require_match: bool,

    /// Write the model reply as-is, without unwrapping a fenced code block
    #[arg(long)]
    raw: bool,

    #[command(flatten)]
    service: ServiceArgs,
}

/// Overrides for the generator configuration read from the environment.
#[derive(Args, Debug)]
pub struct ServiceArgs {
    /// Model name (default: $TESTSMITH_MODEL or gpt-4)
    #[arg(long)]
    model: Option<String>,

    /// API base URL (default: $OPENAI_BASE_URL or the OpenAI endpoint)
    #[arg(long)]
    base_url: Option<String>,
}

impl ServiceArgs {
    pub fn config(&self) -> Result<GeneratorConfig> {
        let mut config = GeneratorConfig::from_env()?;
        if let Some(model) = &self.model {
            config = config.with_model(model.clone());
        }
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url.clone());
        }
        Ok(config)
    }
}

fn init_tracing(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);
    commands::run(&cli)
}
