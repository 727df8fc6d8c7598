use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Marker inserted between the stem and the extension of generated files.
pub const TEST_MARKER: &str = "_test";
pub const GO_EXTENSION: &str = "go";

/// `Add` -> `Add_test.go`.
pub fn test_file_name(stem: &str) -> String {
    format!("{stem}{TEST_MARKER}.{GO_EXTENSION}")
}

/// Which identifier the output file is named after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputNaming {
    /// One file per function: `<function>_test.go`.
    #[default]
    PerFunction,
    /// One file per source: `math.go` -> `math_test.go`.
    PerSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    /// Create the file, or append to it if it already exists.
    #[default]
    Append,
    /// Replace any existing content.
    Overwrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteResult {
    Created,
    Appended,
    Overwritten,
}

impl WriteResult {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Appended => "appended",
            Self::Overwritten => "overwritten",
        }
    }
}

/// Persists generated test text next to its source, or under an explicit
/// output directory.
#[derive(Debug, Clone, Default)]
pub struct TestFileWriter {
    out_dir: Option<PathBuf>,
    naming: OutputNaming,
    mode: WriteMode,
}

impl TestFileWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn out_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.out_dir = dir;
        self
    }

    pub fn naming(mut self, naming: OutputNaming) -> Self {
        self.naming = naming;
        self
    }

    pub fn mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    /// Output path for a test generated from `function` in `source`.
    pub fn path_for(&self, source: &Path, function: &str) -> PathBuf {
        let dir = match &self.out_dir {
            Some(dir) => dir.clone(),
            None => source.parent().map(Path::to_path_buf).unwrap_or_default(),
        };
        let stem = match self.naming {
            OutputNaming::PerFunction => function.to_string(),
            OutputNaming::PerSource => source
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| function.to_string()),
        };
        dir.join(test_file_name(&stem))
    }

    /// Write `contents` to `path` according to the configured mode.
    pub fn write(&self, path: &Path, contents: &str) -> anyhow::Result<WriteResult> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let existed = path.exists();
        let result = match (self.mode, existed) {
            (_, false) => {
                fs::write(path, contents)?;
                WriteResult::Created
            }
            (WriteMode::Overwrite, true) => {
                fs::write(path, contents)?;
                WriteResult::Overwritten
            }
            (WriteMode::Append, true) => {
                let previous = fs::read_to_string(path)?;
                let mut file = OpenOptions::new().append(true).open(path)?;
                if !previous.is_empty() {
                    if !previous.ends_with('\n') {
                        file.write_all(b"\n")?;
                    }
                    file.write_all(b"\n")?;
                }
                file.write_all(contents.as_bytes())?;
                WriteResult::Appended
            }
        };

        tracing::debug!(path = %path.display(), result = result.as_str(), "wrote test file");
        Ok(result)
    }
}
