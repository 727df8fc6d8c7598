/// Errors that can occur while locating or extracting functions.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("parse error at {line}:{column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("none of the requested functions were found: {}", .requested.join(", "))]
    NotFound { requested: Vec<String> },

    #[error("span {start}..{end} of `{name}` is outside the source ({len} bytes)")]
    SpanOutOfBounds {
        name: String,
        start: usize,
        end: usize,
        len: usize,
    },
}

impl ExtractError {
    /// True for the "no requested function matched" case, which callers may
    /// choose to treat as a skip rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

impl From<std::io::Error> for ExtractError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
