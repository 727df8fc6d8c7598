//! Output rendering (JSONL and plain text) and test-file persistence.

mod jsonl;
mod text;
mod writer;

pub use jsonl::{FileFunctions, JsonlWriter};
pub use text::render_table;
pub use writer::{
    GO_EXTENSION, OutputNaming, TEST_MARKER, TestFileWriter, WriteMode, WriteResult,
    test_file_name,
};
