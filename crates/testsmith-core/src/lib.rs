//! Testsmith core domain types and errors.

mod error;
mod types;

pub use error::ExtractError;
pub use types::{
    ExtractedFunctions, FunctionKind, FunctionSpan, FunctionTable, MatchPolicy, SourceUnit,
};
