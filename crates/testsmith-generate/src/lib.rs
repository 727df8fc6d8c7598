//! Text-generation collaborator: sends extracted Go functions (or a diff) to
//! a chat-completions API and returns the reply.
//!
//! Nothing here retries, rate-limits, or caches. A [`ServiceError`] is
//! handed straight back to the caller.

mod client;
mod config;
mod error;
pub mod prompt;

pub use client::{DiffAnalyzer, OpenAiClient, TestGenerator, is_valid_function_name};
pub use config::{
    API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS,
    GeneratorConfig, MODEL_ENV, TIMEOUT_ENV,
};
pub use error::ServiceError;
pub use prompt::strip_code_fence;
