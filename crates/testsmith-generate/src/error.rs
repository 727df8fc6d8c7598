/// Errors surfaced by the text-generation service.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("missing API key: set {0}")]
    MissingApiKey(&'static str),

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid function name `{0}`")]
    InvalidName(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("response parse error: {0}")]
    Decode(String),

    #[error("response contained no content")]
    EmptyResponse,
}
