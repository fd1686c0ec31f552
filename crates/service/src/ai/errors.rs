use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("model request failed: {0}")]
    Request(String),
    #[error("model API error (status {status}): {message}")]
    Api { status: u16, message: String },
    #[error("model returned no usable content")]
    EmptyResponse,
    #[error("could not parse model output: {0}")]
    Parse(String),
}
