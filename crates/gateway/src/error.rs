use thiserror::Error;

pub type Result<T> = std::result::Result<T, GatewayError>;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Upstream returned {code}: {body}")]
    Status { code: u16, body: String },

    #[error("Decode error: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Status code of the upstream reply, when the request got that far.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            GatewayError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}
