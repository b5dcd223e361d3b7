use prospecto_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("transport unavailable: {0}")]
    Unavailable(String),
    #[cfg(feature = "whatsapp-send")]
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[cfg(feature = "whatsapp-send")]
    #[error("whatsapp api error {status}: {body}")]
    Api { status: u16, body: String },
}

pub type Result<T> = std::result::Result<T, SyncError>;
