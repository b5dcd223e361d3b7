use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("lead name is required")]
    EmptyName,
    #[error("phone must contain at least {required} digits, got {actual}")]
    PhoneTooShort { required: usize, actual: usize },
    #[error("unknown source code: {0}")]
    UnknownSource(String),
    #[error("unknown business unit: {0}")]
    UnknownBusinessUnit(String),
    #[error("invalid pipeline status: {0}")]
    InvalidStatus(String),
    #[error("invalid priority: {0}")]
    InvalidPriority(String),
    #[error("invalid message sender: {0}")]
    InvalidSender(String),
    #[error("message content cannot be empty")]
    EmptyMessage,
}
