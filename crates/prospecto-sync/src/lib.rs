pub mod csv;
pub mod error;
pub mod tabular;
pub mod whatsapp;
#[cfg(feature = "xlsx-import")]
pub mod xlsx;

pub use error::{Result, SyncError};
pub use tabular::{extract_candidate, Cell, LeadCandidate, Row, DEFAULT_SOURCE};
pub use whatsapp::{split_message, MessageTransport, SendReceipt};
