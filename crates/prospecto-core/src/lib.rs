pub mod dedup;
pub mod domain;
pub mod dto;
pub mod error;
pub mod rules;

pub use dedup::{is_duplicate, DedupIndex};
pub use domain::*;
pub use dto::*;
pub use error::CoreError;
pub use rules::{validate_business_unit, validate_manual_entry, validate_source, MIN_PHONE_DIGITS};
