pub mod email;
pub mod ids;
pub mod lead;
pub mod message;
pub mod name;
pub mod phone;
pub mod source;
pub mod unit;

pub use email::normalize_email;
pub use ids::{LeadId, MessageId};
pub use lead::{Lead, LeadPriority, LeadStatus};
pub use message::{Message, MessageSender};
pub use name::normalize_name;
pub use phone::normalize_phone;
pub use source::{is_source_code, source_name, SOURCE_CATALOG};
pub use unit::{business_unit, BusinessUnit, BUSINESS_UNITS};
