use crate::domain::ids::LeadId;
use crate::domain::message::Message;
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

/// Pipeline stages, in kanban order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
    Cleaned,
    Contacted,
    InConversation,
    Scheduled,
    NoShow,
    Rescheduled,
    Enrolled,
    NotEnrolled,
}

impl Default for LeadStatus {
    fn default() -> Self {
        LeadStatus::New
    }
}

impl LeadStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Cleaned => "cleaned",
            LeadStatus::Contacted => "contacted",
            LeadStatus::InConversation => "in_conversation",
            LeadStatus::Scheduled => "scheduled",
            LeadStatus::NoShow => "no_show",
            LeadStatus::Rescheduled => "rescheduled",
            LeadStatus::Enrolled => "enrolled",
            LeadStatus::NotEnrolled => "not_enrolled",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "new" => Ok(LeadStatus::New),
            "cleaned" => Ok(LeadStatus::Cleaned),
            "contacted" => Ok(LeadStatus::Contacted),
            "in_conversation" => Ok(LeadStatus::InConversation),
            "scheduled" => Ok(LeadStatus::Scheduled),
            "no_show" => Ok(LeadStatus::NoShow),
            "rescheduled" => Ok(LeadStatus::Rescheduled),
            "enrolled" => Ok(LeadStatus::Enrolled),
            "not_enrolled" => Ok(LeadStatus::NotEnrolled),
            other => Err(CoreError::InvalidStatus(other.to_string())),
        }
    }

    pub const fn all() -> &'static [LeadStatus] {
        &[
            LeadStatus::New,
            LeadStatus::Cleaned,
            LeadStatus::Contacted,
            LeadStatus::InConversation,
            LeadStatus::Scheduled,
            LeadStatus::NoShow,
            LeadStatus::Rescheduled,
            LeadStatus::Enrolled,
            LeadStatus::NotEnrolled,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadPriority {
    Hot,
    Warm,
    Cold,
}

impl Default for LeadPriority {
    fn default() -> Self {
        LeadPriority::Warm
    }
}

impl LeadPriority {
    pub const fn as_str(self) -> &'static str {
        match self {
            LeadPriority::Hot => "hot",
            LeadPriority::Warm => "warm",
            LeadPriority::Cold => "cold",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "hot" => Ok(LeadPriority::Hot),
            "warm" => Ok(LeadPriority::Warm),
            "cold" => Ok(LeadPriority::Cold),
            other => Err(CoreError::InvalidPriority(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub source: String,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default)]
    pub priority: LeadPriority,
    #[serde(default)]
    pub interest_cycle: Option<String>,
    #[serde(default)]
    pub business_unit: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub observations: String,
    #[serde(default)]
    pub scheduled_at: Option<i64>,
    #[serde(default)]
    pub has_unread_messages: bool,
    #[serde(default)]
    pub history: Vec<Message>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Lead {
    /// True when at least one of name, email, or phone carries data.
    pub fn has_contact_fields(&self) -> bool {
        !self.name.trim().is_empty()
            || !self.email.trim().is_empty()
            || !self.phone.trim().is_empty()
    }
}
