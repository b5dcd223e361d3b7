use crate::domain::{LeadId, LeadPriority, LeadStatus, MessageId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadListItemDto {
    pub id: LeadId,
    pub name: String,
    pub phone: String,
    pub status: LeadStatus,
    pub priority: LeadPriority,
    pub scheduled_at: Option<i64>,
    pub tags: Vec<String>,
    pub has_unread_messages: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageDto {
    pub id: MessageId,
    pub sender: String,
    pub content: String,
    pub sent_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadDetailDto {
    pub id: LeadId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub source: String,
    pub source_name: String,
    pub status: LeadStatus,
    pub priority: LeadPriority,
    pub interest_cycle: Option<String>,
    pub business_unit: Option<String>,
    pub tags: Vec<String>,
    pub observations: String,
    pub scheduled_at: Option<i64>,
    pub has_unread_messages: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub history: Vec<MessageDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardColumnDto {
    pub status: LeadStatus,
    pub count: usize,
}
