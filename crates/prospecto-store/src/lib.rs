pub mod error;
pub mod json;
pub mod paths;
pub mod repo;
pub mod sqlite;
pub(crate) mod db;
pub(crate) mod migrate;

use crate::error::Result;
use prospecto_core::domain::{Lead, LeadId, LeadPriority, LeadStatus, Message, MessageId, MessageSender};
use std::path::Path;

pub use json::JsonStore;
pub use sqlite::SqliteStore;

#[derive(Debug, Clone)]
pub struct LeadNew {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub source: String,
    pub status: LeadStatus,
    pub priority: LeadPriority,
    pub interest_cycle: Option<String>,
    pub business_unit: Option<String>,
    pub tags: Vec<String>,
    pub observations: String,
    pub scheduled_at: Option<i64>,
    pub history: Vec<MessageNew>,
}

impl Default for LeadNew {
    fn default() -> Self {
        Self {
            name: String::new(),
            phone: String::new(),
            email: String::new(),
            source: String::new(),
            status: LeadStatus::default(),
            priority: LeadPriority::default(),
            interest_cycle: None,
            business_unit: None,
            tags: Vec::new(),
            observations: String::new(),
            scheduled_at: None,
            history: Vec::new(),
        }
    }
}

/// Partial update. There is deliberately no `history` field here: message
/// history only ever grows through `LeadStore::append_message`.
#[derive(Debug, Clone, Default)]
pub struct LeadUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub source: Option<String>,
    pub status: Option<LeadStatus>,
    pub priority: Option<LeadPriority>,
    pub interest_cycle: Option<Option<String>>,
    pub business_unit: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    pub observations: Option<String>,
    pub scheduled_at: Option<Option<i64>>,
    pub has_unread_messages: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct MessageNew {
    pub sender: MessageSender,
    pub content: String,
    pub sent_at: i64,
}

/// Storage contract shared by both backends. The backend is chosen once at
/// process start and handed to call sites as `&dyn LeadStore`.
///
/// Absence is a sentinel, never an error: `update`/`get_by_id` return `None`
/// and `delete` returns `false` for an unknown id, so callers can tell
/// "nothing there" apart from "the store is broken".
pub trait LeadStore {
    /// Stable order; the SQLite backend sorts by creation time descending,
    /// the JSON backend preserves document order.
    fn get_all(&self) -> Result<Vec<Lead>>;
    fn get_by_id(&self, id: LeadId) -> Result<Option<Lead>>;
    fn create(&self, now_utc: i64, input: LeadNew) -> Result<Lead>;
    fn update(&self, now_utc: i64, id: LeadId, update: LeadUpdate) -> Result<Option<Lead>>;
    fn delete(&self, id: LeadId) -> Result<bool>;
    fn append_message(&self, now_utc: i64, id: LeadId, input: MessageNew)
        -> Result<Option<Message>>;
    fn mark_read(&self, now_utc: i64, id: LeadId) -> Result<Option<Lead>>;
    fn backup_to(&self, path: &Path) -> Result<()>;
}

pub(crate) fn build_lead(now_utc: i64, input: LeadNew) -> Lead {
    Lead {
        id: LeadId::new(),
        name: input.name,
        phone: input.phone,
        email: input.email,
        source: input.source,
        status: input.status,
        priority: input.priority,
        interest_cycle: input.interest_cycle,
        business_unit: input.business_unit,
        tags: input.tags,
        observations: input.observations,
        scheduled_at: input.scheduled_at,
        has_unread_messages: false,
        history: input.history.into_iter().map(build_message).collect(),
        created_at: now_utc,
        updated_at: now_utc,
    }
}

pub(crate) fn build_message(input: MessageNew) -> Message {
    Message {
        id: MessageId::new(),
        sender: input.sender,
        content: input.content,
        sent_at: input.sent_at,
    }
}

pub(crate) fn apply_update(lead: &mut Lead, update: LeadUpdate, now_utc: i64) {
    if let Some(value) = update.name {
        lead.name = value;
    }
    if let Some(value) = update.phone {
        lead.phone = value;
    }
    if let Some(value) = update.email {
        lead.email = value;
    }
    if let Some(value) = update.source {
        lead.source = value;
    }
    if let Some(value) = update.status {
        lead.status = value;
    }
    if let Some(value) = update.priority {
        lead.priority = value;
    }
    if let Some(value) = update.interest_cycle {
        lead.interest_cycle = value;
    }
    if let Some(value) = update.business_unit {
        lead.business_unit = value;
    }
    if let Some(value) = update.tags {
        lead.tags = value;
    }
    if let Some(value) = update.observations {
        lead.observations = value;
    }
    if let Some(value) = update.scheduled_at {
        lead.scheduled_at = value;
    }
    if let Some(value) = update.has_unread_messages {
        lead.has_unread_messages = value;
    }
    lead.updated_at = now_utc;
}
