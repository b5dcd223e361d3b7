use crate::error::{Result, StoreError};
use crate::{apply_update, LeadUpdate};
use prospecto_core::domain::{Lead, LeadId, LeadPriority, LeadStatus};
use rusqlite::{params, Connection};
use std::str::FromStr;

const LEAD_COLUMNS: &str = "id, name, phone, email, source, status, priority, interest_cycle, \
     business_unit, tags, observations, scheduled_at, has_unread_messages, created_at, updated_at";

pub struct LeadsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> LeadsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, lead: &Lead) -> Result<()> {
        self.conn.execute(
            "INSERT INTO leads (id, name, phone, email, source, status, priority, interest_cycle, \
             business_unit, tags, observations, scheduled_at, has_unread_messages, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15);",
            params![
                lead.id.to_string(),
                lead.name,
                lead.phone,
                lead.email,
                lead.source,
                lead.status.as_str(),
                lead.priority.as_str(),
                lead.interest_cycle,
                lead.business_unit,
                serde_json::to_string(&lead.tags)?,
                lead.observations,
                lead.scheduled_at,
                lead.has_unread_messages,
                lead.created_at,
                lead.updated_at,
            ],
        )?;
        Ok(())
    }

    /// Fetched without history; the caller attaches messages.
    pub fn get(&self, id: LeadId) -> Result<Option<Lead>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {LEAD_COLUMNS} FROM leads WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(lead_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn list_all(&self) -> Result<Vec<Lead>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {LEAD_COLUMNS} FROM leads ORDER BY created_at DESC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut leads = Vec::new();
        while let Some(row) = rows.next()? {
            leads.push(lead_from_row(row)?);
        }
        Ok(leads)
    }

    pub fn update(&self, now_utc: i64, id: LeadId, update: LeadUpdate) -> Result<Option<Lead>> {
        let Some(mut lead) = self.get(id)? else {
            return Ok(None);
        };

        apply_update(&mut lead, update, now_utc);

        self.conn.execute(
            "UPDATE leads SET name = ?2, phone = ?3, email = ?4, source = ?5, status = ?6, \
             priority = ?7, interest_cycle = ?8, business_unit = ?9, tags = ?10, \
             observations = ?11, scheduled_at = ?12, has_unread_messages = ?13, updated_at = ?14
             WHERE id = ?1;",
            params![
                lead.id.to_string(),
                lead.name,
                lead.phone,
                lead.email,
                lead.source,
                lead.status.as_str(),
                lead.priority.as_str(),
                lead.interest_cycle,
                lead.business_unit,
                serde_json::to_string(&lead.tags)?,
                lead.observations,
                lead.scheduled_at,
                lead.has_unread_messages,
                lead.updated_at,
            ],
        )?;

        Ok(Some(lead))
    }

    /// Message rows go with the lead via ON DELETE CASCADE.
    pub fn delete(&self, id: LeadId) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM leads WHERE id = ?1;", [id.to_string()])?;
        Ok(deleted > 0)
    }

    pub fn exists(&self, id: LeadId) -> Result<bool> {
        let mut stmt = self.conn.prepare("SELECT 1 FROM leads WHERE id = ?1;")?;
        let mut rows = stmt.query([id.to_string()])?;
        Ok(rows.next()?.is_some())
    }

    pub fn set_unread(&self, now_utc: i64, id: LeadId, unread: bool) -> Result<bool> {
        let updated = self.conn.execute(
            "UPDATE leads SET has_unread_messages = ?2, updated_at = ?3 WHERE id = ?1;",
            params![id.to_string(), unread, now_utc],
        )?;
        Ok(updated > 0)
    }
}

fn lead_from_row(row: &rusqlite::Row<'_>) -> Result<Lead> {
    let id_str: String = row.get(0)?;
    let id = LeadId::from_str(&id_str).map_err(|_| StoreError::InvalidId(id_str.clone()))?;
    let status_raw: String = row.get(5)?;
    let status = LeadStatus::parse(&status_raw)?;
    let priority_raw: String = row.get(6)?;
    let priority = LeadPriority::parse(&priority_raw)?;
    let tags_raw: String = row.get(9)?;
    let tags: Vec<String> = serde_json::from_str(&tags_raw)?;

    Ok(Lead {
        id,
        name: row.get(1)?,
        phone: row.get(2)?,
        email: row.get(3)?,
        source: row.get(4)?,
        status,
        priority,
        interest_cycle: row.get(7)?,
        business_unit: row.get(8)?,
        tags,
        observations: row.get(10)?,
        scheduled_at: row.get(11)?,
        has_unread_messages: row.get(12)?,
        history: Vec::new(),
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}
