use crate::error::{Result, StoreError};
use prospecto_core::domain::{LeadId, Message, MessageId, MessageSender};
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::str::FromStr;

pub struct MessagesRepo<'a> {
    conn: &'a Connection,
}

impl<'a> MessagesRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, lead_id: LeadId, message: &Message) -> Result<()> {
        self.conn.execute(
            "INSERT INTO messages (id, lead_id, sender, content, sent_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                message.id.to_string(),
                lead_id.to_string(),
                message.sender.as_str(),
                message.content,
                message.sent_at,
            ],
        )?;
        Ok(())
    }

    /// Chronological by insertion; rowid breaks same-second ties.
    pub fn list_for_lead(&self, lead_id: LeadId) -> Result<Vec<Message>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, sender, content, sent_at FROM messages
             WHERE lead_id = ?1
             ORDER BY sent_at ASC, rowid ASC;",
        )?;
        let mut rows = stmt.query([lead_id.to_string()])?;
        let mut messages = Vec::new();
        while let Some(row) = rows.next()? {
            messages.push(message_from_row(row, 0)?);
        }
        Ok(messages)
    }

    pub fn list_for_all(&self) -> Result<HashMap<LeadId, Vec<Message>>> {
        let mut stmt = self.conn.prepare(
            "SELECT lead_id, id, sender, content, sent_at FROM messages
             ORDER BY lead_id ASC, sent_at ASC, rowid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut map: HashMap<LeadId, Vec<Message>> = HashMap::new();
        while let Some(row) = rows.next()? {
            let lead_id_raw: String = row.get(0)?;
            let lead_id = LeadId::from_str(&lead_id_raw)
                .map_err(|_| StoreError::InvalidId(lead_id_raw.clone()))?;
            map.entry(lead_id).or_default().push(message_from_row(row, 1)?);
        }
        Ok(map)
    }
}

fn message_from_row(row: &rusqlite::Row<'_>, offset: usize) -> Result<Message> {
    let id_str: String = row.get(offset)?;
    let id = MessageId::from_str(&id_str).map_err(|_| StoreError::InvalidId(id_str.clone()))?;
    let sender_raw: String = row.get(offset + 1)?;
    let sender = MessageSender::parse(&sender_raw)?;
    Ok(Message {
        id,
        sender,
        content: row.get(offset + 2)?,
        sent_at: row.get(offset + 3)?,
    })
}
