use crate::error::{Result, StoreError};
use crate::paths;
use crate::{apply_update, build_lead, build_message, LeadNew, LeadStore, LeadUpdate, MessageNew};
use prospecto_core::domain::{Lead, LeadId, Message, MessageSender};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const SCHEMA_VERSION: u32 = 1;

/// File-backed store: one pretty-printed JSON document plus a
/// single-generation backup taken immediately before every overwrite.
///
/// There is no locking. Two writers racing through read-copy-mutate-write can
/// lose the slower one's update (last writer wins, and the backup reflects
/// whichever write read first). That matches the low-volume interactive usage
/// this store is meant for; do not paper over it with a mutex here.
pub struct JsonStore {
    path: PathBuf,
    backup_path: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default)]
    leads: Vec<Lead>,
    #[serde(default)]
    settings: Settings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Settings {
    #[serde(default = "default_schema_version")]
    schema_version: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
        }
    }
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl JsonStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        paths::ensure_parent_dir(&path)?;
        let backup_path = backup_path_for(&path);
        Ok(Self { path, backup_path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup_path
    }

    fn read_document(&self) -> Result<Document> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Document::default()),
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_str(&raw) {
            Ok(document) => Ok(document),
            Err(_) => self.read_backup_document(),
        }
    }

    // One recovery generation. If the backup is also unreadable this is
    // fatal; returning an empty document here would mask data loss.
    fn read_backup_document(&self) -> Result<Document> {
        let raw = fs::read_to_string(&self.backup_path)
            .map_err(|_| StoreError::Corrupt(self.path.clone()))?;
        serde_json::from_str(&raw).map_err(|_| StoreError::Corrupt(self.path.clone()))
    }

    fn write_document(&self, document: &Document) -> Result<()> {
        paths::ensure_parent_dir(&self.path)?;

        if self.path.exists() {
            fs::copy(&self.path, &self.backup_path)?;
            paths::restrict_file_permissions(&self.backup_path)?;
        }

        let raw = serde_json::to_string_pretty(document)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        paths::restrict_file_permissions(&self.path)?;
        Ok(())
    }
}

impl LeadStore for JsonStore {
    fn get_all(&self) -> Result<Vec<Lead>> {
        Ok(self.read_document()?.leads)
    }

    fn get_by_id(&self, id: LeadId) -> Result<Option<Lead>> {
        let document = self.read_document()?;
        Ok(document.leads.into_iter().find(|lead| lead.id == id))
    }

    fn create(&self, now_utc: i64, input: LeadNew) -> Result<Lead> {
        let mut document = self.read_document()?;
        let lead = build_lead(now_utc, input);
        document.leads.push(lead.clone());
        self.write_document(&document)?;
        Ok(lead)
    }

    fn update(&self, now_utc: i64, id: LeadId, update: LeadUpdate) -> Result<Option<Lead>> {
        let mut document = self.read_document()?;
        let Some(lead) = document.leads.iter_mut().find(|lead| lead.id == id) else {
            return Ok(None);
        };

        apply_update(lead, update, now_utc);
        let updated = lead.clone();
        self.write_document(&document)?;
        Ok(Some(updated))
    }

    fn delete(&self, id: LeadId) -> Result<bool> {
        let mut document = self.read_document()?;
        let before = document.leads.len();
        document.leads.retain(|lead| lead.id != id);
        if document.leads.len() == before {
            return Ok(false);
        }

        self.write_document(&document)?;
        Ok(true)
    }

    fn append_message(
        &self,
        now_utc: i64,
        id: LeadId,
        input: MessageNew,
    ) -> Result<Option<Message>> {
        let mut document = self.read_document()?;
        let Some(lead) = document.leads.iter_mut().find(|lead| lead.id == id) else {
            return Ok(None);
        };

        let message = build_message(input);
        lead.history.push(message.clone());
        if message.sender == MessageSender::Prospect {
            lead.has_unread_messages = true;
        }
        lead.updated_at = now_utc;
        self.write_document(&document)?;
        Ok(Some(message))
    }

    fn mark_read(&self, now_utc: i64, id: LeadId) -> Result<Option<Lead>> {
        self.update(
            now_utc,
            id,
            LeadUpdate {
                has_unread_messages: Some(false),
                ..Default::default()
            },
        )
    }

    fn backup_to(&self, path: &Path) -> Result<()> {
        if path == self.path || path == self.backup_path {
            return Err(StoreError::InvalidBackupPath(path.to_path_buf()));
        }

        paths::ensure_parent_dir(path)?;
        let document = self.read_document()?;
        let raw = serde_json::to_string_pretty(&document)?;
        fs::write(path, raw)?;
        Ok(())
    }
}

fn backup_path_for(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("leads");
    path.with_file_name(format!("{stem}.backup.json"))
}

#[cfg(test)]
mod tests {
    use super::backup_path_for;
    use std::path::Path;

    #[test]
    fn backup_path_sits_next_to_primary() {
        let backup = backup_path_for(Path::new("/data/leads.json"));
        assert_eq!(backup, Path::new("/data/leads.backup.json"));
    }
}
