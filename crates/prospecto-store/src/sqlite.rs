use crate::db;
use crate::error::{Result, StoreError};
use crate::migrate;
use crate::paths;
use crate::repo::{LeadsRepo, MessagesRepo};
use crate::{build_lead, build_message, LeadNew, LeadStore, LeadUpdate, MessageNew};
use prospecto_core::domain::{Lead, LeadId, Message, MessageSender};
use rusqlite::backup::Backup;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const PAGES_PER_STEP: i32 = 200;
const PAUSE_BETWEEN_STEPS: Duration = Duration::from_millis(25);

/// Relational store: leads and their message histories as two tables joined
/// by a foreign key. Concurrency control is the engine's job.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = db::open(path)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = db::open_in_memory()?;
        Ok(Self { conn })
    }

    pub fn migrate(&self) -> Result<()> {
        migrate::run_migrations(&self.conn)
    }

    pub fn schema_version(&self) -> Result<i64> {
        migrate::schema_version(&self.conn)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn leads(&self) -> LeadsRepo<'_> {
        LeadsRepo::new(&self.conn)
    }

    fn messages(&self) -> MessagesRepo<'_> {
        MessagesRepo::new(&self.conn)
    }
}

impl LeadStore for SqliteStore {
    fn get_all(&self) -> Result<Vec<Lead>> {
        let mut leads = self.leads().list_all()?;
        let mut histories = self.messages().list_for_all()?;
        for lead in &mut leads {
            if let Some(history) = histories.remove(&lead.id) {
                lead.history = history;
            }
        }
        Ok(leads)
    }

    fn get_by_id(&self, id: LeadId) -> Result<Option<Lead>> {
        let Some(mut lead) = self.leads().get(id)? else {
            return Ok(None);
        };
        lead.history = self.messages().list_for_lead(id)?;
        Ok(Some(lead))
    }

    fn create(&self, now_utc: i64, input: LeadNew) -> Result<Lead> {
        let lead = build_lead(now_utc, input);

        let tx = self.conn.unchecked_transaction()?;
        LeadsRepo::new(&tx).insert(&lead)?;
        let messages = MessagesRepo::new(&tx);
        for message in &lead.history {
            messages.insert(lead.id, message)?;
        }
        tx.commit()?;

        Ok(lead)
    }

    fn update(&self, now_utc: i64, id: LeadId, update: LeadUpdate) -> Result<Option<Lead>> {
        let tx = self.conn.unchecked_transaction()?;
        let updated = LeadsRepo::new(&tx).update(now_utc, id, update)?;
        tx.commit()?;

        let Some(mut lead) = updated else {
            return Ok(None);
        };
        lead.history = self.messages().list_for_lead(id)?;
        Ok(Some(lead))
    }

    fn delete(&self, id: LeadId) -> Result<bool> {
        self.leads().delete(id)
    }

    fn append_message(
        &self,
        now_utc: i64,
        id: LeadId,
        input: MessageNew,
    ) -> Result<Option<Message>> {
        let tx = self.conn.unchecked_transaction()?;
        if !LeadsRepo::new(&tx).exists(id)? {
            return Ok(None);
        }

        let message = build_message(input);
        MessagesRepo::new(&tx).insert(id, &message)?;
        if message.sender == MessageSender::Prospect {
            LeadsRepo::new(&tx).set_unread(now_utc, id, true)?;
        } else {
            tx.execute(
                "UPDATE leads SET updated_at = ?2 WHERE id = ?1;",
                rusqlite::params![id.to_string(), now_utc],
            )?;
        }
        tx.commit()?;

        Ok(Some(message))
    }

    fn mark_read(&self, now_utc: i64, id: LeadId) -> Result<Option<Lead>> {
        if !self.leads().set_unread(now_utc, id, false)? {
            return Ok(None);
        }
        self.get_by_id(id)
    }

    fn backup_to(&self, path: &Path) -> Result<()> {
        paths::ensure_parent_dir(path)?;
        let target = canonicalize_path(path)?;
        if let Some(main_path) = main_db_path(&self.conn)? {
            let main_target = canonicalize_path(&main_path)?;
            if main_target == target || is_sidecar_path(&target, &main_target) {
                return Err(StoreError::InvalidBackupPath(path.to_path_buf()));
            }
        }

        let mut dest = Connection::open(&target)?;
        let backup = Backup::new(&self.conn, &mut dest)?;
        backup.run_to_completion(PAGES_PER_STEP, PAUSE_BETWEEN_STEPS, None)?;
        paths::restrict_file_permissions(&target)?;
        Ok(())
    }
}

fn canonicalize_path(path: &Path) -> Result<PathBuf> {
    if path.exists() {
        return Ok(fs::canonicalize(path)?);
    }
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let parent = fs::canonicalize(parent)?;
    let file_name = path
        .file_name()
        .ok_or_else(|| StoreError::InvalidBackupPath(path.to_path_buf()))?;
    Ok(parent.join(file_name))
}

fn main_db_path(conn: &Connection) -> Result<Option<PathBuf>> {
    let mut stmt = conn.prepare("PRAGMA database_list;")?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let name: String = row.get(1)?;
        let file: String = row.get(2)?;
        if name == "main" && !file.is_empty() {
            return Ok(Some(PathBuf::from(file)));
        }
    }
    Ok(None)
}

fn is_sidecar_path(target: &Path, main: &Path) -> bool {
    let mut wal = main.as_os_str().to_owned();
    wal.push("-wal");
    let mut shm = main.as_os_str().to_owned();
    shm.push("-shm");
    target == Path::new(&wal) || target == Path::new(&shm)
}
