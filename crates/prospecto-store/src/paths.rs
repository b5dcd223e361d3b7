use crate::error::{Result, StoreError};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "prospecto";
const JSON_DB_FILENAME: &str = "leads.json";
const SQLITE_DB_FILENAME: &str = "prospecto.sqlite3";
const JSON_BACKUP_EXPORT: &str = "prospecto-backup.json";
const SQLITE_BACKUP_EXPORT: &str = "prospecto-backup.sqlite3";

pub fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os("XDG_DATA_HOME") {
        let path = PathBuf::from(dir);
        if path.as_os_str().is_empty() {
            return Err(StoreError::InvalidDataPath(path));
        }
        return Ok(path.join(APP_DIR));
    }

    let home = dirs::home_dir().ok_or(StoreError::MissingHomeDir)?;
    Ok(home.join(".local").join("share").join(APP_DIR))
}

pub fn ensure_data_dir() -> Result<PathBuf> {
    let dir = data_dir()?;
    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }
    restrict_dir_permissions(&dir)?;
    Ok(dir)
}

pub fn json_db_path() -> Result<PathBuf> {
    Ok(ensure_data_dir()?.join(JSON_DB_FILENAME))
}

pub fn sqlite_db_path() -> Result<PathBuf> {
    Ok(ensure_data_dir()?.join(SQLITE_DB_FILENAME))
}

/// Default target for the operator-triggered `backup` command, per backend.
pub fn default_json_backup_path() -> Result<PathBuf> {
    Ok(ensure_data_dir()?.join(JSON_BACKUP_EXPORT))
}

pub fn default_sqlite_backup_path() -> Result<PathBuf> {
    Ok(ensure_data_dir()?.join(SQLITE_BACKUP_EXPORT))
}

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
pub(crate) fn restrict_file_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    if path.exists() {
        let perms = fs::Permissions::from_mode(0o600);
        fs::set_permissions(path, perms)?;
    }
    Ok(())
}

#[cfg(not(unix))]
pub(crate) fn restrict_file_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(unix)]
fn restrict_dir_permissions(dir: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let perms = fs::Permissions::from_mode(0o700);
    fs::set_permissions(dir, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_dir_permissions(_dir: &Path) -> Result<()> {
    Ok(())
}
