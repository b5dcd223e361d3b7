use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "prospecto";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_IMPORT_TAG: &str = "imported";

/// Storage strategy, decided once at process start and injected into every
/// call site. Never re-read from the environment after startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Json,
    Sqlite,
}

impl StorageBackend {
    pub const fn as_str(self) -> &'static str {
        match self {
            StorageBackend::Json => "json",
            StorageBackend::Sqlite => "sqlite",
        }
    }

    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "json" => Ok(StorageBackend::Json),
            "sqlite" => Ok(StorageBackend::Sqlite),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub import: ImportConfig,
    pub whatsapp: WhatsAppConfig,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
}

#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Tag stamped onto every imported lead.
    pub tag: String,
    /// Drop rows whose extracted name, email, and phone are all empty.
    pub skip_empty: bool,
}

#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    pub enabled: bool,
    pub phone_number_id: String,
    pub access_token: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig {
                backend: StorageBackend::Json,
            },
            import: ImportConfig {
                tag: DEFAULT_IMPORT_TAG.to_string(),
                skip_empty: false,
            },
            whatsapp: WhatsAppConfig {
                enabled: false,
                phone_number_id: String::new(),
                access_token: String::new(),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("unknown storage backend: {0}")]
    UnknownBackend(String),
    #[error("import tag cannot be empty")]
    EmptyImportTag,
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    storage: Option<StorageFile>,
    import: Option<ImportFile>,
    whatsapp: Option<WhatsAppFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StorageFile {
    backend: Option<StorageBackend>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ImportFile {
    tag: Option<String>,
    skip_empty: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WhatsAppFile {
    enabled: Option<bool>,
    phone_number_id: Option<String>,
    access_token: Option<String>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path.clone()) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(storage) = parsed.storage {
        if let Some(backend) = storage.backend {
            config.storage.backend = backend;
        }
    }

    if let Some(import) = parsed.import {
        if let Some(tag) = import.tag {
            if tag.trim().is_empty() {
                return Err(ConfigError::EmptyImportTag);
            }
            config.import.tag = tag.trim().to_string();
        }
        if let Some(skip_empty) = import.skip_empty {
            config.import.skip_empty = skip_empty;
        }
    }

    if let Some(whatsapp) = parsed.whatsapp {
        if let Some(enabled) = whatsapp.enabled {
            config.whatsapp.enabled = enabled;
        }
        if let Some(phone_number_id) = whatsapp.phone_number_id {
            config.whatsapp.phone_number_id = phone_number_id;
        }
        if let Some(access_token) = whatsapp.access_token {
            config.whatsapp.access_token = access_token;
        }
    }

    Ok(config)
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_at_path, ConfigError, StorageBackend};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn restrict_permissions(path: &Path) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path).expect("metadata").permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms).expect("chmod");
        }
    }

    #[test]
    fn load_applies_values() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[storage]\nbackend = \"sqlite\"\n\n[import]\ntag = \"bulk\"\nskip_empty = true\n",
        )
        .expect("write config");
        restrict_permissions(&path);

        let config = load_at_path(&path, true)
            .expect("load config")
            .expect("config present");
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.import.tag, "bulk");
        assert!(config.import.skip_empty);
        assert!(!config.whatsapp.enabled);
    }

    #[test]
    fn load_rejects_unknown_keys() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "[storage]\nengine = \"sqlite\"\n").expect("write config");
        restrict_permissions(&path);

        let err = load_at_path(&path, true).expect_err("parse should fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_rejects_empty_import_tag() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "[import]\ntag = \"  \"\n").expect("write config");
        restrict_permissions(&path);

        let err = load_at_path(&path, true).expect_err("empty tag");
        assert!(matches!(err, ConfigError::EmptyImportTag));
    }

    #[test]
    fn missing_file_is_required_only_with_explicit_path() {
        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("absent.toml");

        assert!(load_at_path(&path, false).expect("optional load").is_none());
        let err = load_at_path(&path, true).expect_err("required load");
        assert!(matches!(err, ConfigError::MissingConfigFile(_)));
    }

    #[cfg(unix)]
    #[test]
    fn load_rejects_world_readable_config() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().expect("temp dir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "[storage]\nbackend = \"json\"\n").expect("write config");
        let mut perms = fs::metadata(&path).expect("metadata").permissions();
        perms.set_mode(0o644);
        fs::set_permissions(&path, perms).expect("chmod");

        let err = load_at_path(&path, true).expect_err("insecure perms");
        assert!(matches!(err, ConfigError::InsecurePermissions(_)));
    }

    #[test]
    fn backend_parse() {
        assert_eq!(
            StorageBackend::parse("json").expect("json"),
            StorageBackend::Json
        );
        assert_eq!(
            StorageBackend::parse("sqlite").expect("sqlite"),
            StorageBackend::Sqlite
        );
        assert!(StorageBackend::parse("postgres").is_err());
    }
}
