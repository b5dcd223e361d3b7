use anyhow::Result;
use prospecto_config::{AppConfig, StorageBackend};
use prospecto_store::LeadStore;
use serde::Serialize;
use std::io::{self, Write};

pub mod backup;
pub mod catalog;
pub mod completions;
pub mod import;
pub mod leads;
pub mod messages;
pub mod pipeline;

pub struct Context<'a> {
    pub store: &'a dyn LeadStore,
    pub json: bool,
    pub config: &'a AppConfig,
    pub backend: StorageBackend,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
