use crate::commands::{print_json, Context};
use crate::util::now_utc;
use anyhow::{Context as _, Result};
use clap::{ArgAction, Args};
use prospecto_core::dedup::DedupIndex;
use prospecto_core::domain::{normalize_email, normalize_name, normalize_phone};
use prospecto_store::LeadNew;
use prospecto_sync::csv::parse_csv;
use prospecto_sync::tabular::{extract_candidate, Row};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// CSV file (or XLSX with the xlsx-import feature)
    pub file: PathBuf,
    /// Skip rows that resolve to no name, email, or phone
    #[arg(long, action = ArgAction::SetTrue)]
    pub skip_empty: bool,
    /// Extract and dedup-check without writing anything
    #[arg(long, action = ArgAction::SetTrue)]
    pub dry_run: bool,
}

#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub added: usize,
    pub duplicates: usize,
    pub skipped_empty: usize,
    pub warnings: Vec<String>,
    pub dry_run: bool,
}

pub fn import(ctx: &Context<'_>, args: ImportArgs) -> Result<()> {
    let rows = load_rows(&args.file)?;
    let skip_empty = args.skip_empty || ctx.config.import.skip_empty;
    let report = run_import(ctx, rows, skip_empty, args.dry_run)?;

    if ctx.json {
        return print_json(&report);
    }

    println!(
        "Imported leads: added {}, duplicates {}",
        report.added, report.duplicates
    );
    if report.skipped_empty > 0 {
        println!("Skipped {} empty rows", report.skipped_empty);
    }
    if !report.warnings.is_empty() {
        println!("Warnings:");
        for warning in &report.warnings {
            println!("- {}", warning);
        }
    }
    Ok(())
}

fn load_rows(path: &Path) -> Result<Vec<Row>> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "xlsx" | "xls" => read_spreadsheet(path),
        _ => {
            let data = fs::read_to_string(path)
                .with_context(|| format!("read import file {}", path.display()))?;
            Ok(parse_csv(&data)?)
        }
    }
}

#[cfg(feature = "xlsx-import")]
fn read_spreadsheet(path: &Path) -> Result<Vec<Row>> {
    Ok(prospecto_sync::xlsx::read_xlsx(path)?)
}

#[cfg(not(feature = "xlsx-import"))]
fn read_spreadsheet(_path: &Path) -> Result<Vec<Row>> {
    Err(crate::error::invalid_input(
        "this build does not include xlsx-import; convert the file to CSV",
    ))
}

fn run_import(
    ctx: &Context<'_>,
    rows: Vec<Row>,
    skip_empty: bool,
    dry_run: bool,
) -> Result<ImportReport> {
    let now = now_utc();
    let existing = ctx.store.get_all()?;
    let mut index = DedupIndex::from_leads(&existing);

    let mut report = ImportReport {
        added: 0,
        duplicates: 0,
        skipped_empty: 0,
        warnings: Vec::new(),
        dry_run,
    };

    // One row fully handled (sniff, normalize, dedup-check, write) before
    // the next begins.
    for (line, row) in rows.iter().enumerate() {
        let candidate = extract_candidate(row);
        for warning in &candidate.warnings {
            report.warnings.push(format!("row {}: {}", line + 1, warning));
        }

        let name = normalize_name(&candidate.name);
        let phone = normalize_phone(&candidate.phone);
        let email = normalize_email(&candidate.email);

        if name.is_empty() && email.is_empty() && phone.is_empty() {
            if skip_empty {
                report.skipped_empty += 1;
                continue;
            }
            report.warnings.push(format!(
                "row {}: no contact fields resolved; importing empty lead",
                line + 1
            ));
        }

        if index.contains(&email, &phone) {
            report.duplicates += 1;
            continue;
        }

        if !dry_run {
            ctx.store.create(
                now,
                LeadNew {
                    name,
                    phone: phone.clone(),
                    email: email.clone(),
                    source: candidate.source,
                    tags: vec![ctx.config.import.tag.clone()],
                    ..Default::default()
                },
            )?;
        }
        index.insert(&email, &phone);
        report.added += 1;
    }

    Ok(report)
}
