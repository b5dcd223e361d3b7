use crate::commands::{print_json, Context};
use anyhow::Result;
use clap::Args;
use prospecto_core::domain::{BUSINESS_UNITS, SOURCE_CATALOG};
use serde::Serialize;

#[derive(Debug, Args)]
pub struct SourcesArgs {}

#[derive(Debug, Args)]
pub struct UnitsArgs {}

#[derive(Debug, Serialize)]
struct SourceDto {
    code: &'static str,
    name: &'static str,
}

#[derive(Debug, Serialize)]
struct UnitDto {
    id: &'static str,
    name: &'static str,
    level: &'static str,
}

pub fn list_sources(ctx: &Context<'_>, _args: SourcesArgs) -> Result<()> {
    if ctx.json {
        let items: Vec<SourceDto> = SOURCE_CATALOG
            .iter()
            .map(|&(code, name)| SourceDto { code, name })
            .collect();
        return print_json(&items);
    }

    for (code, name) in SOURCE_CATALOG {
        println!("{} - {}", code, name);
    }
    Ok(())
}

pub fn list_units(ctx: &Context<'_>, _args: UnitsArgs) -> Result<()> {
    if ctx.json {
        let items: Vec<UnitDto> = BUSINESS_UNITS
            .iter()
            .map(|unit| UnitDto {
                id: unit.id,
                name: unit.name,
                level: unit.level,
            })
            .collect();
        return print_json(&items);
    }

    for unit in BUSINESS_UNITS {
        println!("{} - {} ({})", unit.id, unit.name, unit.level);
    }
    Ok(())
}
