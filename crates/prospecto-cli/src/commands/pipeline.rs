use crate::commands::{print_json, Context};
use crate::error::not_found;
use crate::util::{now_utc, parse_lead_id, parse_local_timestamp, parse_status};
use anyhow::Result;
use clap::Args;
use prospecto_core::domain::LeadStatus;
use prospecto_core::dto::BoardColumnDto;
use prospecto_store::LeadUpdate;

#[derive(Debug, Args)]
pub struct MoveArgs {
    pub id: String,
    /// Target pipeline stage
    pub status: String,
}

#[derive(Debug, Args)]
pub struct BoardArgs {}

#[derive(Debug, Args)]
pub struct ScheduleArgs {
    pub id: String,
    /// Appointment time, local (YYYY-MM-DD or YYYY-MM-DD HH:MM)
    #[arg(long)]
    pub at: String,
}

#[derive(Debug, Args)]
pub struct ClearScheduleArgs {
    pub id: String,
}

pub fn move_lead(ctx: &Context<'_>, args: MoveArgs) -> Result<()> {
    let now = now_utc();
    let id = parse_lead_id(&args.id)?;
    let status = parse_status(&args.status)?;

    let lead = ctx
        .store
        .update(
            now,
            id,
            LeadUpdate {
                status: Some(status),
                ..Default::default()
            },
        )?
        .ok_or_else(|| not_found("lead not found"))?;

    if ctx.json {
        print_json(&lead)?;
    } else {
        println!("moved {} to {}", lead.id, lead.status.as_str());
    }
    Ok(())
}

/// Per-stage counts, in kanban column order.
pub fn board(ctx: &Context<'_>, _args: BoardArgs) -> Result<()> {
    let leads = ctx.store.get_all()?;
    let columns: Vec<BoardColumnDto> = LeadStatus::all()
        .iter()
        .map(|status| BoardColumnDto {
            status: *status,
            count: leads.iter().filter(|lead| lead.status == *status).count(),
        })
        .collect();

    if ctx.json {
        print_json(&columns)?;
        return Ok(());
    }

    for column in &columns {
        println!("{:<16} {}", column.status.as_str(), column.count);
    }
    Ok(())
}

pub fn schedule_lead(ctx: &Context<'_>, args: ScheduleArgs) -> Result<()> {
    let now = now_utc();
    let id = parse_lead_id(&args.id)?;
    let at = parse_local_timestamp(&args.at)?;

    let lead = ctx
        .store
        .update(
            now,
            id,
            LeadUpdate {
                scheduled_at: Some(Some(at)),
                ..Default::default()
            },
        )?
        .ok_or_else(|| not_found("lead not found"))?;

    if ctx.json {
        print_json(&lead)?;
    } else {
        println!("scheduled {} at {}", lead.id, args.at.trim());
    }
    Ok(())
}

pub fn clear_schedule(ctx: &Context<'_>, args: ClearScheduleArgs) -> Result<()> {
    let now = now_utc();
    let id = parse_lead_id(&args.id)?;

    let lead = ctx
        .store
        .update(
            now,
            id,
            LeadUpdate {
                scheduled_at: Some(None),
                ..Default::default()
            },
        )?
        .ok_or_else(|| not_found("lead not found"))?;

    if ctx.json {
        print_json(&lead)?;
    } else {
        println!("cleared schedule for {}", lead.id);
    }
    Ok(())
}
