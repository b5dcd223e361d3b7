use crate::commands::{print_json, Context};
use crate::error::{invalid_input, not_found};
use crate::util::{
    format_timestamp_datetime, now_utc, parse_lead_id, parse_local_timestamp, parse_priority,
    parse_status,
};
use anyhow::Result;
use clap::{ArgAction, Args};
use prospecto_core::domain::{
    normalize_email, normalize_phone, source_name, Lead, LeadPriority, LeadStatus,
};
use prospecto_core::dto::{LeadDetailDto, LeadListItemDto, MessageDto};
use prospecto_core::rules::{validate_business_unit, validate_manual_entry, validate_source};
use prospecto_store::{LeadNew, LeadUpdate};
use serde::Serialize;

#[derive(Debug, Args)]
pub struct AddLeadArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub email: Option<String>,
    /// Catalog source code (01-07)
    #[arg(long)]
    pub source: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long)]
    pub cycle: Option<String>,
    #[arg(long)]
    pub unit: Option<String>,
    #[arg(long)]
    pub observations: Option<String>,
    #[arg(long, value_name = "TAG")]
    pub tag: Vec<String>,
    #[arg(long)]
    pub schedule: Option<String>,
}

#[derive(Debug, Args)]
pub struct EditLeadArgs {
    pub id: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub source: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long)]
    pub cycle: Option<String>,
    #[arg(long)]
    pub unit: Option<String>,
    #[arg(long)]
    pub observations: Option<String>,
    #[arg(long, value_name = "TAG")]
    pub tag: Vec<String>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub unit: Option<String>,
    #[arg(long)]
    pub tag: Option<String>,
    /// Only leads with unread prospect messages
    #[arg(long, action = ArgAction::SetTrue)]
    pub unread: bool,
}

#[derive(Debug, Args)]
pub struct DeleteArgs {
    pub id: String,
}

#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Report what would be removed without deleting
    #[arg(long, action = ArgAction::SetTrue)]
    pub dry_run: bool,
}

pub fn add_lead(ctx: &Context<'_>, args: AddLeadArgs) -> Result<()> {
    let now = now_utc();
    let phone = normalize_phone(&args.phone);
    validate_manual_entry(&args.name, &phone)?;

    let source = args.source.unwrap_or_default();
    validate_source(&source)?;
    let unit = args.unit.unwrap_or_default();
    validate_business_unit(&unit)?;

    let status = match args.status.as_deref() {
        Some(raw) => parse_status(raw)?,
        None => LeadStatus::default(),
    };
    let priority = match args.priority.as_deref() {
        Some(raw) => parse_priority(raw)?,
        None => LeadPriority::default(),
    };
    let scheduled_at = match args.schedule.as_deref() {
        Some(raw) => Some(parse_local_timestamp(raw)?),
        None => None,
    };

    let lead = ctx.store.create(
        now,
        LeadNew {
            name: args.name,
            phone,
            email: args.email.as_deref().map(normalize_email).unwrap_or_default(),
            source,
            status,
            priority,
            interest_cycle: args.cycle.filter(|cycle| !cycle.is_empty()),
            business_unit: Some(unit).filter(|unit| !unit.is_empty()),
            tags: args.tag,
            observations: args.observations.unwrap_or_default(),
            scheduled_at,
            history: Vec::new(),
        },
    )?;

    if ctx.json {
        print_json(&lead)?;
    } else {
        println!("created {} {}", lead.id, lead.name);
    }
    Ok(())
}

pub fn edit_lead(ctx: &Context<'_>, args: EditLeadArgs) -> Result<()> {
    let now = now_utc();
    let id = parse_lead_id(&args.id)?;

    let mut update = LeadUpdate::default();
    if let Some(name) = args.name {
        update.name = Some(name);
    }
    if let Some(phone) = args.phone {
        update.phone = Some(normalize_phone(&phone));
    }
    if let Some(email) = args.email {
        update.email = Some(normalize_email(&email));
    }
    if let Some(source) = args.source {
        validate_source(&source)?;
        update.source = Some(source);
    }
    if let Some(raw) = args.status.as_deref() {
        update.status = Some(parse_status(raw)?);
    }
    if let Some(raw) = args.priority.as_deref() {
        update.priority = Some(parse_priority(raw)?);
    }
    if let Some(cycle) = args.cycle {
        update.interest_cycle = Some(normalize_optional_value(cycle));
    }
    if let Some(unit) = args.unit {
        validate_business_unit(&unit)?;
        update.business_unit = Some(normalize_optional_value(unit));
    }
    if let Some(observations) = args.observations {
        update.observations = Some(observations);
    }
    if !args.tag.is_empty() {
        update.tags = Some(args.tag);
    }

    if update_is_empty(&update) {
        return Err(invalid_input("no updates provided"));
    }

    let lead = ctx
        .store
        .update(now, id, update)?
        .ok_or_else(|| not_found("lead not found"))?;
    if ctx.json {
        print_json(&lead)?;
    } else {
        println!("updated {} {}", lead.id, lead.name);
    }
    Ok(())
}

pub fn show_lead(ctx: &Context<'_>, args: ShowArgs) -> Result<()> {
    let id = parse_lead_id(&args.id)?;
    let lead = ctx
        .store
        .get_by_id(id)?
        .ok_or_else(|| not_found("lead not found"))?;

    let detail = lead_detail(&lead);
    if ctx.json {
        print_json(&detail)?;
        return Ok(());
    }

    println!("id: {}", detail.id);
    println!("name: {}", detail.name);
    if !detail.phone.is_empty() {
        println!("phone: {}", detail.phone);
    }
    if !detail.email.is_empty() {
        println!("email: {}", detail.email);
    }
    if !detail.source.is_empty() {
        println!("source: {} ({})", detail.source, detail.source_name);
    }
    println!("status: {}", detail.status.as_str());
    println!("priority: {}", detail.priority.as_str());
    if let Some(cycle) = detail.interest_cycle.as_deref() {
        println!("cycle: {}", cycle);
    }
    if let Some(unit) = detail.business_unit.as_deref() {
        println!("unit: {}", unit);
    }
    if !detail.tags.is_empty() {
        println!("tags: {}", detail.tags.join(", "));
    }
    if !detail.observations.is_empty() {
        println!("observations: {}", detail.observations);
    }
    if let Some(at) = detail.scheduled_at {
        println!("scheduled_at: {}", format_timestamp_datetime(at));
    }
    if detail.has_unread_messages {
        println!("unread: yes");
    }
    if !detail.history.is_empty() {
        println!("history:");
        for message in &detail.history {
            println!(
                "  [{}] {}: {}",
                format_timestamp_datetime(message.sent_at),
                message.sender,
                message.content
            );
        }
    }
    Ok(())
}

pub fn list_leads(ctx: &Context<'_>, args: ListArgs) -> Result<()> {
    let status = match args.status.as_deref() {
        Some(raw) => Some(parse_status(raw)?),
        None => None,
    };

    let leads = ctx.store.get_all()?;
    let items: Vec<LeadListItemDto> = leads
        .iter()
        .filter(|lead| status.map_or(true, |status| lead.status == status))
        .filter(|lead| {
            args.unit
                .as_deref()
                .map_or(true, |unit| lead.business_unit.as_deref() == Some(unit))
        })
        .filter(|lead| {
            args.tag
                .as_deref()
                .map_or(true, |tag| lead.tags.iter().any(|t| t == tag))
        })
        .filter(|lead| !args.unread || lead.has_unread_messages)
        .map(lead_list_item)
        .collect();

    if ctx.json {
        print_json(&items)?;
        return Ok(());
    }

    for item in &items {
        let mut line = format!(
            "{} [{}] {} {}",
            item.id,
            item.status.as_str(),
            item.name,
            item.phone
        );
        if item.has_unread_messages {
            line.push_str(" *");
        }
        println!("{}", line.trim_end());
    }
    Ok(())
}

pub fn delete_lead(ctx: &Context<'_>, args: DeleteArgs) -> Result<()> {
    let id = parse_lead_id(&args.id)?;
    if !ctx.store.delete(id)? {
        return Err(not_found("lead not found"));
    }
    if ctx.json {
        print_json(&DeleteReport { deleted: id.to_string() })?;
    } else {
        println!("deleted {}", id);
    }
    Ok(())
}

/// Removes leads that carry no name, email, or phone. Best-effort imports can
/// write such records; this is the after-the-fact cleanup.
pub fn clean_leads(ctx: &Context<'_>, args: CleanArgs) -> Result<()> {
    let leads = ctx.store.get_all()?;
    let empty: Vec<&Lead> = leads
        .iter()
        .filter(|lead| !lead.has_contact_fields())
        .collect();

    let mut removed = 0;
    if !args.dry_run {
        for lead in &empty {
            if ctx.store.delete(lead.id)? {
                removed += 1;
            }
        }
    } else {
        removed = empty.len();
    }

    if ctx.json {
        print_json(&CleanReport {
            removed,
            dry_run: args.dry_run,
        })?;
    } else if args.dry_run {
        println!("{} empty leads would be removed", removed);
    } else {
        println!("removed {} empty leads", removed);
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct DeleteReport {
    deleted: String,
}

#[derive(Debug, Serialize)]
struct CleanReport {
    removed: usize,
    dry_run: bool,
}

fn lead_list_item(lead: &Lead) -> LeadListItemDto {
    LeadListItemDto {
        id: lead.id,
        name: lead.name.clone(),
        phone: lead.phone.clone(),
        status: lead.status,
        priority: lead.priority,
        scheduled_at: lead.scheduled_at,
        tags: lead.tags.clone(),
        has_unread_messages: lead.has_unread_messages,
    }
}

fn lead_detail(lead: &Lead) -> LeadDetailDto {
    LeadDetailDto {
        id: lead.id,
        name: lead.name.clone(),
        phone: lead.phone.clone(),
        email: lead.email.clone(),
        source: lead.source.clone(),
        source_name: source_name(&lead.source).to_string(),
        status: lead.status,
        priority: lead.priority,
        interest_cycle: lead.interest_cycle.clone(),
        business_unit: lead.business_unit.clone(),
        tags: lead.tags.clone(),
        observations: lead.observations.clone(),
        scheduled_at: lead.scheduled_at,
        has_unread_messages: lead.has_unread_messages,
        created_at: lead.created_at,
        updated_at: lead.updated_at,
        history: lead
            .history
            .iter()
            .map(|message| MessageDto {
                id: message.id,
                sender: message.sender.as_str().to_string(),
                content: message.content.clone(),
                sent_at: message.sent_at,
            })
            .collect(),
    }
}

fn normalize_optional_value(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn update_is_empty(update: &LeadUpdate) -> bool {
    update.name.is_none()
        && update.phone.is_none()
        && update.email.is_none()
        && update.source.is_none()
        && update.status.is_none()
        && update.priority.is_none()
        && update.interest_cycle.is_none()
        && update.business_unit.is_none()
        && update.tags.is_none()
        && update.observations.is_none()
        && update.scheduled_at.is_none()
        && update.has_unread_messages.is_none()
}
