use crate::commands::{print_json, Context};
use crate::error::{invalid_input, not_found};
use crate::util::{now_utc, parse_lead_id, parse_local_timestamp, parse_sender};
use anyhow::Result;
use clap::{Args, Subcommand};
#[cfg(feature = "whatsapp-send")]
use prospecto_core::domain::MessageSender;
use prospecto_store::MessageNew;

#[derive(Debug, Subcommand)]
pub enum MessageCommand {
    /// Append a message to a lead's history without sending anything
    Log(LogArgs),
    /// Send over WhatsApp, then append to history
    Send(SendArgs),
    #[command(name = "mark-read")]
    MarkRead(MarkReadArgs),
}

#[derive(Debug, Args)]
pub struct LogArgs {
    pub id: String,
    pub content: String,
    /// executive or prospect
    #[arg(long, default_value = "executive")]
    pub from: String,
    /// When the message was actually sent, local time (defaults to now)
    #[arg(long)]
    pub at: Option<String>,
}

#[derive(Debug, Args)]
pub struct SendArgs {
    pub id: String,
    pub content: String,
}

#[derive(Debug, Args)]
pub struct MarkReadArgs {
    pub id: String,
}

pub fn log_message(ctx: &Context<'_>, args: LogArgs) -> Result<()> {
    let now = now_utc();
    let id = parse_lead_id(&args.id)?;
    let sender = parse_sender(&args.from)?;
    if args.content.trim().is_empty() {
        return Err(invalid_input("message content cannot be empty"));
    }
    let sent_at = match args.at.as_deref() {
        Some(raw) => parse_local_timestamp(raw)?,
        None => now,
    };

    let message = ctx
        .store
        .append_message(
            now,
            id,
            MessageNew {
                sender,
                content: args.content,
                sent_at,
            },
        )?
        .ok_or_else(|| not_found("lead not found"))?;

    if ctx.json {
        print_json(&message)?;
    } else {
        println!("logged {} message {}", message.sender.as_str(), message.id);
    }
    Ok(())
}

#[cfg(feature = "whatsapp-send")]
pub fn send_message(ctx: &Context<'_>, args: SendArgs) -> Result<()> {
    use prospecto_sync::whatsapp::CloudApiTransport;

    if !ctx.config.whatsapp.enabled {
        return Err(invalid_input(
            "whatsapp sending is disabled; enable it in config.toml",
        ));
    }
    let transport = CloudApiTransport::new(
        ctx.config.whatsapp.phone_number_id.clone(),
        ctx.config.whatsapp.access_token.clone(),
    )?;
    send_via(ctx, args, &transport)
}

#[cfg(not(feature = "whatsapp-send"))]
pub fn send_message(_ctx: &Context<'_>, _args: SendArgs) -> Result<()> {
    Err(invalid_input(
        "this build does not include whatsapp-send support",
    ))
}

#[cfg(feature = "whatsapp-send")]
fn send_via(
    ctx: &Context<'_>,
    args: SendArgs,
    transport: &dyn prospecto_sync::MessageTransport,
) -> Result<()> {
    let now = now_utc();
    let id = parse_lead_id(&args.id)?;
    if args.content.trim().is_empty() {
        return Err(invalid_input("message content cannot be empty"));
    }

    let lead = ctx
        .store
        .get_by_id(id)?
        .ok_or_else(|| not_found("lead not found"))?;
    if lead.phone.is_empty() {
        return Err(invalid_input("lead has no phone number"));
    }

    let receipt = transport.send_text(&lead.phone, &args.content)?;

    // Only a confirmed send lands in the history.
    let message = ctx
        .store
        .append_message(
            now,
            id,
            MessageNew {
                sender: MessageSender::Executive,
                content: args.content,
                sent_at: now,
            },
        )?
        .ok_or_else(|| not_found("lead not found"))?;

    if ctx.json {
        print_json(&SendReport {
            message_id: receipt.message_id,
            logged: message.id.to_string(),
        })?;
    } else {
        println!("sent message {} to {}", receipt.message_id, lead.phone);
    }
    Ok(())
}

pub fn mark_read(ctx: &Context<'_>, args: MarkReadArgs) -> Result<()> {
    let now = now_utc();
    let id = parse_lead_id(&args.id)?;

    let lead = ctx
        .store
        .mark_read(now, id)?
        .ok_or_else(|| not_found("lead not found"))?;

    if ctx.json {
        print_json(&lead)?;
    } else {
        println!("marked {} as read", lead.id);
    }
    Ok(())
}

#[cfg(feature = "whatsapp-send")]
#[derive(Debug, serde::Serialize)]
struct SendReport {
    message_id: String,
    logged: String,
}
