use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use prospecto_core::domain::{LeadId, LeadPriority, LeadStatus, MessageSender};
use std::str::FromStr;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

pub fn now_utc() -> i64 {
    Utc::now().timestamp()
}

pub fn parse_local_timestamp(input: &str) -> Result<i64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("timestamp cannot be empty"));
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        let naive = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| anyhow!("invalid date"))?;
        return local_to_utc_timestamp(naive);
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return local_to_utc_timestamp(dt);
        }
    }

    Err(anyhow!(
        "invalid datetime format: expected YYYY-MM-DD or YYYY-MM-DD HH:MM"
    ))
}

pub fn format_timestamp_datetime(ts: i64) -> String {
    let dt = DateTime::<Utc>::from_timestamp(ts, 0)
        .unwrap_or_else(|| DateTime::<Utc>::from_timestamp(0, 0).unwrap())
        .with_timezone(&Local);
    dt.format("%Y-%m-%d %H:%M").to_string()
}

pub fn parse_lead_id(raw: &str) -> Result<LeadId> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("lead id cannot be empty"));
    }
    LeadId::from_str(trimmed).map_err(|_| anyhow!("invalid lead id"))
}

pub fn parse_status(raw: &str) -> Result<LeadStatus> {
    LeadStatus::parse(raw.trim()).map_err(|_| {
        let values: Vec<&str> = LeadStatus::all().iter().map(|s| s.as_str()).collect();
        anyhow!("invalid status: expected one of {}", values.join("|"))
    })
}

pub fn parse_priority(raw: &str) -> Result<LeadPriority> {
    LeadPriority::parse(raw.trim()).map_err(|_| anyhow!("invalid priority: expected hot|warm|cold"))
}

pub fn parse_sender(raw: &str) -> Result<MessageSender> {
    MessageSender::parse(raw.trim())
        .map_err(|_| anyhow!("invalid sender: expected executive|prospect"))
}

fn local_to_utc_timestamp(naive: NaiveDateTime) -> Result<i64> {
    let local = Local
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| anyhow!("ambiguous local time: {}", naive))?;
    Ok(local.with_timezone(&Utc).timestamp())
}
