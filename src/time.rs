use anyhow::{anyhow, Result};
use chrono::{Datelike, Timelike};

/// Current (YYYY-MM-DD, HH:MM) in the configured timezone.
pub fn today_and_now(tz: &str) -> Result<(String, String)> {
    let tz: chrono_tz::Tz = tz.parse().map_err(|_| anyhow!("invalid tz: {tz}"))?;
    let now = chrono::Utc::now().with_timezone(&tz);
    Ok((
        format!("{:04}-{:02}-{:02}", now.year(), now.month(), now.day()),
        format!("{:02}:{:02}", now.hour(), now.minute()),
    ))
}

/// Human-readable timestamp for the "last login" line.
pub fn login_stamp(tz: &str) -> Result<String> {
    let tz: chrono_tz::Tz = tz.parse().map_err(|_| anyhow!("invalid tz: {tz}"))?;
    Ok(chrono::Utc::now()
        .with_timezone(&tz)
        .format("%d/%m/%Y, %H:%M:%S")
        .to_string())
}
