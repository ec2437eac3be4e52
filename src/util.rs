use std::process::Command;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Duration, Utc};

// Humanized age matching gh's own phrasing ("about 3 days ago"). Future
// timestamps clamp to the smallest bucket.
pub fn relative_time_ago(now: DateTime<Utc>, then: DateTime<Utc>) -> String {
    let ago = now.signed_duration_since(then);
    if ago < Duration::minutes(1) {
        return "less than a minute ago".to_string();
    }
    if ago < Duration::hours(1) {
        return about(ago.num_minutes(), "minute");
    }
    if ago < Duration::days(1) {
        return about(ago.num_hours(), "hour");
    }
    if ago < Duration::days(30) {
        return about(ago.num_days(), "day");
    }
    if ago < Duration::days(365) {
        return about(ago.num_days() / 30, "month");
    }
    about(ago.num_days() / 365, "year")
}

fn about(amount: i64, unit: &str) -> String {
    if amount == 1 {
        format!("about 1 {unit} ago")
    } else {
        format!("about {amount} {unit}s ago")
    }
}

pub fn gh_auth_token() -> Result<String> {
    for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
        if let Ok(token) = std::env::var(var) {
            if !token.trim().is_empty() {
                return Ok(token.trim().to_string());
            }
        }
    }

    let output = Command::new("gh")
        .args(["auth", "token", "-h", "github.com"])
        .output()
        .context("failed to run 'gh auth token -h github.com'")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!(
            "failed to read GitHub token (run 'gh auth login'): {}",
            stderr.trim()
        ));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(anyhow!("GitHub token was empty; run 'gh auth login'"));
    }

    Ok(token)
}
