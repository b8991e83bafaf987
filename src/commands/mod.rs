pub mod accounts;
pub mod auth;
pub mod counts;
pub mod download;
pub mod list;
pub mod mutate;
pub mod show;
pub mod sync;

use std::io::{self, IsTerminal, Write};

use chrono::{DateTime, Utc};

use crate::error::{AppError, AppResult};

const PREVIEW_WIDTH: usize = 120;

pub(crate) fn format_preview(snippet: Option<&str>, body: &str) -> String {
    let source = snippet
        .map(str::trim)
        .filter(|snippet| !snippet.is_empty())
        .unwrap_or(body);
    if source.trim().is_empty() {
        return "(no preview)".to_string();
    }

    let decoded = html_escape::decode_html_entities(source).to_string();
    let compact = decoded.split_whitespace().collect::<Vec<_>>().join(" ");

    if compact.len() <= PREVIEW_WIDTH {
        return compact;
    }

    let mut end = PREVIEW_WIDTH;
    while !compact.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &compact[..end])
}

/// Short age of a message relative to `now`, e.g. `5m`, `3h`, `2d`, or the
/// date for anything older than a week.
pub(crate) fn format_relative(received_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(received_at) = received_at else {
        return "(no date)".to_string();
    };

    let elapsed = now.signed_duration_since(received_at);
    if elapsed.num_seconds() < 60 {
        return "just now".to_string();
    }
    if elapsed.num_minutes() < 60 {
        return format!("{}m", elapsed.num_minutes());
    }
    if elapsed.num_hours() < 24 {
        return format!("{}h", elapsed.num_hours());
    }
    if elapsed.num_days() < 7 {
        return format!("{}d", elapsed.num_days());
    }

    received_at.format("%b %-d, %Y").to_string()
}

pub(crate) fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

/// Asks a yes/no question on the terminal. Without a terminal the caller must
/// confirm up front with `--yes`.
pub(crate) fn confirm(prompt: &str) -> AppResult<bool> {
    if !io::stdin().is_terminal() {
        return Err(AppError::InvalidInput(format!(
            "{prompt} pass --yes to confirm in non-interactive use"
        )));
    }

    let answer = prompt_line(&format!("{prompt} [y/N] "))?;
    Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
}

pub(crate) fn prompt_required(prompt: &str) -> AppResult<String> {
    if !io::stdin().is_terminal() {
        return Err(AppError::InvalidInput(format!(
            "{} is required in non-interactive use",
            prompt.trim_end_matches([':', ' '])
        )));
    }

    loop {
        let value = prompt_line(prompt)?;
        if !value.is_empty() {
            return Ok(value);
        }
        eprintln!("value is required");
    }
}

fn prompt_line(prompt: &str) -> AppResult<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{prompt}")?;
    stdout.flush()?;

    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn formats_preview_with_truncation() {
        let input = Some(
            "this is a very long preview string that should be truncated at one hundred and twenty characters to keep list output compact and readable",
        );
        let preview = format_preview(input, "");
        assert!(preview.ends_with("..."));
        assert!(preview.len() <= 123);
    }

    #[test]
    fn preview_falls_back_to_body() {
        assert_eq!(format_preview(None, "Hi &amp; bye"), "Hi & bye");
        assert_eq!(format_preview(Some("  "), ""), "(no preview)");
    }

    #[test]
    fn relative_time_buckets() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let at = |secs: i64| Some(now - chrono::Duration::seconds(secs));

        assert_eq!(format_relative(at(10), now), "just now");
        assert_eq!(format_relative(at(5 * 60), now), "5m");
        assert_eq!(format_relative(at(3 * 3600), now), "3h");
        assert_eq!(format_relative(at(2 * 86_400), now), "2d");
        assert_eq!(format_relative(at(30 * 86_400), now), "Feb 8, 2026");
        assert_eq!(format_relative(None, now), "(no date)");
    }

    #[test]
    fn sizes_are_human_readable() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }
}
