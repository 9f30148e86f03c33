use chrono::{DateTime, Utc};

const IEC_UNITS: &[&str] = &["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

/// Human-readable base-1024 byte formatting, e.g. `512.0 MiB`.
pub fn format_ibytes(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < IEC_UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{bytes} {}", IEC_UNITS[0])
    } else {
        format!("{size:.1} {}", IEC_UNITS[unit_index])
    }
}

/// English ordinal for `n`: `1st`, `2nd`, `3rd`, `4th`, `11th`, `21st`.
pub fn ordinal(n: u64) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

pub fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    100.0 * part as f64 / total as f64
}

/// Relative time between `then` and `now`, e.g. `5 minutes ago`.
pub fn rel_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    const UNITS: &[(i64, &str)] = &[
        (365 * 24 * 60 * 60, "year"),
        (7 * 24 * 60 * 60, "week"),
        (24 * 60 * 60, "day"),
        (60 * 60, "hour"),
        (60, "minute"),
        (1, "second"),
    ];

    let elapsed = (now - then).num_seconds();
    if elapsed <= 0 {
        return "now".to_string();
    }

    let (unit_secs, unit) = UNITS
        .iter()
        .copied()
        .find(|(secs, _)| elapsed >= *secs)
        .unwrap_or((1, "second"));
    let count = elapsed / unit_secs;
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}
