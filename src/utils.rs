// Utility functions
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;

pub const NOT_AVAILABLE: &str = "N/A";

/// Formats an integer with comma thousands separators: 2950000000000 -> "2,950,000,000,000".
pub fn with_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Displays the value or the literal "N/A".
pub fn or_na<T: Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Unix seconds to `YYYY-MM-DD HH:MM` in the local time zone.
pub fn format_unix(secs: i64) -> Option<String> {
    format_unix_in(&Local, secs)
}

pub fn format_unix_in<Tz>(tz: &Tz, secs: i64) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    DateTime::from_timestamp(secs, 0).map(|dt| {
        dt.with_timezone(tz)
            .format("%Y-%m-%d %H:%M")
            .to_string()
    })
}
