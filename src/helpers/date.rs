//! Date helper functions

use chrono::{DateTime, TimeZone};

/// Format a date as `YYYY-MM-DD`
pub fn format_ymd<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%d").to_string()
}

/// Format a date for RSS `pubDate`
pub fn format_rfc2822<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.to_rfc2822()
}
