// src/dates.rs
//! Relative "published" labels for feed timestamps.
//!
//! Feeds use RFC 2822 (`pubDate`) or RFC 3339 (Atom). `now` is always passed
//! in so labels are reproducible in tests.

use serde::{Deserialize, Serialize};
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

const HOUR_SECS: i64 = 3_600;

/// Label language for dates and card text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    #[default]
    Ja,
}

impl Locale {
    /// BCP 47 tag for the page's `lang` attribute.
    pub fn tag(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ja => "ja",
        }
    }

    /// Label for timestamps that cannot be parsed.
    pub fn fallback(self) -> &'static str {
        match self {
            Locale::En => "recent",
            Locale::Ja => "最近",
        }
    }

    fn hours_ago(self, h: i64) -> String {
        match self {
            Locale::En => format!("{h} hours ago"),
            Locale::Ja => format!("{h}時間前"),
        }
    }

    fn days_ago(self, d: i64) -> String {
        match self {
            Locale::En => format!("{d} days ago"),
            Locale::Ja => format!("{d}日前"),
        }
    }

    fn calendar(self, t: OffsetDateTime) -> String {
        match self {
            Locale::En => t
                .format(format_description!("[month repr:short] [day padding:none]"))
                .unwrap_or_else(|_| self.fallback().to_string()),
            Locale::Ja => format!("{}月{}日", u8::from(t.month()), t.day()),
        }
    }
}

/// Parse a feed timestamp, keeping its own UTC offset.
pub fn parse_datetime(raw: &str) -> Option<OffsetDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(t) = OffsetDateTime::parse(s, &Rfc2822) {
        return Some(t);
    }
    if let Ok(t) = OffsetDateTime::parse(s, &Rfc3339) {
        return Some(t);
    }
    // chrono is more forgiving with obsolete zone names ("EST", "PDT")
    let dt = chrono::DateTime::parse_from_rfc2822(s).ok()?;
    let offset = UtcOffset::from_whole_seconds(dt.offset().local_minus_utc()).ok()?;
    OffsetDateTime::from_unix_timestamp(dt.timestamp())
        .ok()
        .map(|t| t.to_offset(offset))
}

/// Unix seconds for sorting; `None` when the timestamp is unparsable.
pub fn parse_timestamp(raw: &str) -> Option<i64> {
    parse_datetime(raw).map(|t| t.unix_timestamp())
}

/// `format_relative` with the locale bound once.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateFormatter {
    pub locale: Locale,
}

impl DateFormatter {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn format(&self, raw: &str, now: OffsetDateTime) -> String {
        format_relative(raw, now, self.locale)
    }
}

/// `< 24h` → hours, `< 168h` → whole days, otherwise a short calendar date.
/// Future timestamps count as 0 hours.
pub fn format_relative(raw: &str, now: OffsetDateTime, locale: Locale) -> String {
    let Some(t) = parse_datetime(raw) else {
        return locale.fallback().to_string();
    };
    let hours = (now - t).whole_seconds().max(0) / HOUR_SECS;
    if hours < 24 {
        locale.hours_ago(hours)
    } else if hours < 168 {
        locale.days_ago(hours / 24)
    } else {
        locale.calendar(t)
    }
}
