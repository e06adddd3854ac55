//! Recurrence rule parsing.
//!
//! Parses the subset of RFC 5545 `RRULE` values the expander understands:
//! `FREQ`, `INTERVAL`, `COUNT`, `UNTIL`, `BYMONTH` and `BYDAY`. Everything
//! else is ignored, and malformed values degrade to their defaults instead of
//! failing.

use chrono::Weekday;
use chrono_tz::Tz;
use tracing::{trace, warn};

use crate::time::{Instant, TimestampResolver, end_of_day, is_date_only};

/// How often a rule repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    /// Parses a `FREQ` token. Returns `None` for tokens the expander does not
    /// support (e.g. `HOURLY`).
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "DAILY" => Some(Self::Daily),
            "WEEKLY" => Some(Self::Weekly),
            "MONTHLY" => Some(Self::Monthly),
            "YEARLY" => Some(Self::Yearly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "DAILY",
            Self::Weekly => "WEEKLY",
            Self::Monthly => "MONTHLY",
            Self::Yearly => "YEARLY",
        }
    }
}

/// A parsed recurrence rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    /// `None` when `FREQ` is absent or unsupported; such a rule expands to
    /// nothing.
    pub frequency: Option<Frequency>,
    /// Always at least 1.
    pub interval: u32,
    /// Number of occurrences to generate, capped by the caller's bound.
    pub count: usize,
    /// Inclusive upper bound on occurrence starts.
    pub until: Option<Instant>,
    /// Month numbers (1-12); empty means every month.
    pub by_month: Vec<u32>,
    /// Weekdays; empty means every day.
    pub by_day: Vec<Weekday>,
}

impl RecurrenceRule {
    /// Parses a raw rule.
    ///
    /// `max_repeats` becomes the count when `COUNT` is absent or zero.
    /// `zone` is the master event's zone, used for a floating or date-only
    /// `UNTIL`. Returns `None` for an empty rule.
    pub fn parse(raw: &str, max_repeats: usize, zone: Tz) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let mut rule = Self {
            frequency: None,
            interval: 1,
            count: max_repeats,
            until: None,
            by_month: Vec::new(),
            by_day: Vec::new(),
        };

        for part in raw.split(';') {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            let value = value.trim();

            match key.trim().to_ascii_uppercase().as_str() {
                "FREQ" => {
                    rule.frequency = Frequency::from_token(value);
                    if rule.frequency.is_none() {
                        warn!(freq = value, "Unsupported frequency, rule will not expand");
                    }
                }
                "INTERVAL" => {
                    rule.interval = value.parse().ok().filter(|i| *i > 0).unwrap_or(1);
                }
                "COUNT" => {
                    rule.count = value.parse().ok().filter(|c| *c > 0).unwrap_or(max_repeats);
                }
                "UNTIL" => {
                    rule.until = parse_until(value, zone);
                }
                "BYMONTH" => {
                    for month in value.split(',').filter_map(|m| m.trim().parse::<u32>().ok()) {
                        if (1..=12).contains(&month) && !rule.by_month.contains(&month) {
                            rule.by_month.push(month);
                        }
                    }
                }
                "BYDAY" => {
                    for day in value.split(',').filter_map(parse_weekday) {
                        if !rule.by_day.contains(&day) {
                            rule.by_day.push(day);
                        }
                    }
                }
                other => trace!(key = other, "Ignoring rule part"),
            }
        }

        Some(rule)
    }

    /// Returns true if `month` (1-12) passes the by-month filter.
    pub fn matches_month(&self, month: u32) -> bool {
        self.by_month.is_empty() || self.by_month.contains(&month)
    }

    /// Returns true if `day` passes the by-day filter.
    pub fn matches_weekday(&self, day: Weekday) -> bool {
        self.by_day.is_empty() || self.by_day.contains(&day)
    }
}

fn parse_until(value: &str, zone: Tz) -> Option<Instant> {
    let resolver = TimestampResolver::new(zone);
    match resolver.resolve("UNTIL", value, Some(zone.name())) {
        Ok(instant) if is_date_only(value) => Some(end_of_day(&instant)),
        Ok(instant) => Some(instant),
        Err(e) => {
            warn!(error = %e, "Ignoring UNTIL");
            None
        }
    }
}

/// Parses a `BYDAY` entry, ignoring any ordinal prefix (`1MO`, `-1FR`).
pub fn parse_weekday(token: &str) -> Option<Weekday> {
    let token = token.trim();
    let day = token.trim_start_matches(|c: char| c == '+' || c == '-' || c.is_ascii_digit());
    match day.to_ascii_uppercase().as_str() {
        "MO" => Some(Weekday::Mon),
        "TU" => Some(Weekday::Tue),
        "WE" => Some(Weekday::Wed),
        "TH" => Some(Weekday::Thu),
        "FR" => Some(Weekday::Fri),
        "SA" => Some(Weekday::Sat),
        "SU" => Some(Weekday::Sun),
        _ => None,
    }
}
