use std::sync::LazyLock;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use regex::{Captures, Regex};

/// Text format of a persisted due timestamp
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Hour used when a phrase names a day but no time of day
const DEFAULT_HOUR: u32 = 9;
const EVENING_HOUR: u32 = 21;

const MONTHS: &str = "january|february|march|april|may|june|july|august|september|october|november|december|jan|feb|mar|apr|jun|jul|aug|sept|sep|oct|nov|dec";
const WEEKDAYS: &str = "monday|tuesday|wednesday|thursday|friday|saturday|sunday";
const COUNT: &str = r"\d+|an?|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve";
const UNITS: &str = r"minutes?|mins?|hours?|hrs?|days?|weeks?|months?|years?";
/// Optional `at <time>` suffix after a day phrase
const AT_TIME: &str = r"(?:\s+at\s+(?:(?P<th>\d{1,2})(?::(?P<tm>\d{2}))?\s*(?P<tmer>[ap]m)?|(?P<tword>noon|midnight))\b)?";

pub fn format_timestamp(dt: NaiveDateTime) -> String {
    dt.format(TIME_FORMAT).to_string()
}

pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), TIME_FORMAT).ok()
}

// ---------------------------------------------------------------------------
// Phrase table
// ---------------------------------------------------------------------------

type Resolver = fn(&Captures<'_>, NaiveDateTime) -> Option<NaiveDateTime>;

struct Phrase {
    re: Regex,
    resolve: Resolver,
}

static PHRASES: LazyLock<Vec<Phrase>> = LazyLock::new(|| {
    let table: Vec<(String, Resolver)> = vec![
        (
            r"\b(?P<y>\d{4})-(?P<mo>\d{1,2})-(?P<d>\d{1,2})(?:[ T](?P<hh>\d{1,2}):(?P<mm>\d{2}))?\b"
                .to_string(),
            resolve_iso,
        ),
        (
            format!(
                r"\b(?P<mon>{MONTHS})\b\.?\s+(?P<d>\d{{1,2}})(?:st|nd|rd|th)?\b(?:,?\s+(?P<y>\d{{4}})\b)?{AT_TIME}"
            ),
            resolve_calendar,
        ),
        (
            format!(
                r"\b(?P<d>\d{{1,2}})(?:st|nd|rd|th)?\s+(?P<mon>{MONTHS})\b(?:,?\s+(?P<y>\d{{4}})\b)?{AT_TIME}"
            ),
            resolve_calendar,
        ),
        (
            format!(r"\b(?P<word>today|tonight|tomorrow|tmrw?|yesterday)\b{AT_TIME}"),
            resolve_relative_day,
        ),
        (
            format!(r"\b(?:(?P<rel>next|this)\s+)?(?P<wd>{WEEKDAYS})\b{AT_TIME}"),
            resolve_weekday,
        ),
        (
            format!(r"\bin\s+(?P<n>{COUNT})\s+(?P<unit>{UNITS})\b"),
            resolve_offset,
        ),
        (
            format!(r"\b(?P<n>{COUNT})\s+(?P<unit>{UNITS})\s+from\s+now\b"),
            resolve_offset,
        ),
        (
            r"\bnext\s+(?P<unit>week|month|year)\b".to_string(),
            resolve_offset,
        ),
        (
            r"\b(?:at\s+)?(?P<th>\d{1,2}):(?P<tm>\d{2})\s*(?P<tmer>[ap]m)?\b".to_string(),
            resolve_clock,
        ),
        (
            r"\b(?:at\s+)?(?P<th>\d{1,2})\s*(?P<tmer>[ap]m)\b".to_string(),
            resolve_clock,
        ),
        (r"\b(?:at\s+)?(?P<tword>noon|midnight)\b".to_string(), resolve_clock),
    ];

    table
        .into_iter()
        .filter_map(|(pattern, resolve)| {
            Regex::new(&format!("(?i){}", pattern))
                .ok()
                .map(|re| Phrase { re, resolve })
        })
        .collect()
});

/// Best-effort extraction of a date/time phrase from one line of text.
///
/// Every phrase pattern is tried; the leftmost phrase that resolves to a
/// real timestamp wins. Relative phrases resolve against `now`.
pub fn parse_deadline(text: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let mut best: Option<(usize, NaiveDateTime)> = None;

    for phrase in PHRASES.iter() {
        for caps in phrase.re.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            if best.is_some_and(|(start, _)| start <= whole.start()) {
                break;
            }
            if let Some(dt) = (phrase.resolve)(&caps, now) {
                best = Some((whole.start(), dt));
                break;
            }
        }
    }

    best.map(|(_, dt)| dt)
}

// ---------------------------------------------------------------------------
// Resolvers
// ---------------------------------------------------------------------------

fn resolve_iso(caps: &Captures<'_>, _now: NaiveDateTime) -> Option<NaiveDateTime> {
    let date = NaiveDate::from_ymd_opt(
        number(caps, "y")?,
        number(caps, "mo")?,
        number(caps, "d")?,
    )?;
    let time = match (caps.name("hh"), caps.name("mm")) {
        (Some(h), Some(m)) => NaiveTime::from_hms_opt(h.as_str().parse().ok()?, m.as_str().parse().ok()?, 0)?,
        _ => NaiveTime::from_hms_opt(DEFAULT_HOUR, 0, 0)?,
    };
    Some(date.and_time(time))
}

fn resolve_calendar(caps: &Captures<'_>, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let month = month_number(caps.name("mon")?.as_str())?;
    let day: u32 = number(caps, "d")?;
    let date = match number::<i32>(caps, "y") {
        Some(year) => NaiveDate::from_ymd_opt(year, month, day)?,
        None => {
            let this_year = NaiveDate::from_ymd_opt(now.year(), month, day)?;
            if this_year < now.date() {
                NaiveDate::from_ymd_opt(now.year() + 1, month, day)?
            } else {
                this_year
            }
        }
    };
    Some(date.and_time(time_of_day(caps, DEFAULT_HOUR)))
}

fn resolve_relative_day(caps: &Captures<'_>, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let today = now.date();
    let (date, hour) = match caps.name("word")?.as_str().to_lowercase().as_str() {
        "today" => (today, DEFAULT_HOUR),
        "tonight" => (today, EVENING_HOUR),
        "yesterday" => (today.pred_opt()?, DEFAULT_HOUR),
        _ => (today.succ_opt()?, DEFAULT_HOUR),
    };
    Some(date.and_time(time_of_day(caps, hour)))
}

fn resolve_weekday(caps: &Captures<'_>, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let target: Weekday = caps.name("wd")?.as_str().parse().ok()?;
    let today = now.date();
    let current = today.weekday().num_days_from_monday() as i64;
    let wanted = target.num_days_from_monday() as i64;
    let mut ahead = (wanted - current).rem_euclid(7);
    let this_week = caps
        .name("rel")
        .is_some_and(|r| r.as_str().eq_ignore_ascii_case("this"));
    if ahead == 0 && !this_week {
        ahead = 7;
    }
    let date = today.checked_add_signed(Duration::days(ahead))?;
    Some(date.and_time(time_of_day(caps, DEFAULT_HOUR)))
}

fn resolve_offset(caps: &Captures<'_>, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let count = match caps.name("n") {
        Some(n) => count_value(n.as_str())?,
        None => 1,
    };
    let unit = caps.name("unit")?.as_str().to_lowercase();
    match unit.trim_end_matches('s') {
        "minute" | "min" => now.checked_add_signed(Duration::try_minutes(count)?),
        "hour" | "hr" => now.checked_add_signed(Duration::try_hours(count)?),
        "day" => now.checked_add_signed(Duration::try_days(count)?),
        "week" => now.checked_add_signed(Duration::try_weeks(count)?),
        "month" => now.checked_add_months(Months::new(u32::try_from(count).ok()?)),
        "year" => now.checked_add_months(Months::new(u32::try_from(count).ok()?.checked_mul(12)?)),
        _ => None,
    }
}

fn resolve_clock(caps: &Captures<'_>, now: NaiveDateTime) -> Option<NaiveDateTime> {
    Some(now.date().and_time(clock_time(caps)?))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn number<T: std::str::FromStr>(caps: &Captures<'_>, name: &str) -> Option<T> {
    caps.name(name)?.as_str().parse().ok()
}

/// The `at <time>` suffix if present and valid, else `default_hour`:00
fn time_of_day(caps: &Captures<'_>, default_hour: u32) -> NaiveTime {
    clock_time(caps)
        .or_else(|| NaiveTime::from_hms_opt(default_hour, 0, 0))
        .unwrap_or(NaiveTime::MIN)
}

fn clock_time(caps: &Captures<'_>) -> Option<NaiveTime> {
    if let Some(word) = caps.name("tword") {
        return match word.as_str().to_lowercase().as_str() {
            "noon" => NaiveTime::from_hms_opt(12, 0, 0),
            _ => NaiveTime::from_hms_opt(0, 0, 0),
        };
    }

    let mut hour: u32 = number(caps, "th")?;
    let minute: u32 = number(caps, "tm").unwrap_or(0);
    match caps.name("tmer").map(|m| m.as_str().to_lowercase()) {
        Some(m) if m == "pm" => {
            if hour == 0 || hour > 12 {
                return None;
            }
            if hour < 12 {
                hour += 12;
            }
        }
        Some(_) => {
            if hour == 0 || hour > 12 {
                return None;
            }
            if hour == 12 {
                hour = 0;
            }
        }
        None => {}
    }
    NaiveTime::from_hms_opt(hour, minute, 0)
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.to_lowercase().get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn count_value(s: &str) -> Option<i64> {
    let value = match s.to_lowercase().as_str() {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        digits => digits.parse().ok()?,
    };
    Some(value)
}

// ---------------------------------------------------------------------------
// Remaining time
// ---------------------------------------------------------------------------

/// Humanize the time left until `due`, e.g. `in 3 days` or `2 hours late`.
///
/// The largest matching bucket wins; every division truncates.
pub fn humanize_remaining(due: NaiveDateTime, now: NaiveDateTime) -> String {
    let delta = due - now;
    let expired = delta < Duration::zero();
    let delta = if expired { -delta } else { delta };

    let days = delta.num_days();
    let seconds = delta.num_seconds();

    let phrase = if delta > Duration::weeks(9) {
        format!("{} months", days / 30)
    } else if delta > Duration::weeks(2) {
        format!("{} weeks", days / 7)
    } else if delta > Duration::days(2) {
        format!("{} days", days)
    } else if delta > Duration::hours(2) {
        format!("{} hours", seconds / 3600)
    } else {
        format!("{} minutes", seconds / 60)
    };

    if expired {
        format!("{} late", phrase)
    } else {
        format!("in {}", phrase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Sunday 2026-10-18 14:30
    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
            .unwrap()
    }

    #[test]
    fn no_phrase_yields_none() {
        assert_eq!(parse_deadline("Buy milk", now()), None);
        assert_eq!(parse_deadline("", now()), None);
        assert_eq!(parse_deadline("read chapter 3 of the book", now()), None);
    }

    #[test]
    fn timestamp_format_round_trips() {
        let dt = at(2026, 11, 2, 8, 5);
        assert_eq!(format_timestamp(dt), "2026-11-02 08:05");
        assert_eq!(parse_timestamp("2026-11-02 08:05"), Some(dt));
        assert_eq!(parse_timestamp("garbage"), None);
    }

    #[test]
    fn iso_dates_with_and_without_time() {
        assert_eq!(
            parse_deadline("@due 2026-11-02 08:05", now()),
            Some(at(2026, 11, 2, 8, 5))
        );
        assert_eq!(
            parse_deadline("submit by 2026-12-01", now()),
            Some(at(2026, 12, 1, 9, 0))
        );
        assert_eq!(parse_deadline("2026-13-45", now()), None);
    }

    #[test]
    fn relative_days() {
        assert_eq!(parse_deadline("due tomorrow", now()), Some(at(2026, 10, 19, 9, 0)));
        assert_eq!(
            parse_deadline("Tomorrow at 5pm", now()),
            Some(at(2026, 10, 19, 17, 0))
        );
        assert_eq!(parse_deadline("call mom tonight", now()), Some(at(2026, 10, 18, 21, 0)));
        assert_eq!(parse_deadline("yesterday", now()), Some(at(2026, 10, 17, 9, 0)));
    }

    #[test]
    fn weekdays_resolve_forward() {
        assert_eq!(parse_deadline("on friday", now()), Some(at(2026, 10, 23, 9, 0)));
        // Today is Sunday: a bare weekday means next week, "this" means today
        assert_eq!(parse_deadline("sunday", now()), Some(at(2026, 10, 25, 9, 0)));
        assert_eq!(parse_deadline("this sunday", now()), Some(at(2026, 10, 18, 9, 0)));
        assert_eq!(
            parse_deadline("next monday at 10:15", now()),
            Some(at(2026, 10, 19, 10, 15))
        );
    }

    #[test]
    fn offsets() {
        assert_eq!(parse_deadline("in 3 days", now()), Some(at(2026, 10, 21, 14, 30)));
        assert_eq!(parse_deadline("in an hour", now()), Some(at(2026, 10, 18, 15, 30)));
        assert_eq!(parse_deadline("two weeks from now", now()), Some(at(2026, 11, 1, 14, 30)));
        assert_eq!(parse_deadline("next month", now()), Some(at(2026, 11, 18, 14, 30)));
    }

    #[test]
    fn calendar_dates_roll_into_next_year() {
        assert_eq!(parse_deadline("Dec 24", now()), Some(at(2026, 12, 24, 9, 0)));
        assert_eq!(parse_deadline("march 3rd", now()), Some(at(2027, 3, 3, 9, 0)));
        assert_eq!(parse_deadline("5 May 2030", now()), Some(at(2030, 5, 5, 9, 0)));
    }

    #[test]
    fn bare_clock_times_mean_today() {
        assert_eq!(parse_deadline("standup 9:45", now()), Some(at(2026, 10, 18, 9, 45)));
        assert_eq!(parse_deadline("lunch at noon", now()), Some(at(2026, 10, 18, 12, 0)));
        assert_eq!(parse_deadline("gym 6pm", now()), Some(at(2026, 10, 18, 18, 0)));
        assert_eq!(parse_deadline("13pm", now()), None);
    }

    #[test]
    fn leftmost_phrase_wins_within_a_line() {
        assert_eq!(
            parse_deadline("friday or maybe tomorrow", now()),
            Some(at(2026, 10, 23, 9, 0))
        );
    }

    #[test]
    fn humanize_buckets() {
        let n = now();
        assert_eq!(humanize_remaining(n + Duration::weeks(10), n), "in 2 months");
        assert_eq!(humanize_remaining(n + Duration::weeks(3), n), "in 3 weeks");
        assert_eq!(humanize_remaining(n + Duration::days(5), n), "in 5 days");
        assert_eq!(humanize_remaining(n + Duration::hours(30), n), "in 30 hours");
        assert_eq!(humanize_remaining(n + Duration::minutes(90), n), "in 90 minutes");
        assert_eq!(humanize_remaining(n - Duration::days(4), n), "4 days late");
        assert_eq!(humanize_remaining(n - Duration::minutes(5), n), "5 minutes late");
    }

    #[test]
    fn humanize_boundaries() {
        let n = now();
        assert_eq!(
            humanize_remaining(n + Duration::weeks(9) - Duration::seconds(1), n),
            "in 8 weeks"
        );
        assert_eq!(humanize_remaining(n + Duration::weeks(9), n), "in 9 weeks");
        assert_eq!(humanize_remaining(n + Duration::weeks(2), n), "in 14 days");
        assert_eq!(humanize_remaining(n + Duration::days(2), n), "in 48 hours");
        assert_eq!(humanize_remaining(n + Duration::hours(2), n), "in 120 minutes");
        assert_eq!(humanize_remaining(n, n), "in 0 minutes");
    }
}
