//! Date/time input from the command line.
//!
//! Times of day are local wall-clock time unless the input carries an offset
//! ("2025-03-20T15:00:00+01:00"). ISO dates and date-times are read directly,
//! anything else goes through fuzzydate ("tomorrow 3pm", "sat", "march 20").
//! Input without a time of day is an all-day date, kept at UTC midnight.

use anyhow::{Context, Result};
use calboard_core::codec;
use chrono::{DateTime, Duration, Local, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// A parsed start or end point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct When {
    pub at: DateTime<Utc>,
    pub all_day: bool,
}

pub fn parse_when(input: &str) -> Result<When> {
    if let Ok(at) = DateTime::parse_from_rfc3339(input.trim()) {
        return Ok(When {
            at: at.with_timezone(&Utc),
            all_day: false,
        });
    }

    let all_day = !has_time_component(input);
    let naive = match codec::parse_naive(input) {
        Some(naive) => naive,
        None => fuzzydate::parse(&expand_short_names(input))
            .map_err(|_| anyhow::anyhow!("Could not parse date/time: \"{}\"", input))?,
    };

    let at = if all_day {
        naive.date().and_time(NaiveTime::MIN).and_utc()
    } else {
        local_to_utc(naive)?
    };

    Ok(When { at, all_day })
}

/// Read a wall-clock time in the local zone. In a DST fold the earlier
/// instant wins; times skipped by a DST gap are rejected.
fn local_to_utc(naive: NaiveDateTime) -> Result<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("{} does not exist in the local time zone", naive))
}

/// Parse an end input. Tries a duration first ("3 days", "90min"), then a
/// date/time, optionally prefixed with "until" or "to".
pub fn parse_end(input: &str, start: &When) -> Result<DateTime<Utc>> {
    if let Ok(end) = apply_duration(start, input) {
        return Ok(end);
    }

    let cleaned = input
        .strip_prefix("until ")
        .or_else(|| input.strip_prefix("to "))
        .unwrap_or(input);

    parse_when(cleaned).map(|when| when.at)
}

pub fn apply_duration(start: &When, dur_input: &str) -> Result<DateTime<Utc>> {
    let std_dur = humantime::parse_duration(dur_input)
        .with_context(|| format!("Could not parse duration: \"{}\"", dur_input))?;
    let chrono_dur = Duration::from_std(std_dur).context("Duration too large")?;
    Ok(start.at + chrono_dur)
}

/// Final end of a slot.
///
/// All-day slots ending on their start day have no end. Timed slots without
/// an explicit end last one hour.
pub fn resolve_end(start: &When, end: Option<DateTime<Utc>>) -> Result<Option<DateTime<Utc>>> {
    let end = match end {
        Some(end) => end,
        None if start.all_day => return Ok(None),
        None => start.at + Duration::hours(1),
    };

    if end < start.at {
        anyhow::bail!("End must not be before start");
    }

    if start.all_day && end.date_naive() == start.at.date_naive() {
        return Ok(None);
    }

    Ok(Some(end))
}

/// Short day and month names fuzzydate only understands spelled out.
const SHORT_NAMES: &[(&[&str], &str)] = &[
    (&["mon"], "monday"),
    (&["tue", "tues"], "tuesday"),
    (&["wed"], "wednesday"),
    (&["thu", "thur", "thurs"], "thursday"),
    (&["fri"], "friday"),
    (&["sat"], "saturday"),
    (&["sun"], "sunday"),
    (&["jan"], "january"),
    (&["feb"], "february"),
    (&["mar"], "march"),
    (&["apr"], "april"),
    (&["jun"], "june"),
    (&["jul"], "july"),
    (&["aug"], "august"),
    (&["sep", "sept"], "september"),
    (&["oct"], "october"),
    (&["nov"], "november"),
    (&["dec"], "december"),
];

/// Lowercase the input and spell out short day and month names.
fn expand_short_names(input: &str) -> String {
    let lower = input.to_lowercase();
    let words: Vec<&str> = lower
        .split_whitespace()
        .map(|word| {
            SHORT_NAMES
                .iter()
                .find(|(short, _)| short.contains(&word))
                .map_or(word, |(_, full)| *full)
        })
        .collect();
    words.join(" ")
}

/// Whether the input names a time of day (am/pm, HH:MM, noon, midnight, "at 3").
fn has_time_component(input: &str) -> bool {
    let lower = input.to_lowercase();

    if lower.contains("noon") || lower.contains("midnight") {
        return true;
    }

    let bytes = lower.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        // "6pm", "6 pm", "11am"
        if (b == b'a' || b == b'p') && bytes.get(i + 1) == Some(&b'm') {
            let digit_before = i > 0 && bytes[i - 1].is_ascii_digit();
            let digit_before_space = i > 1 && bytes[i - 1] == b' ' && bytes[i - 2].is_ascii_digit();
            if digit_before || digit_before_space {
                return true;
            }
        }

        // "15:00"
        if b == b':'
            && i > 0
            && bytes[i - 1].is_ascii_digit()
            && bytes.get(i + 1).is_some_and(|n| n.is_ascii_digit())
        {
            return true;
        }
    }

    let at_digit = |rest: &str| rest.starts_with(|c: char| c.is_ascii_digit());
    if let Some(pos) = lower.find(" at ") {
        if at_digit(&lower[pos + 4..]) {
            return true;
        }
    }
    lower.strip_prefix("at ").is_some_and(at_digit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn utc(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, d, h, 0, 0).unwrap()
    }

    #[test]
    fn time_component_detection() {
        assert!(has_time_component("tomorrow 6pm"));
        assert!(has_time_component("sat 3 pm"));
        assert!(has_time_component("2024-01-05T09:30"));
        assert!(has_time_component("friday noon"));
        assert!(has_time_component("at 9"));
        assert!(has_time_component("tomorrow at 15"));

        assert!(!has_time_component("tomorrow"));
        assert!(!has_time_component("2024-01-05"));
        assert!(!has_time_component("december"));
        assert!(!has_time_component("camp"));
    }

    #[test]
    fn spells_out_short_names() {
        assert_eq!(expand_short_names("sat 3pm"), "saturday 3pm");
        assert_eq!(expand_short_names("Sept 5"), "september 5");
        assert_eq!(expand_short_names("thurs  Dec 1"), "thursday december 1");
        assert_eq!(expand_short_names("next friday"), "next friday");
    }

    #[test]
    fn iso_date_is_all_day() {
        let when = parse_when("2024-01-05").unwrap();
        assert_eq!(when, When { at: utc(5, 0), all_day: true });
    }

    #[test]
    fn iso_datetime_is_local_wall_clock() {
        let naive = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let expected = Local
            .from_local_datetime(&naive)
            .single()
            .unwrap()
            .with_timezone(&Utc);

        let when = parse_when("2024-01-05T09:00").unwrap();
        assert_eq!(when, When { at: expected, all_day: false });
    }

    #[test]
    fn explicit_offset_is_kept() {
        let when = parse_when("2024-01-05T11:00:00+02:00").unwrap();
        assert_eq!(when, When { at: utc(5, 9), all_day: false });
    }

    #[test]
    fn fuzzy_times_are_local() {
        let when = parse_when("tomorrow 3pm").unwrap();
        let local = when.at.with_timezone(&Local);
        assert_eq!(local.time(), NaiveTime::from_hms_opt(15, 0, 0).unwrap());
        assert_eq!(local.date_naive(), Local::now().date_naive().succ_opt().unwrap());
    }

    #[test]
    fn fuzzy_dates() {
        let tomorrow = parse_when("tomorrow").unwrap();
        assert!(tomorrow.all_day);
        assert_eq!(tomorrow.at.time(), NaiveTime::MIN);

    }

    #[test]
    fn invalid_input() {
        assert!(parse_when("not a date at all xyz").is_err());
    }

    #[test]
    fn end_from_duration_or_date() {
        let start = When { at: utc(5, 0), all_day: true };
        assert_eq!(parse_end("2days", &start).unwrap(), utc(7, 0));
        assert_eq!(parse_end("until 2024-01-09", &start).unwrap(), utc(9, 0));
    }

    #[test]
    fn all_day_same_day_end_is_dropped() {
        let start = When { at: utc(5, 0), all_day: true };
        assert_eq!(resolve_end(&start, None).unwrap(), None);
        assert_eq!(resolve_end(&start, Some(utc(5, 0))).unwrap(), None);
        assert_eq!(resolve_end(&start, Some(utc(7, 0))).unwrap(), Some(utc(7, 0)));
    }

    #[test]
    fn timed_default_end_is_one_hour() {
        let start = When { at: utc(5, 9), all_day: false };
        assert_eq!(resolve_end(&start, None).unwrap(), Some(utc(5, 10)));
    }

    #[test]
    fn end_before_start_is_rejected() {
        let start = When { at: utc(5, 9), all_day: false };
        assert!(resolve_end(&start, Some(utc(4, 9))).is_err());
    }
}
