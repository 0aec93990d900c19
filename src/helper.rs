use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::environment::timezones::TimezoneTable;
use crate::environment::types::{Event, TimezoneId, Trip, TripDay};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

const NAIVE_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Reformat to `YYYY-MM-DD`. Only the format changes, an offset-bearing
/// timestamp keeps the calendar date it was written with.
/// Empty or unreadable values are returned as they came.
pub fn format_date(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    match parse_wall_clock(value) {
        Some(parsed) => parsed.format(DATE_FORMAT).to_string(),
        None => {
            log::trace!("Leaving unreadable date {value:?} untouched");
            value.to_string()
        }
    }
}

/// Reformat to `YYYY-MM-DD HH:mm` without any timezone shift
pub fn format_date_time(value: &str) -> String {
    if value.is_empty() {
        return String::new();
    }
    match parse_wall_clock(value) {
        Some(parsed) => parsed.format(DATE_TIME_FORMAT).to_string(),
        None => {
            log::trace!("Leaving unreadable timestamp {value:?} untouched");
            value.to_string()
        }
    }
}

/// Read a UTC timestamp and format it as wall-clock time at `offset`
pub fn format_local_date_time(value: &str, offset: FixedOffset) -> String {
    if value.is_empty() {
        return String::new();
    }
    match parse_utc(value) {
        Some(parsed) => parsed
            .with_timezone(&offset)
            .format(DATE_TIME_FORMAT)
            .to_string(),
        None => value.to_string(),
    }
}

/// Shift a freshly created event into the timezone of its trip
pub fn parse_to_local_time(
    event: &Event,
    timezone_id: TimezoneId,
    timezones: &TimezoneTable,
) -> Event {
    let offset = timezones.offset(timezone_id);
    Event {
        start_time: format_local_date_time(&event.start_time, offset),
        end_time: format_local_date_time(&event.end_time, offset),
        ..event.clone()
    }
}

/// Trips in the list only carry their two dates
pub fn normalize_trip_summary(trip: Trip) -> Trip {
    Trip {
        start_date: format_date(&trip.start_date),
        end_date: format_date(&trip.end_date),
        ..trip
    }
}

/// The server already localized event times on this path, so it's formatting only
pub fn normalize_trip_detail(trip: Trip) -> Trip {
    let trip_day = trip.trip_day.iter().map(normalize_trip_day).collect();
    Trip {
        start_date: format_date(&trip.start_date),
        end_date: format_date(&trip.end_date),
        trip_day,
        ..trip
    }
}

fn normalize_trip_day(day: &TripDay) -> TripDay {
    TripDay {
        trip_date: format_date(&day.trip_date),
        events: day
            .events
            .iter()
            .map(|event| Event {
                start_time: format_date_time(&event.start_time),
                end_time: format_date_time(&event.end_time),
                ..event.clone()
            })
            .collect(),
        ..day.clone()
    }
}

fn parse_wall_clock(value: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_local());
    }
    parse_naive(value)
}

fn parse_utc(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    parse_naive(value).map(|naive| Utc.from_utc_datetime(&naive))
}

fn parse_naive(value: &str) -> Option<NaiveDateTime> {
    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

// Serde helpers for the loosely typed server payloads

/// `0` / `1`, `true` / `false`, `"1"` / `"true"` or `null`
pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(flag) => flag,
        Value::Number(number) => number.as_i64() == Some(1),
        Value::String(text) => text == "1" || text == "true",
        _ => false,
    })
}

pub fn deserialize_nullable_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Error messages are usually strings, but some endpoints send an object
pub fn deserialize_message<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(message)) => Some(message),
        Some(Value::Object(map)) => match map.get("message") {
            Some(Value::String(message)) => Some(message.clone()),
            _ => Some(Value::Object(map).to_string()),
        },
        Some(other) => Some(other.to_string()),
    })
}
