use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serializer};
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, Weekday};

use crate::ValidationError;

/// Parses `YYYY-MM-DD`, ignoring any time-of-day suffix
/// (`2024-01-02T00:00:00.000` and `2024-01-02 00:00:00` are accepted).
pub fn parse_date(input: &str) -> Result<Date, ValidationError> {
    let trimmed = input.trim();
    let head = trimmed.get(..10).unwrap_or(trimmed);
    Date::parse(head, format_description!("[year]-[month]-[day]")).map_err(|_| {
        ValidationError::InvalidDate {
            value: input.to_owned(),
        }
    })
}

pub fn date_from_unix_seconds(seconds: i64) -> Result<Date, ValidationError> {
    OffsetDateTime::from_unix_timestamp(seconds)
        .map(OffsetDateTime::date)
        .map_err(|_| ValidationError::InvalidDate {
            value: seconds.to_string(),
        })
}

pub fn date_from_unix_millis(millis: i64) -> Result<Date, ValidationError> {
    date_from_unix_seconds(millis.div_euclid(1_000))
}

pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

pub fn is_trading_day(date: Date) -> bool {
    !matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday)
}

pub fn days_before(date: Date, days: i64) -> Date {
    date.checked_sub(Duration::days(days)).unwrap_or(Date::MIN)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DateRepr {
    Text(String),
    Millis(i64),
}

/// Serde adapter writing `YYYY-MM-DD` and reading either a date string or
/// epoch milliseconds (the two layouts snapshot writers emit).
pub mod iso_date {
    use super::*;

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(date)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        match DateRepr::deserialize(deserializer)? {
            DateRepr::Text(text) => parse_date(&text).map_err(D::Error::custom),
            DateRepr::Millis(millis) => date_from_unix_millis(millis).map_err(D::Error::custom),
        }
    }
}
