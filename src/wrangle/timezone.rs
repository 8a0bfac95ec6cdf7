//! UTC → local time conversion for the `UTCDate` / `UTCTime` PGN tags.
//!
//! Lichess stamps every game in UTC as `YYYY.MM.DD` and `HH:MM:SS`. The cleaner
//! joins both with a space and converts the instant to the caller's zone, then
//! splits it into calendar fields for grouping.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

pub const UTC_DATETIME_FORMAT: &str = "%Y.%m.%d %H:%M:%S";

/// Not an IANA name, but the zone the data set was first cleaned for.
pub const DEFAULT_TIMEZONE: &str = "Egypt/Cairo";

// Legacy names accepted on top of the IANA database.
const TIMEZONE_ALIASES: [(&str, Tz); 1] = [
    ("Egypt/Cairo", chrono_tz::Africa::Cairo),
];

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum TimezoneError {
    #[error("Unknown timezone `{0}`")]
    UnknownTimezone(String),
    #[error("UTC datetime `{0}` does not match `YYYY.MM.DD HH:MM:SS`")]
    InvalidDateTime(String),
}

/// Resolves an IANA zone name, falling back to the legacy aliases.
pub fn resolve_timezone(name: &str) -> Result<Tz, TimezoneError> {
    if let Ok(tz) = name.parse::<Tz>() {
        return Ok(tz);
    }

    TIMEZONE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, tz)| *tz)
        .ok_or_else(|| TimezoneError::UnknownTimezone(name.to_string()))
}

pub fn parse_utc(utc_datetime: &str) -> Result<DateTime<Utc>, TimezoneError> {
    let naive = NaiveDateTime::parse_from_str(utc_datetime, UTC_DATETIME_FORMAT)
        .map_err(|_| TimezoneError::InvalidDateTime(utc_datetime.to_string()))?;

    Ok(Utc.from_utc_datetime(&naive))
}

/// Converts a `YYYY.MM.DD HH:MM:SS` UTC string to the same instant in `tz`.
pub fn utc_to_local(utc_datetime: &str, tz: Tz) -> Result<DateTime<Tz>, TimezoneError> {
    Ok(parse_utc(utc_datetime)?.with_timezone(&tz))
}

/// Inverse of [`utc_to_local`], formatted back into the PGN layout.
pub fn local_to_utc(local: &DateTime<Tz>) -> String {
    local.with_timezone(&Utc).format(UTC_DATETIME_FORMAT).to_string()
}

/// The calendar breakdown of a local game start time.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LocalTimeFields {
    pub date: NaiveDate,
    pub year: String,
    pub month: String,
    pub day: String,
    pub day_of_week: String,
    pub hour: String,
}

impl LocalTimeFields {
    pub fn from_datetime(local: &DateTime<Tz>) -> LocalTimeFields {
        LocalTimeFields {
            date: local.date_naive(),
            year: local.format("%Y").to_string(),
            month: local.format("%b").to_string(),
            day: local.format("%d").to_string(),
            day_of_week: local.format("%A").to_string(),
            hour: local.format("%H").to_string(),
        }
    }
}

#[test]
fn check_default_timezone_resolves_to_cairo() {
    assert_eq!(resolve_timezone(DEFAULT_TIMEZONE), Ok(chrono_tz::Africa::Cairo));
    assert_eq!(resolve_timezone("Europe/Amsterdam"), Ok(chrono_tz::Europe::Amsterdam));
    assert_eq!(
        resolve_timezone("Mars/Olympus_Mons"),
        Err(TimezoneError::UnknownTimezone("Mars/Olympus_Mons".to_string()))
    );
}

#[test]
fn check_utc_to_local_winter_offset() {
    // Amsterdam is UTC+1 in January
    let local = utc_to_local("2023.01.15 23:30:00", chrono_tz::Europe::Amsterdam).unwrap();
    let fields = LocalTimeFields::from_datetime(&local);

    assert_eq!(fields.date, NaiveDate::from_ymd_opt(2023, 1, 16).unwrap());
    assert_eq!(fields.year, "2023");
    assert_eq!(fields.month, "Jan");
    assert_eq!(fields.day, "16");
    assert_eq!(fields.day_of_week, "Monday");
    assert_eq!(fields.hour, "00");
}

#[test]
fn check_utc_to_local_summer_offset() {
    // Amsterdam is UTC+2 in July
    let local = utc_to_local("2023.07.04 08:05:09", chrono_tz::Europe::Amsterdam).unwrap();
    let fields = LocalTimeFields::from_datetime(&local);

    assert_eq!(fields.day, "04");
    assert_eq!(fields.day_of_week, "Tuesday");
    assert_eq!(fields.hour, "10");
}

#[test]
fn check_round_trip_recovers_instant() {
    let zones = [
        chrono_tz::Africa::Cairo,
        chrono_tz::America::New_York,
        chrono_tz::Asia::Kolkata,
        chrono_tz::UTC,
    ];
    let instants = [
        "2021.03.28 01:30:00",
        "2022.11.06 05:59:59",
        "2023.12.31 23:59:59",
        "2024.02.29 12:00:00",
    ];

    for tz in zones {
        for instant in instants {
            let local = utc_to_local(instant, tz).unwrap();
            assert_eq!(local_to_utc(&local), instant, "{tz}");
        }
    }
}

#[test]
fn check_malformed_datetime() {
    assert_eq!(
        utc_to_local("2023-01-15 23:30:00", chrono_tz::UTC),
        Err(TimezoneError::InvalidDateTime("2023-01-15 23:30:00".to_string()))
    );
    assert!(utc_to_local("2023.01.15", chrono_tz::UTC).is_err());
}
