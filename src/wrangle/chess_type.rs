use std::fmt::{Display, Formatter};
use serde::Serialize;
use thiserror::Error;

/// The Lichess speed buckets, decided on the base time only.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum ChessType {
    UltraBullet,
    Bullet,
    Blitz,
    Rapid,
    Classical,
}

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum TimeControlError {
    #[error("Time control `{0}` has no `+` separating base and increment")]
    MissingIncrement(String),
    #[error("Time control `{0}` has non-numeric base seconds")]
    InvalidSeconds(String),
}

// "-" is what Lichess writes for correspondence / unlimited games
pub const NO_TIME_CONTROL: &str = "-";

impl ChessType {
    pub fn from_seconds(seconds: u32) -> ChessType {
        match seconds {
            0..=29 => ChessType::UltraBullet,
            30..=179 => ChessType::Bullet,
            180..=599 => ChessType::Blitz,
            600..=1799 => ChessType::Rapid,
            _ => ChessType::Classical,
        }
    }

    /// Classifies a `"<seconds>+<increment>"` time control string.
    pub fn from_time_control(time_control: &str) -> Result<ChessType, TimeControlError> {
        if time_control == NO_TIME_CONTROL {
            return Ok(ChessType::Classical);
        }

        let (seconds, _increment) = time_control
            .split_once('+')
            .ok_or_else(|| TimeControlError::MissingIncrement(time_control.to_string()))?;

        let seconds = seconds
            .trim()
            .parse::<u32>()
            .map_err(|_| TimeControlError::InvalidSeconds(time_control.to_string()))?;

        Ok(ChessType::from_seconds(seconds))
    }
}

impl Display for ChessType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ChessType::UltraBullet => write!(f, "UltraBullet"),
            ChessType::Bullet => write!(f, "Bullet"),
            ChessType::Blitz => write!(f, "Blitz"),
            ChessType::Rapid => write!(f, "Rapid"),
            ChessType::Classical => write!(f, "Classical"),
        }
    }
}

#[test]
fn check_no_time_control() {
    assert_eq!(ChessType::from_time_control("-"), Ok(ChessType::Classical));
}

#[test]
fn check_bucket_boundaries() {
    let cases = [
        (0, ChessType::UltraBullet),
        (29, ChessType::UltraBullet),
        (30, ChessType::Bullet),
        (179, ChessType::Bullet),
        (180, ChessType::Blitz),
        (599, ChessType::Blitz),
        (600, ChessType::Rapid),
        (1799, ChessType::Rapid),
        (1800, ChessType::Classical),
        (10800, ChessType::Classical),
    ];

    for (seconds, expected) in cases {
        let time_control = format!("{seconds}+0");
        assert_eq!(ChessType::from_time_control(&time_control), Ok(expected), "{time_control}");
    }
}

#[test]
fn check_increment_is_ignored() {
    assert_eq!(ChessType::from_time_control("300+3"), Ok(ChessType::Blitz));
    assert_eq!(ChessType::from_time_control("120+60"), Ok(ChessType::Bullet));
}

#[test]
fn check_malformed_time_control() {
    assert_eq!(
        ChessType::from_time_control("300"),
        Err(TimeControlError::MissingIncrement("300".to_string()))
    );
    assert_eq!(
        ChessType::from_time_control("abc+2"),
        Err(TimeControlError::InvalidSeconds("abc+2".to_string()))
    );
    assert!(ChessType::from_time_control("").is_err());
}

#[test]
fn check_display_matches_lichess_names() {
    assert_eq!(ChessType::UltraBullet.to_string(), "UltraBullet");
    assert_eq!(ChessType::Classical.to_string(), "Classical");
}
