// Turns the raw game-info table into one row per rated game, seen from the tracked user's side.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Serialize;
use thiserror::Error;
use crate::load::GameRecord;
use crate::wrangle::chess_type::ChessType;
use crate::wrangle::derive::{Color, GameResult, GameType, DEFAULT_RATING_DIFF, DEFAULT_TITLE};
use crate::wrangle::openings::OpeningReference;
use crate::wrangle::timezone::LocalTimeFields;

pub mod chess_type;
pub mod derive;
pub mod openings;
pub mod timezone;

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum WrangleError {
    #[error("Elo `{0}` is not a number")]
    InvalidElo(String),
    #[error("Rating diff `{0}` is not a number")]
    InvalidRatingDiff(String),
}

/// A cleaned game. Raw white/black columns are folded into the tracked user's perspective.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CleanedGame {
    pub game_id: usize,
    pub site: Option<String>,
    pub variant: Option<String>,
    pub time_control: String,
    pub termination: Option<String>,
    pub game_type: GameType,
    pub chess_type: ChessType,
    pub in_tournament: u8,
    pub color: Color,
    pub opponent_username: String,
    pub opponent_title: String,
    pub my_elo: i32,
    pub opponent_elo: i32,
    pub elo_diff: i32,
    pub rating_gained: i32,
    pub rating_lost: i32,
    pub result: GameResult,
    pub opening: String,
    pub date: NaiveDate,
    pub year: String,
    pub month: String,
    pub day: String,
    pub day_of_week: String,
    pub hour: String,
}

pub struct Wrangle {
    username: String,
    timezone: Tz,
    openings: OpeningReference,
}

impl Wrangle {
    pub fn new(username: impl Into<String>, timezone: Tz, openings: OpeningReference) -> Wrangle {
        Wrangle {
            username: username.into(),
            timezone,
            openings,
        }
    }

    /// Cleans the whole table. Unrated games are dropped, any other bad row fails the run.
    pub fn wrangle(&self, games: Vec<GameRecord>) -> Result<Vec<CleanedGame>> {
        let total = games.len();
        let mut cleaned = Vec::with_capacity(total);

        for (row, game) in games.into_iter().enumerate() {
            // Classified before the Elo filter, so unrated rows must carry a valid time control too
            let chess_type = ChessType::from_time_control(&game.time_control)
                .with_context(|| format!("Failed to classify game {row}"))?;

            if !derive::is_rated(&game.white_elo, &game.black_elo) {
                log::debug!("Skipping unrated game {row} ({} vs {})", game.white, game.black);
                continue;
            }

            let game_id = cleaned.len();
            let game = self.clean_game(game, game_id, chess_type)
                .with_context(|| format!("Failed to clean game {row}"))?;

            cleaned.push(game);
        }

        log::info!(
            "Cleaned {} of {} games for {} ({} unrated dropped)",
            cleaned.len(),
            total,
            self.username,
            total - cleaned.len(),
        );

        Ok(cleaned)
    }

    fn clean_game(&self, game: GameRecord, game_id: usize, chess_type: ChessType) -> Result<CleanedGame> {
        let color = derive::color(&game.white, &self.username);

        let white_title = game.white_title.unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let black_title = game.black_title.unwrap_or_else(|| DEFAULT_TITLE.to_string());

        let white_elo = parse_elo(&game.white_elo)?;
        let black_elo = parse_elo(&game.black_elo)?;
        let my_elo = derive::my_side(color, white_elo, black_elo);
        let opponent_elo = derive::opponent_side(color, white_elo, black_elo);

        let white_rating_diff = parse_rating_diff(game.white_rating_diff.as_deref())?;
        let black_rating_diff = parse_rating_diff(game.black_rating_diff.as_deref())?;
        let (rating_gained, rating_lost) =
            derive::rating_change(derive::my_side(color, white_rating_diff, black_rating_diff));

        let result = derive::result(game.winner.as_deref(), game.loser.as_deref(), &self.username);
        let opening = self.openings.name(&game.eco)?.to_string();

        let utc_datetime = format!("{} {}", game.utc_date, game.utc_time);
        let local = timezone::utc_to_local(&utc_datetime, self.timezone)?;
        let local_time = LocalTimeFields::from_datetime(&local);

        Ok(CleanedGame {
            game_id,
            site: game.site,
            variant: game.variant,
            time_control: game.time_control,
            termination: game.termination,
            game_type: derive::game_type(&game.event),
            chess_type,
            in_tournament: derive::in_tournament(&game.event),
            color,
            opponent_username: derive::opponent_side(color, game.white, game.black),
            opponent_title: derive::opponent_side(color, white_title, black_title),
            my_elo,
            opponent_elo,
            elo_diff: my_elo - opponent_elo,
            rating_gained,
            rating_lost,
            result,
            opening,
            date: local_time.date,
            year: local_time.year,
            month: local_time.month,
            day: local_time.day,
            day_of_week: local_time.day_of_week,
            hour: local_time.hour,
        })
    }
}

fn parse_elo(elo: &str) -> Result<i32, WrangleError> {
    elo.trim().parse().map_err(|_| WrangleError::InvalidElo(elo.to_string()))
}

// Lichess writes gains with an explicit sign, e.g. "+7"
fn parse_rating_diff(diff: Option<&str>) -> Result<i32, WrangleError> {
    let diff = diff.unwrap_or(DEFAULT_RATING_DIFF);
    diff.trim().parse().map_err(|_| WrangleError::InvalidRatingDiff(diff.to_string()))
}

#[test]
fn check_parse_rating_diff() {
    assert_eq!(parse_rating_diff(Some("+7")), Ok(7));
    assert_eq!(parse_rating_diff(Some("-12")), Ok(-12));
    assert_eq!(parse_rating_diff(None), Ok(0));
    assert_eq!(parse_rating_diff(Some("x")), Err(WrangleError::InvalidRatingDiff("x".to_string())));
}

#[test]
fn check_parse_elo() {
    assert_eq!(parse_elo("1500"), Ok(1500));
    assert_eq!(parse_elo("?"), Err(WrangleError::InvalidElo("?".to_string())));
}
