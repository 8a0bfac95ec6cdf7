use std::path::Path;
use crate::load::GameRecord;
use crate::wrangle::openings::OpeningReference;

mod wrangle_scenarios;
mod pipeline;

pub const SAMPLE_PGN_PATH: &str = "./src/tests/assets/sample.pgn";
pub const OPENINGS_PATH: &str = "./src/tests/assets/openings.csv";
pub const SAMPLE_USER: &str = "alice";

pub fn openings() -> OpeningReference {
    OpeningReference::from_path(Path::new(OPENINGS_PATH)).expect("failed to read opening assets")
}

/// A rated blitz game between `white` and `black`, with nothing else filled in.
pub fn game(white: &str, black: &str, white_elo: &str, black_elo: &str) -> GameRecord {
    GameRecord {
        event: "Rated Blitz game".to_string(),
        white: white.to_string(),
        black: black.to_string(),
        white_elo: white_elo.to_string(),
        black_elo: black_elo.to_string(),
        eco: "C20".to_string(),
        utc_date: "2023.01.15".to_string(),
        utc_time: "12:00:00".to_string(),
        time_control: "300+3".to_string(),
        ..Default::default()
    }
}

pub fn won_by(mut game: GameRecord, winner: &str, loser: &str) -> GameRecord {
    game.winner = Some(winner.to_string());
    game.loser = Some(loser.to_string());
    game
}

pub fn with_rating_diffs(mut game: GameRecord, white: &str, black: &str) -> GameRecord {
    game.white_rating_diff = Some(white.to_string());
    game.black_rating_diff = Some(black.to_string());
    game
}
