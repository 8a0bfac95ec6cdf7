//! Per-row derivation rules for the cleaner.
//!
//! Each function only sees the fields it needs, so every rule can be tested on
//! its own without building a full game record.

use serde::Serialize;

pub const DEFAULT_RATING_DIFF: &str = "0";
pub const DEFAULT_TITLE: &str = "None";
pub const UNRATED_ELO: &str = "?";

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum GameType {
    Casual,
    Rated,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

/// Lichess usernames are case-insensitive, so `Alice` in a PGN tag is the same account as `alice`.
///
/// This is intentionally looser than an exact string comparison.
pub fn same_user(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

pub fn game_type(event: &str) -> GameType {
    match event.contains("Casual") {
        true => GameType::Casual,
        false => GameType::Rated,
    }
}

/// 0 for a standalone game ("Rated Blitz game"), 1 for arena / swiss events.
pub fn in_tournament(event: &str) -> u8 {
    match event.contains("game") {
        true => 0,
        false => 1,
    }
}

pub fn color(white: &str, username: &str) -> Color {
    match same_user(white, username) {
        true => Color::White,
        false => Color::Black,
    }
}

/// Picks the opponent's side of a white/black pair.
pub fn opponent_side<T>(color: Color, white: T, black: T) -> T {
    match color {
        Color::White => black,
        Color::Black => white,
    }
}

/// Picks the tracked user's side of a white/black pair.
pub fn my_side<T>(color: Color, white: T, black: T) -> T {
    match color {
        Color::White => white,
        Color::Black => black,
    }
}

pub fn is_rated(white_elo: &str, black_elo: &str) -> bool {
    white_elo != UNRATED_ELO && black_elo != UNRATED_ELO
}

/// Splits the tracked user's rating change into `(rating_gained, rating_lost)`.
pub fn rating_change(my_rating_diff: i32) -> (i32, i32) {
    match my_rating_diff {
        diff if diff > 0 => (diff, 0),
        diff if diff < 0 => (0, -diff),
        _ => (0, 0),
    }
}

pub fn result(winner: Option<&str>, loser: Option<&str>, username: &str) -> GameResult {
    if winner.is_some_and(|x| same_user(x, username)) {
        GameResult::Win
    } else if loser.is_some_and(|x| same_user(x, username)) {
        GameResult::Loss
    } else {
        GameResult::Draw
    }
}

#[test]
fn check_game_type() {
    assert_eq!(game_type("Casual Blitz game"), GameType::Casual);
    assert_eq!(game_type("Rated Blitz game"), GameType::Rated);
    assert_eq!(game_type("Rated Bullet tournament https://lichess.org/tournament/abc"), GameType::Rated);
}

#[test]
fn check_in_tournament() {
    assert_eq!(in_tournament("Rated Blitz game"), 0);
    assert_eq!(in_tournament("Casual Correspondence game"), 0);
    assert_eq!(in_tournament("Hourly SuperBlitz Arena"), 1);
}

#[test]
fn check_color_and_sides() {
    assert_eq!(color("alice", "alice"), Color::White);
    assert_eq!(color("Alice", "alice"), Color::White);
    assert_eq!(color("bob", "alice"), Color::Black);

    assert_eq!(opponent_side(Color::White, "alice", "bob"), "bob");
    assert_eq!(opponent_side(Color::Black, "alice", "bob"), "alice");
    assert_eq!(my_side(Color::Black, 1500, 1480), 1480);
}

#[test]
fn check_is_rated() {
    assert!(is_rated("1500", "1480"));
    assert!(!is_rated("?", "1480"));
    assert!(!is_rated("1500", "?"));
}

#[test]
fn check_rating_change_has_one_nonzero_side() {
    assert_eq!(rating_change(7), (7, 0));
    assert_eq!(rating_change(-12), (0, 12));
    assert_eq!(rating_change(0), (0, 0));
}

#[test]
fn check_result() {
    assert_eq!(result(Some("alice"), Some("bob"), "alice"), GameResult::Win);
    assert_eq!(result(Some("bob"), Some("ALICE"), "alice"), GameResult::Loss);
    assert_eq!(result(None, None, "alice"), GameResult::Draw);
}

#[test]
fn check_same_user_ignores_case() {
    assert!(same_user("Alice", "alice"));
    assert!(!same_user("alice2", "alice"));
}
