use anyhow::Result;
use chrono::NaiveDate;
use crate::tests::{game, openings, with_rating_diffs, won_by, SAMPLE_USER};
use crate::wrangle::chess_type::{ChessType, TimeControlError};
use crate::wrangle::derive::{Color, GameResult, GameType};
use crate::wrangle::openings::OpeningError;
use crate::wrangle::Wrangle;

fn wrangler(timezone: chrono_tz::Tz) -> Wrangle {
    Wrangle::new(SAMPLE_USER, timezone, openings())
}

#[test]
fn check_rated_blitz_win_as_white() -> Result<()> {
    let row = won_by(game("alice", "bob", "1500", "1480"), "alice", "bob");

    let cleaned = wrangler(chrono_tz::UTC).wrangle(vec![row])?;
    assert_eq!(cleaned.len(), 1);

    let cleaned = &cleaned[0];
    assert_eq!(cleaned.game_type, GameType::Rated);
    assert_eq!(cleaned.chess_type, ChessType::Blitz);
    assert_eq!(cleaned.in_tournament, 0);
    assert_eq!(cleaned.color, Color::White);
    assert_eq!(cleaned.result, GameResult::Win);
    assert_eq!(cleaned.my_elo, 1500);
    assert_eq!(cleaned.opponent_elo, 1480);
    assert_eq!(cleaned.elo_diff, 20);
    assert_eq!(cleaned.opponent_username, "bob");
    assert_eq!(cleaned.opponent_title, "None");
    assert_eq!(cleaned.opening, "King's Pawn Game");
    Ok(())
}

#[test]
fn check_loss_as_black_uses_black_side() -> Result<()> {
    let mut row = won_by(game("carol", "alice", "1620", "1510"), "carol", "alice");
    row = with_rating_diffs(row, "+5", "-9");
    row.white_title = Some("FM".to_string());

    let cleaned = &wrangler(chrono_tz::UTC).wrangle(vec![row])?[0];

    assert_eq!(cleaned.color, Color::Black);
    assert_eq!(cleaned.opponent_username, "carol");
    assert_eq!(cleaned.opponent_title, "FM");
    assert_eq!(cleaned.my_elo, 1510);
    assert_eq!(cleaned.opponent_elo, 1620);
    assert_eq!(cleaned.elo_diff, -110);
    assert_eq!(cleaned.rating_gained, 0);
    assert_eq!(cleaned.rating_lost, 9);
    assert_eq!(cleaned.result, GameResult::Loss);
    Ok(())
}

#[test]
fn check_unrated_game_is_excluded() -> Result<()> {
    let rows = vec![
        game("alice", "bob", "?", "1480"),
        game("alice", "bob", "1500", "1480"),
        game("carol", "alice", "1620", "?"),
        game("?", "alice", "?", "?"),
        game("alice", "dave", "1500", "1700"),
    ];
    let unrated = rows.iter().filter(|x| x.white_elo == "?" || x.black_elo == "?").count();
    let total = rows.len();

    let cleaned = wrangler(chrono_tz::UTC).wrangle(rows)?;

    assert_eq!(total - cleaned.len(), unrated);
    assert_eq!(cleaned[0].opponent_username, "bob");
    assert_eq!(cleaned[1].opponent_username, "dave");
    Ok(())
}

#[test]
fn check_output_invariants() -> Result<()> {
    let rows = vec![
        with_rating_diffs(won_by(game("alice", "bob", "1500", "1480"), "alice", "bob"), "+6", "-6"),
        with_rating_diffs(won_by(game("bob", "alice", "1490", "1506"), "bob", "alice"), "+7", "-7"),
        with_rating_diffs(game("alice", "carol", "1499", "1499"), "0", "0"),
        game("alice", "erin", "?", "1700"),
        with_rating_diffs(game("dave", "alice", "1700", "1499"), "-2", "+2"),
    ];

    let cleaned = wrangler(chrono_tz::UTC).wrangle(rows)?;

    let ids = cleaned.iter().map(|x| x.game_id).collect::<Vec<_>>();
    assert_eq!(ids, (0..cleaned.len()).collect::<Vec<_>>());

    for row in cleaned.iter() {
        assert!(matches!(row.color, Color::White | Color::Black));
        assert!(matches!(row.result, GameResult::Win | GameResult::Loss | GameResult::Draw));
        assert!(row.rating_gained == 0 || row.rating_lost == 0, "{row:?}");
        assert!(row.rating_gained >= 0 && row.rating_lost >= 0);
    }

    let changes = cleaned.iter().map(|x| (x.rating_gained, x.rating_lost)).collect::<Vec<_>>();
    assert_eq!(changes, vec![(6, 0), (0, 7), (0, 0), (2, 0)]);
    Ok(())
}

#[test]
fn check_missing_columns_get_defaults() -> Result<()> {
    let mut row = game("alice", "bob", "1500", "1480");
    row.event = "Casual Rapid game".to_string();
    row.time_control = "900+10".to_string();

    let cleaned = &wrangler(chrono_tz::UTC).wrangle(vec![row])?[0];

    assert_eq!(cleaned.game_type, GameType::Casual);
    assert_eq!(cleaned.chess_type, ChessType::Rapid);
    assert_eq!(cleaned.opponent_title, "None");
    assert_eq!((cleaned.rating_gained, cleaned.rating_lost), (0, 0));
    assert_eq!(cleaned.result, GameResult::Draw);
    Ok(())
}

#[test]
fn check_tournament_and_unknown_opening() -> Result<()> {
    let mut row = game("alice", "bob", "1500", "1480");
    row.event = "Hourly Bullet Arena".to_string();
    row.time_control = "60+0".to_string();
    row.eco = "?".to_string();

    let cleaned = &wrangler(chrono_tz::UTC).wrangle(vec![row])?[0];

    assert_eq!(cleaned.in_tournament, 1);
    assert_eq!(cleaned.chess_type, ChessType::Bullet);
    assert_eq!(cleaned.opening, "Unknown");
    Ok(())
}

#[test]
fn check_local_time_fields() -> Result<()> {
    let mut row = game("alice", "bob", "1500", "1480");
    row.utc_date = "2023.01.15".to_string();
    row.utc_time = "23:30:00".to_string();

    // Cairo is UTC+2 in January
    let cleaned = &wrangler(chrono_tz::Africa::Cairo).wrangle(vec![row])?[0];

    assert_eq!(cleaned.date, NaiveDate::from_ymd_opt(2023, 1, 16).unwrap());
    assert_eq!(cleaned.year, "2023");
    assert_eq!(cleaned.month, "Jan");
    assert_eq!(cleaned.day, "16");
    assert_eq!(cleaned.day_of_week, "Monday");
    assert_eq!(cleaned.hour, "01");
    Ok(())
}

#[test]
fn check_unresolvable_opening_fails_the_run() {
    let mut row = game("alice", "bob", "1500", "1480");
    row.eco = "E99".to_string();

    let error = wrangler(chrono_tz::UTC).wrangle(vec![row]).unwrap_err();
    assert_eq!(
        error.downcast_ref::<OpeningError>(),
        Some(&OpeningError::UnknownCode("E99".to_string()))
    );
}

#[test]
fn check_malformed_time_control_fails_even_when_unrated() {
    let mut row = game("alice", "bob", "?", "1480");
    row.time_control = "blitz".to_string();

    let error = wrangler(chrono_tz::UTC).wrangle(vec![row]).unwrap_err();
    assert_eq!(
        error.downcast_ref::<TimeControlError>(),
        Some(&TimeControlError::MissingIncrement("blitz".to_string()))
    );
}

#[test]
fn check_non_numeric_elo_fails_the_run() {
    let row = game("alice", "bob", "1500", "");
    assert!(wrangler(chrono_tz::UTC).wrangle(vec![row]).is_err());
}

#[test]
fn check_empty_table() -> Result<()> {
    assert!(wrangler(chrono_tz::UTC).wrangle(vec![])?.is_empty());
    Ok(())
}
