use std::fs;
use std::path::Path;
use anyhow::Result;
use tempfile::TempDir;
use crate::archive::ArchivePaths;
use crate::archive::fetch::LichessClient;
use crate::convert;
use crate::load;
use crate::table;
use crate::tests::{openings, SAMPLE_PGN_PATH, SAMPLE_USER};
use crate::wrangle::chess_type::ChessType;
use crate::wrangle::derive::{Color, GameResult, GameType};
use crate::wrangle::Wrangle;

// Never reachable, so any attempt to fetch fails the test
const OFFLINE_HOST: &str = "offline.invalid";

fn archive_in(dir: &TempDir) -> ArchivePaths {
    let timestamp = chrono::NaiveDate::from_ymd_opt(2023, 5, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let paths = ArchivePaths::at(dir.path(), SAMPLE_USER, timestamp);

    fs::copy(SAMPLE_PGN_PATH, &paths.pgn).expect("failed to copy sample archive");
    paths
}

#[test]
fn check_convert_writes_both_tables() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let paths = archive_in(&dir);

    let summary = convert::export(&paths)?;
    assert_eq!(summary.games, 5);
    assert_eq!(summary.moves, 7 + 4 + 4 + 2 + 6);

    let games = load::load_game_info(&paths.game_info)?;
    assert_eq!(games.len(), 5);
    assert_eq!(games[0].winner.as_deref(), Some("alice"));
    assert_eq!(games[0].loser.as_deref(), Some("bob"));
    assert_eq!(games[0].white_rating_diff.as_deref(), Some("+6"));
    assert_eq!(games[0].white_title, None);
    assert_eq!(games[1].white_title.as_deref(), Some("FM"));
    assert_eq!(games[2].black_elo, "?");
    assert_eq!(games[3].winner, None);
    assert_eq!(games[4].time_control, "-");

    let move_lines = fs::read_to_string(&paths.moves)?.lines().count();
    assert_eq!(move_lines, summary.moves + 1);

    Ok(())
}

#[test]
fn check_move_rows_track_positions() -> Result<()> {
    let (_, moves) = convert::convert_archive(&fs::read_to_string(SAMPLE_PGN_PATH)?, "sample.pgn");

    let first_game = moves.iter().filter(|x| x.game_id == 0).collect::<Vec<_>>();
    assert_eq!(first_game.len(), 7);

    assert_eq!(first_game[0].move_no, 1);
    assert_eq!(first_game[0].color, "white");
    assert_eq!(first_game[0].notation, "e4");
    assert_eq!(first_game[0].clock.as_deref(), Some("0:05:00"));
    assert_eq!(first_game[0].eval.as_deref(), Some("0.36"));
    let fen = first_game[0].fen.as_deref().unwrap_or_default();
    assert!(fen.starts_with("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b"), "{fen}");

    assert_eq!(first_game[1].move_no, 1);
    assert_eq!(first_game[1].color, "black");

    let mate = first_game[6];
    assert_eq!(mate.move_no, 4);
    assert_eq!(mate.notation, "Qxf7#");
    assert_eq!(mate.eval, None);
    assert!(mate.fen.is_some());

    // Correspondence game without any comments
    let last_game = moves.iter().filter(|x| x.game_id == 4).collect::<Vec<_>>();
    assert!(last_game.iter().all(|x| x.clock.is_none() && x.fen.is_some()));
    Ok(())
}

#[test]
fn check_game_table_converts_existing_archive_without_fetching() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let paths = archive_in(&dir);
    let client = LichessClient::new(OFFLINE_HOST)?;

    assert!(!paths.game_info.exists());
    let games = load::game_table(&client, &paths)?;

    assert_eq!(games.len(), 5);
    assert!(paths.game_info.exists());
    assert!(paths.moves.exists());
    Ok(())
}

#[test]
fn check_game_table_reuses_converted_table() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let paths = archive_in(&dir);
    let client = LichessClient::new(OFFLINE_HOST)?;

    let games = load::game_table(&client, &paths)?;
    table::write_csv(&paths.game_info, &games[..2])?;

    // The shortened table is read back as-is: nothing was converted again
    assert_eq!(load::game_table(&client, &paths)?.len(), 2);
    Ok(())
}

#[test]
fn check_missing_archive_triggers_fetch() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let paths = ArchivePaths::new(dir.path(), SAMPLE_USER);
    let client = LichessClient::new(OFFLINE_HOST)?;

    assert!(load::game_table(&client, &paths).is_err());
    assert!(!paths.pgn.exists());
    Ok(())
}

#[test]
fn check_missing_game_table_fails_to_load() {
    assert!(load::load_game_info(Path::new("./src/tests/assets/missing_game_info.csv")).is_err());
}

#[test]
fn check_full_pipeline() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let paths = archive_in(&dir);
    let client = LichessClient::new(OFFLINE_HOST)?;

    let games = load::game_table(&client, &paths)?;
    let cleaned = Wrangle::new(SAMPLE_USER, chrono_tz::UTC, openings()).wrangle(games)?;

    // The anonymous opponent in game 3 has no rating
    assert_eq!(cleaned.len(), 4);

    let summary = cleaned
        .iter()
        .map(|x| (x.game_id, x.color, x.result, x.chess_type, x.in_tournament, x.elo_diff))
        .collect::<Vec<_>>();
    assert_eq!(summary, vec![
        (0, Color::White, GameResult::Win, ChessType::Blitz, 0, 20),
        (1, Color::Black, GameResult::Loss, ChessType::Bullet, 0, -110),
        (2, Color::Black, GameResult::Draw, ChessType::Classical, 1, -188),
        (3, Color::White, GameResult::Loss, ChessType::Classical, 0, -200),
    ]);

    assert_eq!(cleaned[1].opponent_title, "FM");
    assert_eq!(cleaned[1].rating_lost, 9);
    assert_eq!(cleaned[2].rating_gained, 1);
    assert_eq!(cleaned[2].opening, "Unknown");
    assert_eq!(cleaned[3].game_type, GameType::Casual);
    assert_eq!(cleaned[3].opening, "Italian Game");
    assert_eq!(cleaned[0].site.as_deref(), Some("https://lichess.org/aaaaaaaa"));
    assert_eq!(cleaned[0].termination.as_deref(), Some("Normal"));

    let out = paths.cleaned();
    table::write_csv(&out, &cleaned)?;
    let written = fs::read_to_string(&out)?;
    let mut lines = written.lines();

    assert_eq!(
        lines.next(),
        Some("game_id,site,variant,time_control,termination,game_type,chess_type,in_tournament,color,opponent_username,opponent_title,my_elo,opponent_elo,elo_diff,rating_gained,rating_lost,result,opening,date,year,month,day,day_of_week,hour")
    );
    assert_eq!(
        lines.next(),
        Some("0,https://lichess.org/aaaaaaaa,Standard,300+3,Normal,Rated,Blitz,0,white,bob,None,1500,1480,20,6,0,win,King's Pawn Game,2023-01-15,2023,Jan,15,Sunday,23")
    );
    assert_eq!(lines.count(), 3);

    Ok(())
}
