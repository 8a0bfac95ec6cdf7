use std::str::FromStr;
use chess::{Board, ChessMove};
use serde::Serialize;
use crate::convert::pgn::{PgnGame, PgnMove};

// Row types written to the converted tables

const WHITE_WON: &str = "1-0";
const BLACK_WON: &str = "0-1";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GameInfoRow {
    pub game_id: usize,
    pub game_order: usize,
    pub event: String,
    pub site: Option<String>,
    pub date_played: Option<String>,
    pub round: Option<String>,
    pub white: String,
    pub black: String,
    pub result: String,
    pub white_elo: String,
    pub white_rating_diff: Option<String>,
    pub white_title: Option<String>,
    pub black_elo: String,
    pub black_rating_diff: Option<String>,
    pub black_title: Option<String>,
    pub winner: Option<String>,
    pub winner_elo: Option<String>,
    pub loser: Option<String>,
    pub loser_elo: Option<String>,
    pub winner_loser_elo_diff: Option<i32>,
    pub eco: String,
    pub date_created: String,
    pub file_name: String,
    pub utc_date: String,
    pub utc_time: String,
    pub variant: Option<String>,
    pub ply_count: usize,
    pub time_control: String,
    pub termination: Option<String>,
}

impl GameInfoRow {
    pub fn from_game(game_id: usize, game: &PgnGame, ply_count: usize, file_name: &str, date_created: &str) -> GameInfoRow {
        let tag = |key: &str| game.tag(key).map(|x| x.to_string());
        // Lichess writes "?" for an unknown Elo, keep that for games that lack the tag entirely
        let elo = |key: &str| game.tag(key).unwrap_or("?").to_string();

        let white = tag("White").unwrap_or_default();
        let black = tag("Black").unwrap_or_default();
        let white_elo = elo("WhiteElo");
        let black_elo = elo("BlackElo");
        let result = tag("Result").unwrap_or_else(|| "*".to_string());

        let (winner, winner_elo, loser, loser_elo) = match result.as_str() {
            WHITE_WON => (Some(white.clone()), Some(white_elo.clone()), Some(black.clone()), Some(black_elo.clone())),
            BLACK_WON => (Some(black.clone()), Some(black_elo.clone()), Some(white.clone()), Some(white_elo.clone())),
            _ => (None, None, None, None),
        };

        let winner_loser_elo_diff = match (&winner_elo, &loser_elo) {
            (Some(w), Some(l)) => w.parse::<i32>().ok().zip(l.parse::<i32>().ok()).map(|(w, l)| w - l),
            _ => None,
        };

        GameInfoRow {
            game_id,
            game_order: game_id + 1,
            event: tag("Event").unwrap_or_default(),
            site: tag("Site"),
            date_played: tag("Date"),
            round: tag("Round"),
            white,
            black,
            result,
            white_elo,
            white_rating_diff: tag("WhiteRatingDiff"),
            white_title: tag("WhiteTitle"),
            black_elo,
            black_rating_diff: tag("BlackRatingDiff"),
            black_title: tag("BlackTitle"),
            winner,
            winner_elo,
            loser,
            loser_elo,
            winner_loser_elo_diff,
            eco: tag("ECO").unwrap_or_else(|| "?".to_string()),
            date_created: date_created.to_string(),
            file_name: file_name.to_string(),
            utc_date: tag("UTCDate").unwrap_or_default(),
            utc_time: tag("UTCTime").unwrap_or_default(),
            variant: tag("Variant"),
            ply_count,
            time_control: tag("TimeControl").unwrap_or_else(|| "-".to_string()),
            termination: tag("Termination"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MoveRow {
    pub game_id: usize,
    pub move_no: usize,
    pub color: String,
    pub notation: String,
    pub clock: Option<String>,
    pub eval: Option<String>,
    pub fen: Option<String>,
}

impl MoveRow {
    /// Replays the game to attach the position after each move.
    ///
    /// Once a move can't be replayed (variants, broken SAN) the remaining rows get no FEN.
    pub fn from_moves(game_id: usize, game: &PgnGame, moves: &[PgnMove]) -> Vec<MoveRow> {
        let mut board = match game.tag("FEN") {
            Some(fen) => Board::from_str(fen).ok(),
            None => Some(Board::default()),
        };
        let black_starts = board.is_some_and(|x| x.side_to_move() == chess::Color::Black);
        let offset = black_starts as usize;

        if board.is_none() {
            log::debug!("Game {game_id} has an unreadable FEN tag, skipping positions");
        }

        moves.iter().enumerate().map(|(ply, pgn_move)| {
            let next = board.and_then(|x| replay(&x, &pgn_move.san));
            if board.is_some() && next.is_none() {
                log::debug!("Game {game_id}: could not replay `{}`", pgn_move.san);
            }
            board = next;

            MoveRow {
                game_id,
                move_no: (ply + offset) / 2 + 1,
                color: match (ply + offset) % 2 {
                    0 => "white".to_string(),
                    _ => "black".to_string(),
                },
                notation: pgn_move.san.clone(),
                clock: pgn_move.clock.clone(),
                eval: pgn_move.eval.clone(),
                fen: board.map(|x| x.to_string()),
            }
        }).collect()
    }
}

fn replay(board: &Board, san: &str) -> Option<Board> {
    // `chess` wants promotions as `a8Q`, Lichess writes `a8=Q`
    let san = san
        .trim_end_matches(|c: char| matches!(c, '+' | '#' | '!' | '?'))
        .replace('=', "");
    let chess_move = ChessMove::from_san(board, &san).ok()?;

    Some(board.make_move_new(chess_move))
}

#[test]
fn check_promotion_is_replayed() {
    let game = PgnGame {
        tags: vec![("FEN".to_string(), "8/P7/8/8/8/8/8/k6K w - - 0 1".to_string())],
        movetext: "1. a8=Q+ Kb2 2. Qb8+ *".to_string(),
    };
    let rows = MoveRow::from_moves(0, &game, &game.moves());

    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|x| x.fen.is_some()), "{rows:?}");

    let fen = rows[0].fen.as_deref().unwrap_or_default();
    assert!(fen.starts_with("Q7/8/8/8/8/8/8/k6K b"), "{fen}");
    assert_eq!(rows[2].notation, "Qb8+");
}
