// PGN archive -> `_game_info.csv` + `_moves.csv`

use std::fs;
use anyhow::{Context, Result};
use chrono::Local;
use crate::archive::ArchivePaths;
use crate::convert::rows::{GameInfoRow, MoveRow};
use crate::table;

pub mod pgn;
pub mod rows;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ConvertSummary {
    pub games: usize,
    pub moves: usize,
}

pub fn convert_archive(archive: &str, file_name: &str) -> (Vec<GameInfoRow>, Vec<MoveRow>) {
    let date_created = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let mut game_rows = Vec::new();
    let mut move_rows = Vec::new();

    for (game_id, game) in pgn::split_games(archive).iter().enumerate() {
        let moves = game.moves();

        game_rows.push(GameInfoRow::from_game(game_id, game, moves.len(), file_name, &date_created));
        move_rows.extend(MoveRow::from_moves(game_id, game, &moves));
    }

    (game_rows, move_rows)
}

/// Converts the archive at `paths.pgn` and writes both tables next to it.
pub fn export(paths: &ArchivePaths) -> Result<ConvertSummary> {
    let archive = fs::read_to_string(&paths.pgn)
        .with_context(|| format!("Failed to read {}", paths.pgn.display()))?;

    let (game_rows, move_rows) = convert_archive(&archive, &paths.file_name());

    table::write_csv(&paths.game_info, &game_rows)?;
    table::write_csv(&paths.moves, &move_rows)?;

    log::info!(
        "Converted {} games ({} moves) into {} and {}",
        game_rows.len(),
        move_rows.len(),
        paths.game_info.display(),
        paths.moves.display(),
    );

    Ok(ConvertSummary {
        games: game_rows.len(),
        moves: move_rows.len(),
    })
}
