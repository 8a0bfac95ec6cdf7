use std::path::Path;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use crate::archive::ArchivePaths;
use crate::archive::fetch::LichessClient;
use crate::convert;
use crate::table;

/// One row of the `_game_info.csv` table.
///
/// Only the columns the cleaner reads are kept; extra columns are ignored.
/// Cells that can legitimately be empty are `Option`s.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: Option<String>,
    pub event: String,
    pub site: Option<String>,
    pub white: String,
    pub black: String,
    pub white_elo: String,
    pub black_elo: String,
    pub white_rating_diff: Option<String>,
    pub black_rating_diff: Option<String>,
    pub white_title: Option<String>,
    pub black_title: Option<String>,
    pub winner: Option<String>,
    pub loser: Option<String>,
    pub eco: String,
    pub utc_date: String,
    pub utc_time: String,
    pub time_control: String,
    pub termination: Option<String>,
    pub variant: Option<String>,
}

pub fn load_game_info(path: &Path) -> Result<Vec<GameRecord>> {
    let games = table::read_csv(path)?;
    log::info!("Loaded {} games from {}", games.len(), path.display());
    Ok(games)
}

/// Loads the game table, fetching and converting only what is not on disk yet.
pub fn game_table(client: &LichessClient, paths: &ArchivePaths) -> Result<Vec<GameRecord>> {
    if !paths.game_info.exists() {
        if !paths.pgn.exists() {
            client.fetch_archive(&paths.username, &paths.pgn)?;
        } else {
            log::info!("Reusing archive {}", paths.pgn.display());
        }

        convert::export(paths).context("Failed to convert the PGN archive")?;
    } else {
        log::info!("Reusing game table {}", paths.game_info.display());
    }

    load_game_info(&paths.game_info)
}
