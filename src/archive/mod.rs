use std::path::{Path, PathBuf};
use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDateTime};

pub mod fetch;

pub const DATA_DIR: &str = "data";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H.%M.%S";

pub const PGN_EXTENSION: &str = "pgn";
pub const GAME_INFO_SUFFIX: &str = "_game_info.csv";
pub const MOVES_SUFFIX: &str = "_moves.csv";
pub const CLEANED_SUFFIX: &str = "_cleaned.csv";

/// Where one run keeps its files: `<data_dir>/<timestamp>-<username>.pgn` plus the
/// tables converted from it, all sharing the same basename.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ArchivePaths {
    pub username: String,
    pub basename: String,
    pub pgn: PathBuf,
    pub game_info: PathBuf,
    pub moves: PathBuf,
}

impl ArchivePaths {
    pub fn new(data_dir: &Path, username: &str) -> ArchivePaths {
        ArchivePaths::at(data_dir, username, Local::now().naive_local())
    }

    pub fn at(data_dir: &Path, username: &str, timestamp: NaiveDateTime) -> ArchivePaths {
        let basename = format!("{}-{}", timestamp.format(TIMESTAMP_FORMAT), username);
        ArchivePaths::from_basename(data_dir, username, basename)
    }

    /// Reuses an archive downloaded by an earlier run.
    pub fn from_pgn(pgn: &Path, username: &str) -> Result<ArchivePaths> {
        let basename = pgn
            .file_stem()
            .and_then(|x| x.to_str())
            .ok_or_else(|| anyhow!("Not a PGN file path: {}", pgn.display()))?;
        let data_dir = pgn.parent().unwrap_or(Path::new(""));

        Ok(ArchivePaths::from_basename(data_dir, username, basename.to_string()))
    }

    fn from_basename(data_dir: &Path, username: &str, basename: String) -> ArchivePaths {
        ArchivePaths {
            username: username.to_string(),
            pgn: data_dir.join(format!("{basename}.{PGN_EXTENSION}")),
            game_info: data_dir.join(format!("{basename}{GAME_INFO_SUFFIX}")),
            moves: data_dir.join(format!("{basename}{MOVES_SUFFIX}")),
            basename,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.{PGN_EXTENSION}", self.basename)
    }

    pub fn cleaned(&self) -> PathBuf {
        self.pgn.with_file_name(format!("{}{CLEANED_SUFFIX}", self.basename))
    }
}

#[test]
fn check_paths_share_basename() {
    let timestamp = chrono::NaiveDate::from_ymd_opt(2023, 4, 1)
        .unwrap()
        .and_hms_opt(9, 5, 30)
        .unwrap();
    let paths = ArchivePaths::at(Path::new("data"), "alice", timestamp);

    assert_eq!(paths.basename, "2023-04-01T09.05.30-alice");
    assert_eq!(paths.pgn, PathBuf::from("data/2023-04-01T09.05.30-alice.pgn"));
    assert_eq!(paths.game_info, PathBuf::from("data/2023-04-01T09.05.30-alice_game_info.csv"));
    assert_eq!(paths.moves, PathBuf::from("data/2023-04-01T09.05.30-alice_moves.csv"));
    assert_eq!(paths.cleaned(), PathBuf::from("data/2023-04-01T09.05.30-alice_cleaned.csv"));
    assert_eq!(paths.file_name(), "2023-04-01T09.05.30-alice.pgn");
}

#[test]
fn check_from_pgn_round_trips() {
    let timestamp = chrono::NaiveDate::from_ymd_opt(2022, 12, 31)
        .unwrap()
        .and_hms_opt(23, 59, 59)
        .unwrap();
    let paths = ArchivePaths::at(Path::new("data"), "bob", timestamp);

    assert_eq!(ArchivePaths::from_pgn(&paths.pgn, "bob").unwrap(), paths);
}
