use std::path::PathBuf;
use anyhow::Result;
use chrono_tz::Tz;
use clap::Parser;
use log::LevelFilter;
use crate::archive::{ArchivePaths, DATA_DIR};
use crate::archive::fetch::LICHESS_HOST;
use crate::wrangle::openings::OPENING_REFERENCE_PATH;
use crate::wrangle::timezone::{resolve_timezone, DEFAULT_TIMEZONE};

#[derive(Parser, Debug)]
#[command(author, version)]
#[command(about = "Downloads a Lichess game history and cleans it into an analysis table.")]
pub struct Args {
    /// The Lichess user whose games are fetched and whose perspective is used.
    #[arg(short, long)]
    pub username: String,

    /// The IANA timezone the game times are converted to.
    #[arg(short, long, default_value = DEFAULT_TIMEZONE)]
    pub timezone: String,

    /// The host serving the games API.
    #[arg(long, default_value = LICHESS_HOST)]
    pub host: String,

    /// Where archives and converted tables are written.
    #[arg(short, long, default_value = DATA_DIR)]
    pub data_dir: PathBuf,

    /// The CSV mapping `ECO Code` to `Name`.
    #[arg(short, long, default_value = OPENING_REFERENCE_PATH)]
    pub openings: PathBuf,

    /// Reuse an archive downloaded earlier instead of fetching a new one.
    #[arg(short, long)]
    pub pgn: Option<PathBuf>,

    /// Where to write the cleaned table. Defaults to `<archive>_cleaned.csv`.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Also write debug logs to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Show debug logs on stderr.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    pub fn archive_paths(&self) -> Result<ArchivePaths> {
        match &self.pgn {
            Some(pgn) => ArchivePaths::from_pgn(pgn, &self.username),
            None => Ok(ArchivePaths::new(&self.data_dir, &self.username)),
        }
    }

    pub fn timezone(&self) -> Result<Tz> {
        Ok(resolve_timezone(&self.timezone)?)
    }

    pub fn out_path(&self, paths: &ArchivePaths) -> PathBuf {
        self.out.clone().unwrap_or_else(|| paths.cleaned())
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            true => LevelFilter::Debug,
            false => LevelFilter::Info,
        }
    }
}

#[test]
fn check_defaults() {
    let args = Args::parse_from(["chess_wrangle", "--username", "alice"]);

    assert_eq!(args.timezone, DEFAULT_TIMEZONE);
    assert_eq!(args.host, LICHESS_HOST);
    assert_eq!(args.data_dir, PathBuf::from(DATA_DIR));
    assert_eq!(args.openings, PathBuf::from(OPENING_REFERENCE_PATH));
    assert_eq!(args.timezone().unwrap(), chrono_tz::Africa::Cairo);
    assert_eq!(args.log_level(), LevelFilter::Info);
}

#[test]
fn check_reused_archive_paths() {
    let args = Args::parse_from([
        "chess_wrangle",
        "-u", "alice",
        "--pgn", "archive/2023-04-01T09.05.30-alice.pgn",
        "--out", "alice.csv",
    ]);
    let paths = args.archive_paths().unwrap();

    assert_eq!(paths.game_info, PathBuf::from("archive/2023-04-01T09.05.30-alice_game_info.csv"));
    assert_eq!(args.out_path(&paths), PathBuf::from("alice.csv"));
}
