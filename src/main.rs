use anyhow::Context;
use clap::Parser;
use chess_wrangle::args::Args;
use chess_wrangle::archive::fetch::LichessClient;
use chess_wrangle::wrangle::openings::OpeningReference;
use chess_wrangle::wrangle::Wrangle;
use chess_wrangle::{load, logs, table};

/// Fetch -> convert -> load -> clean, then write the cleaned table.
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logs::init_logger(args.log_level(), args.log_file.as_deref())?;

    let timezone = args.timezone()?;
    let paths = args.archive_paths()?;
    let client = LichessClient::new(&args.host)?;

    let games = load::game_table(&client, &paths)?;
    let openings = OpeningReference::from_path(&args.openings)?;

    let cleaned = Wrangle::new(args.username.clone(), timezone, openings).wrangle(games)?;

    let out = args.out_path(&paths);
    table::write_csv(&out, &cleaned)
        .with_context(|| format!("Failed to write cleaned games to {}", out.display()))?;

    log::info!("Wrote {} cleaned games to {}", cleaned.len(), out.display());
    Ok(())
}
