use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, info};
use simplelog::{Config, WriteLogger};
use std::fs::File;
use std::path::{Path, PathBuf};
use wrap_snake::game::GameConfig;
use wrap_snake::modes::{HumanMode, HumanOptions};
use wrap_snake::storage::FileRecordStore;

#[derive(Parser)]
#[command(name = "wrap_snake")]
#[command(version, about = "Snake on a wrapping board, with a saved record")]
struct Cli {
    /// File holding the best score
    #[arg(long, default_value = "record.txt")]
    record_file: PathBuf,

    /// Where to write the log (the terminal is taken by the game)
    #[arg(long, default_value = "wrap_snake.log")]
    log_file: PathBuf,

    /// Log verbosity
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    /// Ring the terminal bell when food is eaten
    #[arg(long)]
    bell: bool,
}

fn init_logging(path: &Path, level: LevelFilter) {
    let result = File::create(path)
        .map_err(anyhow::Error::from)
        .and_then(|file| WriteLogger::init(level, Config::default(), file).map_err(Into::into));

    if let Err(err) = result {
        eprintln!("logging disabled ({:?}): {}", path, err);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_file, cli.log_level);
    info!("starting wrap_snake, record file {:?}", cli.record_file);

    let store = FileRecordStore::new(cli.record_file);
    let options = HumanOptions { bell: cli.bell };

    let mut human_mode = HumanMode::new(GameConfig::default(), store, options);
    human_mode.run().await?;

    info!("bye");
    Ok(())
}
