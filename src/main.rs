//! medqueue - Patient intake and hospital queue terminal UI
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::Result;

use medqueue_app::config::{init_config_dir, load_settings, load_settings_from};
use medqueue_core::logging::{self, LogSink};

/// medqueue - Patient intake and hospital queue terminal UI
#[derive(Parser, Debug)]
#[command(name = "medqueue")]
#[command(about = "Patient intake and hospital queue terminal UI", long_about = None)]
struct Args {
    /// Config file (default: .medqueue/config.toml in the working directory)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run in headless mode (JSON output, no TUI)
    #[arg(long)]
    headless: bool,

    /// Write a default .medqueue/config.toml and exit
    #[arg(long)]
    init: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let base_path = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    if args.init {
        let path = init_config_dir(&base_path)?;
        eprintln!("Config written to {}", path.display());
        return Ok(());
    }

    logging::init(if args.headless {
        LogSink::Stderr
    } else {
        LogSink::File
    })?;

    let settings = match &args.config {
        Some(path) => load_settings_from(path),
        None => load_settings(&base_path),
    };

    if args.headless {
        medqueue::run_headless(settings).await?;
    } else {
        medqueue::run(settings).await?;
    }
    Ok(())
}
