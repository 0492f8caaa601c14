//! Media Timestamp - stamp photos and videos with their real creation time
//!
//! Reads the creation time embedded in EXIF or QuickTime metadata, writes it
//! to the file system times and optionally renames files after it.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use media_timestamp::config::LOG_FILE_NAME;
use media_timestamp::{
    Cli, Command, LogSettings, WalkConfig, describe_file, list_file, process_file, walk_folder,
    write_containers,
};
use std::io::{self, Write};
use tracing::{Level, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = media_timestamp::cli::exit_code(&e);
            let _ = e.print();
            if media_timestamp::cli::wants_full_usage(&e) {
                let _ = Cli::command().print_help();
            }
            std::process::exit(code);
        }
    };

    let _guard = setup_logging(&LogSettings::from_env())?;
    info!(version = env!("CARGO_PKG_VERSION"), "Media Timestamp starting");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    run(cli.command, &mut out)?;
    out.flush()?;
    Ok(())
}

fn run<W: Write>(command: Command, out: &mut W) -> Result<()> {
    let options = command.process_options();

    match command {
        Command::Read { file } => {
            let containers = describe_file(&file)?;
            write_containers(&containers, out)?;
        }
        Command::List { folder, pattern } => {
            let config = WalkConfig::new(folder, Some(&pattern))?;
            walk_folder(&config, list_file, out)?;
        }
        Command::Process {
            folder, pattern, ..
        } => {
            let config = WalkConfig::new(folder, Some(&pattern))?;
            walk_folder(&config, |path| process_file(path, options), out)?;
        }
    }

    Ok(())
}

/// Setup logging: console (stderr) plus an optional log file
fn setup_logging(settings: &LogSettings) -> Result<Option<WorkerGuard>> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(Level::WARN.into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::registry().with(env_filter);

    match &settings.dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);

            subscriber
                .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
                .with(fmt::layer().with_writer(io::stderr))
                .init();

            Ok(Some(guard))
        }
        None => {
            subscriber
                .with(fmt::layer().with_writer(io::stderr))
                .init();

            Ok(None)
        }
    }
}
