//! CLI argument parsing with clap

use crate::config::ProcessOptions;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::path::PathBuf;

/// Media Timestamp - stamp photos and videos with their real creation time
///
/// Reads the creation time from EXIF or QuickTime metadata, applies it to
/// the file's creation and modification times and optionally renames the
/// file to `YYYY-MM-DD HHmmss`.
#[derive(Parser, Debug)]
#[command(name = "media-timestamp")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print every metadata container and tag of one file
    Read {
        /// File to inspect
        file: PathBuf,
    },

    /// Print the resolved timestamp of every matching file, changing nothing
    List {
        /// Folder to walk recursively
        folder: PathBuf,
        /// File name pattern
        #[arg(default_value = crate::config::DEFAULT_PATTERN)]
        pattern: String,
    },

    /// Apply the resolved timestamp to every matching file
    Process {
        /// Folder to walk recursively
        folder: PathBuf,
        /// File name pattern
        #[arg(default_value = crate::config::DEFAULT_PATTERN)]
        pattern: String,
        /// Rename files after their timestamp (`true` unless another value is given)
        #[arg(value_name = "changesFileNames", value_parser = parse_flag)]
        changes_file_names: Option<bool>,
    },
}

impl Command {
    /// Options for the `process` command; defaults for the others
    pub fn process_options(&self) -> ProcessOptions {
        match self {
            Command::Process {
                changes_file_names: Some(rename),
                ..
            } => ProcessOptions { rename: *rename },
            _ => ProcessOptions::default(),
        }
    }
}

/// Case-insensitive boolean token: only `true` is true
fn parse_flag(value: &str) -> Result<bool, Infallible> {
    Ok(value.trim().eq_ignore_ascii_case("true"))
}

/// Exit code for a failed parse: 0 for help/version, 1 for usage errors
pub fn exit_code(error: &clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

/// Unknown commands get the combined usage of every command
pub fn wants_full_usage(error: &clap::Error) -> bool {
    error.kind() == ErrorKind::InvalidSubcommand
}
