//! Command-line interface for geoinspect.
//!
//! The CLI is the presentation layer over the inspection store: it drives the
//! add flow, renders inspections newest first, and asks for confirmation
//! before destructive actions. The store itself never prompts.

mod commands;
pub mod render;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, DeleteCommand, ListCommand, OutputFormat, ResetCommand,
    ShowCommand, StatusCommand,
};

use crate::logging::Verbosity;

/// geoinspect - Record geotagged, photo-backed inspections
///
/// Drop a pin, attach a photo, and annotate it with a title, description,
/// color, and icon. Inspections are kept locally and listed newest first.
#[derive(Debug, Parser)]
#[command(name = "geoinspect")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Record a new inspection
    Add(AddCommand),

    /// List inspections, newest first
    List(ListCommand),

    /// Show one inspection
    Show(ShowCommand),

    /// Delete one inspection
    Delete(DeleteCommand),

    /// Delete all inspections
    Reset(ResetCommand),

    /// Show storage status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

/// Ask a yes/no question. Anything but `y`/`yes` declines.
///
/// # Errors
///
/// Returns an error if the prompt cannot be written or the answer read.
pub fn confirm(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> std::io::Result<bool> {
    write!(output, "{prompt} [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "geoinspect");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        let cli = Cli::try_parse_from(["geoinspect", "-q", "list"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Quiet);

        let cli = Cli::try_parse_from(["geoinspect", "-vv", "list"]).unwrap();
        assert_eq!(cli.verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "geoinspect", "add", "--lat", "-33.87", "--lon", "151.21", "--image", "/tmp/p.jpg",
            "--title", "Pothole", "--icon", "road",
        ])
        .unwrap();

        let Command::Add(add) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(add.lat, Some(-33.87));
        assert_eq!(add.lon, Some(151.21));
        assert_eq!(add.image, PathBuf::from("/tmp/p.jpg"));
        assert_eq!(add.title, "Pothole");
        assert_eq!(add.description, "");
        assert_eq!(add.icon.as_deref(), Some("road"));
        assert!(add.color.is_none());
    }

    #[test]
    fn test_parse_add_requires_both_coordinates() {
        let result = Cli::try_parse_from(["geoinspect", "add", "--lat", "1.0", "--image", "p.jpg"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_add_without_location() {
        let cli = Cli::try_parse_from(["geoinspect", "add", "-i", "p.jpg"]).unwrap();
        let Command::Add(add) = cli.command else {
            panic!("expected add");
        };
        assert!(add.lat.is_none() && add.lon.is_none());
    }

    #[test]
    fn test_parse_list_format() {
        let cli = Cli::try_parse_from(["geoinspect", "list", "--format", "json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::List(ListCommand {
                format: OutputFormat::Json
            })
        ));
    }

    #[test]
    fn test_parse_delete_and_reset() {
        let cli = Cli::try_parse_from(["geoinspect", "delete", "abc", "--yes"]).unwrap();
        assert!(matches!(cli.command, Command::Delete(DeleteCommand { ref id, yes: true }) if id == "abc"));

        let cli = Cli::try_parse_from(["geoinspect", "reset"]).unwrap();
        assert!(matches!(cli.command, Command::Reset(ResetCommand { yes: false })));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = Cli::try_parse_from(["geoinspect", "-c", "/custom/config.toml", "status"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_confirm_accepts_yes() {
        let mut out = Vec::new();
        assert!(confirm("Delete?", &mut "y\n".as_bytes(), &mut out).unwrap());
        assert!(confirm("Delete?", &mut "YES\n".as_bytes(), &mut out).unwrap());
        assert!(String::from_utf8(out).unwrap().starts_with("Delete? [y/N] "));
    }

    #[test]
    fn test_confirm_declines_by_default() {
        let mut out = Vec::new();
        assert!(!confirm("Delete?", &mut "\n".as_bytes(), &mut out).unwrap());
        assert!(!confirm("Delete?", &mut "nope\n".as_bytes(), &mut out).unwrap());
        assert!(!confirm("Delete?", &mut "".as_bytes(), &mut out).unwrap());
    }
}
