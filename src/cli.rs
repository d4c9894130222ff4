//! Command line interface

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use crate::constants::config::{FILE_ENV, PROFILE_DIR_ENV};

#[derive(Debug, Parser)]
#[command(name = "settings-sync", version, about = "Edit application settings and profile selection")]
pub struct Cli {
    /// Settings file (defaults to the platform config dir)
    #[arg(long, env = FILE_ENV, global = true)]
    pub settings_file: Option<PathBuf>,

    /// Directory holding profile .yml/.yaml files
    #[arg(long, env = PROFILE_DIR_ENV, global = true)]
    pub profile_dir: Option<PathBuf>,

    /// trace, debug, info, warn or error (overrides LOG_LEVEL)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the current settings
    Show {
        /// Emit JSON instead of key = value lines
        #[arg(long)]
        json: bool,
    },

    /// List available profiles, marking the selected ones
    Profiles,

    /// Edit settings and save them
    Set {
        /// Field assignments such as char.inventory=i
        assignments: Vec<String>,

        /// Append a profile id to the selection
        #[arg(long = "add-profile", value_name = "ID")]
        add_profiles: Vec<String>,

        /// Remove a profile id from the selection
        #[arg(long = "remove-profile", value_name = "ID")]
        remove_profiles: Vec<String>,

        /// Move a selected profile to the front, making it active
        #[arg(long, value_name = "ID")]
        activate: Option<String>,

        /// Print the document that would be saved, then discard the edits
        #[arg(long)]
        dry_run: bool,
    },

    /// Restore the default settings
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Split `group.key=value`; the value may itself contain `=`
pub fn parse_assignment(raw: &str) -> Result<(&str, &str)> {
    match raw.split_once('=') {
        Some((path, value)) if !path.trim().is_empty() => Ok((path.trim(), value)),
        _ => bail!("Invalid assignment '{raw}', expected group.key=value"),
    }
}
