pub mod config_cmd;
pub mod show;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::View;

#[derive(Parser)]
#[command(
    name = "png-info-viewer",
    version,
    about = "Show PNG tEXt metadata and Stable Diffusion generation parameters",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Images to inspect when no subcommand is given (`-` = stdin).
    pub paths: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, clap::Args, Clone)]
pub struct GlobalArgs {
    /// Output view (overrides config).
    #[arg(long, value_enum, global = true, env = "PNG_INFO_VIEW")]
    pub view: Option<View>,

    /// Reject inputs larger than this many bytes (overrides config).
    #[arg(long, global = true, env = "PNG_INFO_MAX_BYTES")]
    pub max_bytes: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inspect one or more images (default).
    Show(ShowArgs),

    /// View / edit configuration.
    Config(ConfigArgs),
}

//  Subcommand argument structs

#[derive(Debug, clap::Args, Clone)]
pub struct ShowArgs {
    /// Image files; `-` or nothing reads stdin.
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Display the current configuration.
    Show,
    /// Set a configuration value (`view`, `size_decimals`, `max_bytes`).
    Set { key: String, value: String },
    /// Print the configuration file path.
    Path,
}
