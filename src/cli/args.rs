//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

use crate::config::RpcNaming;

/// List the routes of a file-routed web app as JSON
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Project root (default: directory of the config file, else cwd)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub root: Option<PathBuf>,

    /// Config file name (default: fsroutes.toml)
    #[arg(short = 'C', long, default_value = "fsroutes.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Keep running and rewrite the route list when it changes
    #[arg(short, long)]
    pub watch: bool,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pub pretty: bool,

    /// Write output to file instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    /// How RPC handlers in nested folders are named
    #[arg(long, value_enum)]
    pub rpc_naming: Option<RpcNaming>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}
