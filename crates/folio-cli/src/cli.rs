use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "folio",
    about = "Folio: a small file-backed document manager",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the web server
    Serve(ServeArgs),
    /// Print a bcrypt hash for a credentials file entry
    HashPassword(HashPasswordArgs),
    /// Load the config and credentials and report what would be served
    CheckConfig(CheckConfigArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Override the configured bind address
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Override the store root
    #[arg(long)]
    pub data_root: Option<PathBuf>,
}

#[derive(Args)]
pub struct HashPasswordArgs {
    pub password: String,
    /// bcrypt cost factor
    #[arg(long)]
    pub cost: Option<u32>,
}

#[derive(Args)]
pub struct CheckConfigArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
