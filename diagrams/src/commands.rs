use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "diagrams", version, about = "Reactor diagram windows")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the signal generator and the diagram GUI (default)
    Run {
        /// Layout file (.toml or .json); the built-in demo layout otherwise
        #[arg(long)]
        layout: Option<PathBuf>,
        /// Open every diagram of the layout on startup
        #[arg(long)]
        open_all: bool,
        /// Directory for exported images
        #[arg(long, default_value = ".")]
        export_dir: PathBuf,
    },
    /// Refresh every diagram without a window and print a summary
    Headless {
        #[arg(long)]
        layout: Option<PathBuf>,
        #[arg(long, default_value_t = 100)]
        ticks: u64,
    },
    /// Validate a layout and list the plot names it defines
    Check {
        #[arg(long)]
        layout: Option<PathBuf>,
    },
}
