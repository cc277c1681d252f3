use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;
mod generator;
mod handlers;
mod output;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Logs go to stderr so command output on stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = commands::Cli::parse();
    handlers::handle_command(cli.command)
}
