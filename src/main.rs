//! Wellquest CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wellquest::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { force } => wellquest::cli::commands::init::execute(force, cli.json).await,
        Commands::User(command) => wellquest::cli::commands::user::execute(command, cli.json).await,
        Commands::Task(command) => wellquest::cli::commands::task::execute(command, cli.json).await,
    };

    if let Err(err) = result {
        wellquest::cli::handle_error(err, cli.json);
    }
}
