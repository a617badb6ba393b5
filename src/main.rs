use clap::Parser;
use tracing_subscriber::EnvFilter;

use gitdeploy::presentation::cli::{Cli, CliApp};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "gitdeploy=debug" } else { "gitdeploy=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Run the CLI application
    let app = CliApp::from_cli(cli);
    app.run().await
}
