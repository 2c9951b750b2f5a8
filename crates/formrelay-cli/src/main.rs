//! Formrelay CLI - watch a directory of form photographs, extract field
//! values with a trained document model, and commit them to the results
//! table the dashboard polls.

use clap::Parser;
use formrelay_cli::{commands, Cli, Command, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Init => {
            let path = match cli.config {
                Some(p) => p,
                None => Config::default_path()?,
            };
            commands::execute_init(&path)?;
        }
        Command::Run => {
            let config = Config::load(cli.config.as_deref())?;
            commands::execute_run(config).await?;
        }
        Command::Latest { json } => {
            let config = Config::load(cli.config.as_deref())?;
            commands::execute_latest(&config, json)?;
        }
        Command::Check => {
            let config = Config::load(cli.config.as_deref())?;
            commands::execute_check(&config)?;
        }
    }

    Ok(())
}
