use anyhow::Context;
use clap::Parser;
use std::process;
use taskbot::{DEFAULT_URL, DbConfig, Engine};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "taskbot")]
#[command(about = "Create the task bot's database schema if it is missing")]
#[command(version = "0.1.0")]
struct Cli {
    /// Database URL
    #[arg(long, default_value = DEFAULT_URL)]
    url: String,

    /// Log every SQL statement (on by default in debug builds)
    #[arg(long)]
    echo: bool,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = DbConfig::new(&cli.url).with_echo(cli.echo || cfg!(debug_assertions));
    let engine = Engine::new(config).with_context(|| format!("invalid database URL {}", cli.url))?;
    taskbot::init_db(&engine)
        .await
        .with_context(|| format!("failed to initialize {}", engine.path().display()))?;
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
