use std::rc::Rc;

use clap::Parser;
use tokio::task::LocalSet;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use freshet::app::AppContext;
use freshet::cli::{commands, Cli, Commands};
use freshet::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the feed output
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("freshet=warn")))
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    cli.apply(&mut config);

    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Watch { urls } => {
            LocalSet::new()
                .run_until(commands::watch(Rc::new(ctx), &urls))
                .await?;
        }
        Commands::Check { url } => {
            commands::check(&ctx, &url).await?;
        }
    }

    Ok(())
}
