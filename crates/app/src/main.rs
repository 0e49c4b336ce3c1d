use std::process::ExitCode;

use clap::Parser;
use client::SyncController;

use cli::{Cli, Command};
use error::Result;

mod cli;
mod commands;
mod error;
mod settings;

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!("{err:?}");
            eprintln!("{}", err.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut settings = settings::Settings::new(cli.config.as_deref())?;
    cli.apply(&mut settings);

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "ledger={level},client={level},relay={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Relay => {
            tracing::info!("Starting relay...");
            let relay = settings.relay.unwrap_or_default();
            let bind = relay.bind.as_deref().unwrap_or("127.0.0.1");
            let addr = format!("{}:{}", bind, relay.port);
            let listener = tokio::net::TcpListener::bind(addr).await?;
            relay::run_with_listener(relay, listener).await?;
        }
        Command::Store(command) => {
            let gateway = settings.client.gateway()?;
            let options = settings.client.sync_options()?;
            let mut sync = SyncController::new(gateway, options);
            commands::run(&mut sync, command).await?;
        }
    }
    Ok(())
}
