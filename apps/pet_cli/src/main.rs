use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    AuthTokenProvider, EnvCredentialProvider, HttpPetClient, InteractionDispatch, PetSession,
    StaticCredential, ViewStateKind,
};
use shared::domain::PetAction;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod host;
mod render;
mod repl;

use crate::{config::load_settings, host::TerminalHost, render::render};

#[derive(Parser, Debug)]
#[command(name = "pet_cli", about = "Look after your virtual pet from the terminal")]
struct Args {
    /// Base URL of the pet API, e.g. http://127.0.0.1:8000/api
    #[arg(long)]
    api_url: Option<String>,
    /// Session credential; read from the configured environment variable when omitted
    #[arg(long)]
    credential: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
    /// Used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Fetch the pet and print it
    Show,
    Feed,
    Water,
    Play,
    /// Keep the session open and read commands from stdin
    Interactive,
}

impl Command {
    fn action(self) -> Option<PetAction> {
        match self {
            Command::Feed => Some(PetAction::Feed),
            Command::Water => Some(PetAction::Water),
            Command::Play => Some(PetAction::Play),
            Command::Show | Command::Interactive => None,
        }
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(api_url) = args.api_url {
        settings.api_base_url = api_url;
    }

    let auth: Box<dyn AuthTokenProvider> = match args.credential {
        Some(raw) => Box::new(StaticCredential::new(Some(raw))),
        None => Box::new(EnvCredentialProvider::new(settings.credential_env.clone())),
    };
    let api = HttpPetClient::new(&settings.api_base_url)
        .with_context(|| format!("cannot use api url '{}'", settings.api_base_url))?;
    let session = Arc::new(PetSession::new(
        Arc::new(api),
        auth.as_ref(),
        Arc::new(TerminalHost),
    ));
    info!(
        api = %settings.api_base_url,
        credential = session.has_credential(),
        "pet_cli: session created"
    );

    session.start().await?;
    let mut action_failed = false;
    match args.command {
        Command::Interactive => repl::run(session.clone()).await?,
        command => {
            if let Some(action) = command.action() {
                match session.interact(action).await {
                    InteractionDispatch::Applied => {}
                    InteractionDispatch::Failed(_) => action_failed = true,
                    other => {
                        action_failed = true;
                        if let Some(message) = repl::describe_unsent(action, &other) {
                            eprintln!("{message}");
                        }
                    }
                }
            }
            println!("{}", render(&session.snapshot()));
        }
    }

    Ok(match session.snapshot().kind() {
        ViewStateKind::Error => ExitCode::FAILURE,
        _ if action_failed => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}
