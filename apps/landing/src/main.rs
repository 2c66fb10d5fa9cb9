use std::{path::PathBuf, process::ExitCode, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    BannerState, BannerView, ConsentManager, ContactFormController, ContactFormView,
    FormSettings, RestContactTransport, SubmitEndpoint, SubmitOutcome,
};
use shared::domain::{ContactForm, CONSENT_STORAGE_KEY};
use storage::{KeyValueStore, Storage};
use tracing_subscriber::EnvFilter;

mod config;
mod terminal;

use config::{load_settings, normalize_base_url, Settings, DEFAULT_CONFIG_PATH};
use terminal::{TerminalBanner, TerminalFormView};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Overrides the consent database from config and environment.
    #[arg(long)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(subcommand)]
    Consent(ConsentCommand),
    Submit(SubmitArgs),
}

#[derive(Subcommand, Debug)]
enum ConsentCommand {
    Status,
    Accept,
    /// Forget the stored decision, as on a first visit.
    Reset,
}

#[derive(Args, Debug)]
struct SubmitArgs {
    #[arg(long, default_value = "")]
    nome: String,
    #[arg(long, default_value = "")]
    cognome: String,
    #[arg(long, default_value = "")]
    telefono: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long)]
    privacy: bool,
}

impl From<SubmitArgs> for ContactForm {
    fn from(args: SubmitArgs) -> Self {
        Self {
            nome: args.nome,
            cognome: args.cognome,
            telefono: args.telefono,
            email: args.email,
            privacy: args.privacy,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(&cli.config);
    if let Some(database_url) = cli.database_url {
        settings.database_url = database_url;
    }

    match cli.command {
        Command::Consent(command) => run_consent(&settings, command).await,
        Command::Submit(args) => run_submit(&settings, args.into()).await,
    }
}

async fn run_consent(settings: &Settings, command: ConsentCommand) -> Result<ExitCode> {
    let storage = Storage::new(&settings.database_url)
        .await
        .with_context(|| format!("failed to open consent store '{}'", settings.database_url))?;
    let store: Arc<dyn KeyValueStore> = Arc::new(storage);

    if let ConsentCommand::Reset = command {
        store
            .remove(CONSENT_STORAGE_KEY)
            .await
            .context("failed to clear consent record")?;
        println!("consent record cleared");
        return Ok(ExitCode::SUCCESS);
    }

    let banner: Arc<dyn BannerView> = Arc::new(TerminalBanner);
    let mut manager =
        ConsentManager::new(store, banner).with_hide_delay(settings.banner_hide_delay());

    let state = manager.init().await;
    if let ConsentCommand::Accept = command {
        if state == BannerState::Visible {
            manager.accept().await;
            // let the removal callback run before the runtime shuts down
            tokio::time::sleep(settings.banner_hide_delay() + Duration::from_millis(20)).await;
        } else {
            println!("consent already recorded; nothing to accept");
        }
    }

    match manager.read_consent().await {
        Some(record) => println!(
            "consent: accepted={} at {} (nominal retention until {})",
            record.accepted,
            record.timestamp.to_rfc3339(),
            record.retained_until().to_rfc3339()
        ),
        None => println!("consent: none recorded"),
    }
    println!("banner: {:?}", manager.state());
    Ok(ExitCode::SUCCESS)
}

async fn run_submit(settings: &Settings, input: ContactForm) -> Result<ExitCode> {
    let base_url = normalize_base_url(&settings.supabase_url)?;
    let transport = Arc::new(RestContactTransport::new(SubmitEndpoint::new(
        base_url,
        settings.supabase_anon_key.clone(),
    )));
    let view = Arc::new(TerminalFormView::new(input));
    let mut controller = ContactFormController::new(
        view.clone() as Arc<dyn ContactFormView>,
        transport,
        FormSettings {
            user_agent: settings.user_agent.clone(),
            notice_ttl: settings.notice_ttl(),
        },
    );

    let outcome = controller.submit().await;
    match outcome {
        SubmitOutcome::Succeeded if view.succeeded() => Ok(ExitCode::SUCCESS),
        SubmitOutcome::Aborted(errors) => {
            eprintln!("{} field(s) need attention", errors.errors().count());
            Ok(ExitCode::from(2))
        }
        _ => Ok(ExitCode::FAILURE),
    }
}
