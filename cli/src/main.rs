mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use pretalx_api::PretalxClient;
use pretalx_core::Credentials;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use config::{Config, Settings};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before parsing so env-backed flags see it
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::load();
    let settings = Settings::resolve(&cli.auth, &config)?;

    let has_password = matches!(settings.credentials, Credentials::Password { .. });
    if matches!(cli.command, Command::Login) && !has_password {
        anyhow::bail!("login needs --username and --password");
    }

    let client = PretalxClient::connect(&settings.url, settings.credentials)
        .await
        .with_context(|| format!("connecting to {}", settings.url))?;

    let body = match &cli.command {
        Command::Login => {
            config.url = Some(settings.url.clone());
            config.token = Some(client.token().to_string());
            config.username = cli.auth.username.clone().or(config.username.take());
            let path = config.save()?;
            eprintln!("Token saved to {}", path.display());
            return Ok(());
        }
        Command::Me => client.me().await,
        Command::Events { event, query } => client.events(event.as_deref(), &query.to_params()).await,
        Command::Submissions(args) => {
            client.submissions(&args.event, args.code.as_deref(), &args.query.to_params()).await
        }
        Command::Talks(args) => {
            client.talks(&args.event, args.code.as_deref(), &args.query.to_params()).await
        }
        Command::Speakers(args) => {
            client.speakers(&args.event, args.code.as_deref(), &args.query.to_params()).await
        }
        Command::Reviews(args) => {
            client.reviews(&args.event, args.code.as_deref(), &args.query.to_params()).await
        }
        Command::Rooms(args) => {
            client.rooms(&args.event, args.code.as_deref(), &args.query.to_params()).await
        }
    }
    .context("request failed")?;

    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
