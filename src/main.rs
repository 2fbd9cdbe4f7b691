mod agent;
mod cli;
mod config;
mod llm;
mod profile;
mod review;
mod server;
mod types;
mod util;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use cli::{Cli, Commands};
use config::Config;
use llm::OpenAiClient;
use review::orchestrator::Orchestrator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_new(&cli.log_level)?)
        .init();

    match cli.command {
        Commands::Serve(args) => serve(args).await,
        Commands::Review(args) => review_file(args).await,
        Commands::Schema => {
            let schema = schemars::schema_for!(types::CodeReviewResponse);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
    }
}

fn build_orchestrator(config: &Config, api_key: String) -> anyhow::Result<(Orchestrator, bool)> {
    let api_key_configured = !api_key.is_empty();
    let client = OpenAiClient::new(
        config.llm.base_url.clone(),
        api_key,
        Duration::from_secs(config.llm.timeout_secs),
    )?;
    let orchestrator = Orchestrator::new(Arc::new(client), &config.llm);
    Ok((orchestrator, api_key_configured))
}

async fn serve(args: cli::ServeArgs) -> anyhow::Result<()> {
    let config = Config::load(&args.config)?;
    let (orchestrator, api_key_configured) = build_orchestrator(&config, args.api_key)?;
    let state = Arc::new(server::AppState {
        orchestrator,
        api_key_configured,
    });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Listening on {addr}");
    axum::serve(listener, server::router(state)).await?;
    Ok(())
}

async fn review_file(args: cli::ReviewArgs) -> anyhow::Result<()> {
    let config = Config::load(&args.config)?;

    let code = if args.file == "-" {
        use std::io::Read;
        let mut code = String::new();
        std::io::stdin()
            .read_to_string(&mut code)
            .context("Failed to read code from stdin")?;
        code
    } else {
        std::fs::read_to_string(&args.file)
            .with_context(|| format!("Failed to read {}", args.file))?
    };

    let (orchestrator, _) = build_orchestrator(&config, args.api_key)?;
    let request = types::CodeReviewRequest {
        code,
        language: args.language,
        context: args.context,
    };

    // Surface agent progress as log lines while the review runs.
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<types::StatusUpdate>();
    let printer = tokio::spawn(async move {
        while let Some(update) = rx.recv().await {
            info!("[{}] {}", update.agent, update.message);
        }
    });

    let response = orchestrator.review_code(&request, Some(tx)).await;
    printer.await?;

    println!("{}", review::render::format_report(&response));
    Ok(())
}
