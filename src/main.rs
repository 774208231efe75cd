//! Sicbo Big/Small Predictor
//!
//! Serves next-round predictions over HTTP.

use clap::{Parser, Subcommand};
use sicbo_predictor::{
    client::{HistorySource, UpstreamClient},
    config::Config,
    ml::EnsembleEngine,
    server::{self, AppState, PredictionResponse},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "sicbo-predictor")]
#[command(about = "Ensemble predictor for Sicbo Big/Small rounds")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the prediction API
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Fetch history once and print a prediction
    Predict,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            serve(config).await
        }
        Commands::Predict => predict_once(config).await,
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    tracing::info!("Starting Sicbo prediction service");

    let source = Arc::new(UpstreamClient::new(config.upstream.clone())?);
    let engine = EnsembleEngine::new(config.engine.clone());
    let state = Arc::new(AppState::new(engine, source));

    server::start_server(state, &config.bind_addr()).await?;
    Ok(())
}

async fn predict_once(config: Config) -> anyhow::Result<()> {
    let source = UpstreamClient::new(config.upstream.clone())?;
    let history = source.fetch_history().await?;
    let Some(last) = history.last() else {
        anyhow::bail!("upstream returned no rounds");
    };

    let engine = EnsembleEngine::new(config.engine);
    let result = engine.predict(&history);
    let response = PredictionResponse::build(last, result);

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
