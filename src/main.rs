mod config;
mod errors;
mod handlers;
mod models;
#[cfg(feature = "server")]
mod server; // HTTP shell
mod services;
#[cfg(test)]
mod test_utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use std::sync::Arc;

use config::Config;
use handlers::AnalysisHandler;
use models::AnalysisOutcome;
use services::{image_source, OpenAiService};

#[derive(Parser)]
#[command(name = "nutrition-scanner")]
#[command(about = "Estimate the nutrition of a food photo with an OpenAI vision model", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single food photo and print the nutrition facts
    Analyze {
        /// Path to a JPEG image
        image: PathBuf,
    },
    /// Serve the scanner over HTTP
    #[cfg(feature = "server")]
    Serve {
        /// Listen address (default: SERVER_ADDR or 0.0.0.0:8080)
        #[arg(long)]
        addr: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();

    // Load environment variables
    dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let openai = Arc::new(OpenAiService::from_config(&config));
    log::info!("✅ OpenAI service initialized with model: {}", openai.model());

    let handler = Arc::new(AnalysisHandler::new(openai, config.analysis_timeout));

    match cli.command {
        Commands::Analyze { image } => {
            let picked = image_source::pick_from_path(&image)?;

            match handler.handle_pick(picked).await {
                Some(AnalysisOutcome::Displayed(nutrition)) => {
                    println!("Nutrition Facts\n");
                    println!("{}", nutrition);
                }
                Some(AnalysisOutcome::Failed(notification)) => {
                    eprintln!("{}", notification);
                    std::process::exit(1);
                }
                Some(AnalysisOutcome::Superseded) | None => {}
            }
        }
        #[cfg(feature = "server")]
        Commands::Serve { addr } => {
            let addr = addr.unwrap_or_else(|| config.server_addr.clone());
            if config.signing_secret.is_none() {
                log::warn!("⚠️ ANALYZE_SIGNING_SECRET not set, /analyze accepts unsigned requests");
            }

            let app = server::create_router(handler, config.signing_secret.clone());
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            log::info!("🌐 Server listening on {}", addr);

            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    tokio::signal::ctrl_c().await.ok();
                    log::info!("🛑 Shutting down...");
                })
                .await?;
        }
    }

    Ok(())
}
