//! CEE advisor - regulatory Q&A over the documents in force at a date.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cee_advisor::advisor::Advisor;
use cee_advisor::ai::AiClient;
use cee_advisor::config::{AdvisorConfig, ConfigLoader};
use cee_advisor::display;
use cee_advisor::knowledge::{load_corpus, source_for};
use cee_advisor::server::{AdvisorServer, AppState};

#[derive(Parser)]
#[command(
    name = "cee-advisor",
    about = "Regulatory advisor over versioned CEE documents",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (defaults to .cee-advisor.toml, then the user config dir).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the documents in force at a date.
    Resolve {
        /// Reference date (YYYY-MM-DD), today by default.
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// JSON corpus file; the built-in portal snapshot otherwise.
        #[arg(long)]
        corpus: Option<PathBuf>,
        /// Also print document content and source.
        #[arg(long)]
        full: bool,
    },
    /// Ask one question and print the answer.
    Ask {
        /// The question.
        question: String,
        /// Reference date (YYYY-MM-DD), today by default.
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// JSON corpus file; the built-in portal snapshot otherwise.
        #[arg(long)]
        corpus: Option<PathBuf>,
    },
    /// Serve the HTTP API.
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(short, long)]
        port: Option<u16>,
        /// JSON corpus file; the built-in portal snapshot otherwise.
        #[arg(long)]
        corpus: Option<PathBuf>,
    },
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let loader = cli.config.map_or_else(ConfigLoader::new, ConfigLoader::with_path);
    let config: AdvisorConfig = loader.load()?;

    match cli.command {
        Commands::Resolve { date, corpus, full } => {
            let source = source_for(corpus.or(config.corpus.path));
            let corpus = load_corpus(source.as_ref()).await?;
            let effective = corpus.effective(date.unwrap_or_else(today));
            display::print_effective_set(&effective, corpus.len(), full);
        }
        Commands::Ask {
            question,
            date,
            corpus,
        } => {
            let client = AiClient::from_config(config.ai)?;
            let advisor = Advisor::new(Arc::new(client));
            let source = source_for(corpus.or(config.corpus.path));
            let answer = advisor
                .ask_from_source(&question, source.as_ref(), date.unwrap_or_else(today))
                .await?;
            display::print_answer(&answer);
        }
        Commands::Serve { host, port, corpus } => {
            let mut server_config = config.server;
            if let Some(host) = host {
                server_config.host = host;
            }
            if let Some(port) = port {
                server_config.port = port;
            }

            let advisor = match AiClient::from_config(config.ai.clone()) {
                Ok(client) => Some(Advisor::new(Arc::new(client))),
                Err(e) => {
                    tracing::warn!(error = %e, "AI client not configured, chat disabled");
                    None
                }
            };
            let source = source_for(corpus.or(config.corpus.path));
            let state = AppState::new(Arc::from(source), advisor, config.ai.api_key_env);

            let cancel = state.cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancel.cancel();
                }
            });

            AdvisorServer::new(state)
                .with_config(server_config)
                .run()
                .await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}
