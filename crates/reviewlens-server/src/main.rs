//! ReviewLens: product review ingestion, annotation and query server.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use reviewlens_core::AppConfig;
use reviewlens_ingest::{run_pipeline, PipelineOptions};
use reviewlens_nlp::init_shared;
use reviewlens_server::{build_router, start_pipeline_worker, AppState};
use reviewlens_store::{export_for_dashboard, find_databases, DATABASE_FILE_NAME};

#[derive(Parser)]
#[command(name = "reviewlens", version, about = "Product review annotation and query server")]
struct Cli {
    /// Log filter (overrides RUST_LOG), e.g. "debug" or "reviewlens_nlp=debug".
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server (default).
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run the pipeline once in the foreground.
    Run {
        /// Raw CSV (defaults to AMZ_RAW_CSV).
        #[arg(long)]
        source: Option<PathBuf>,
        /// Processed CSV to write.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Replace the database contents with the annotated reviews.
        #[arg(long)]
        to_db: bool,
        #[arg(long)]
        db: Option<PathBuf>,
        /// Read at most this many rows.
        #[arg(long)]
        nrows: Option<usize>,
    },
    /// Write the dashboard CSV from the database.
    Export {
        #[arg(long)]
        db: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List review databases under a directory with their row counts.
    CheckDbs {
        root: Option<PathBuf>,
    },
    /// Print the detected NLP capabilities as JSON.
    Capabilities,
}

fn init_tracing(log_level: Option<&str>) {
    let filter = match log_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let mut config = AppConfig::from_env()?;

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            serve(config).await
        }
        Command::Run {
            source,
            out,
            to_db,
            db,
            nrows,
        } => {
            let paths = &config.data_paths;
            let options = PipelineOptions {
                source: source.unwrap_or_else(|| paths.raw_csv.clone()),
                out: out.unwrap_or_else(|| paths.processed_csv.clone()),
                to_db,
                db_path: db.unwrap_or_else(|| paths.db_path.clone()),
                nrows,
            };
            let engine = init_shared(&config.nlp);
            let report = tokio::task::spawn_blocking(move || run_pipeline(&options, engine))
                .await?
                .map_err(|e| anyhow::anyhow!("Pipeline failed: {}", e))?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Command::Export { db, out } => {
            let db = db.unwrap_or_else(|| config.data_paths.db_path.clone());
            let out = out.unwrap_or_else(|| config.data_paths.export_csv.clone());
            let (path, rows) = export_for_dashboard(&db, &out)
                .map_err(|e| anyhow::anyhow!("Export failed: {}", e))?;
            println!("Exported {} rows to {}", rows, path.display());
            Ok(())
        }
        Command::CheckDbs { root } => {
            let root = match root {
                Some(r) => r,
                None => std::env::current_dir()?,
            };
            let found = find_databases(&root, DATABASE_FILE_NAME);
            if found.is_empty() {
                println!("No {} found under {}", DATABASE_FILE_NAME, root.display());
            } else {
                println!("Found {} database file(s):", found.len());
                for db in found {
                    match (db.rows, db.error) {
                        (Some(rows), _) => println!("{} -> {} rows", db.path.display(), rows),
                        (None, Some(err)) => println!("{} -> error: {}", db.path.display(), err),
                        (None, None) => println!("{} -> unknown", db.path.display()),
                    }
                }
            }
            Ok(())
        }
        Command::Capabilities => {
            let caps = init_shared(&config.nlp).capabilities();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "capabilities": caps,
                    "tier": caps.tier(),
                }))?
            );
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    info!("Database: {}", config.data_paths.db_path.display());
    info!("Raw CSV: {}", config.data_paths.raw_csv.display());
    info!("Export CSV: {}", config.data_paths.export_csv.display());

    let port = config.port;
    let engine = Arc::new(init_shared(&config.nlp).clone());

    let state = Arc::new(AppState::new(config, engine));

    // Start background pipeline queue
    start_pipeline_worker(state.clone());

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("ReviewLens server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
