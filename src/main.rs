//! Discussion Board — server-rendered CRUD for discussion threads.
//!
//! Serves the discussion routes over HTTP and keeps discussions in SQLite.
//! The acting user is taken from a request header set by an upstream
//! authentication layer.
//!
//! Usage:
//!   discussion-board                             # Default port 3000, default database
//!   discussion-board --port 8080                 # Custom port
//!   discussion-board --database ./board.db       # Custom database file
//!   discussion-board --in-memory                 # Throwaway store

use std::path::PathBuf;

use board_server::BoardServer;
use board_store::SqliteStore;
use board_transport::{TransportConfig, TransportServer};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "discussion-board", about = "Discussion Board — threads, views and flash messages")]
struct Cli {
    /// Port to listen on (0 for OS-assigned)
    #[arg(long, default_value = "3000")]
    port: u16,

    /// Hostname to bind to
    #[arg(long, default_value = "127.0.0.1")]
    hostname: String,

    /// SQLite database file (defaults to <data dir>/discussion-board/board.db)
    #[arg(long)]
    database: Option<PathBuf>,

    /// Keep everything in memory; nothing survives a restart
    #[arg(long, conflicts_with = "database")]
    in_memory: bool,

    /// Request header carrying the authenticated user's id
    #[arg(long, default_value = "x-user-id")]
    user_header: String,

    /// Enable verbose logging
    #[arg(long)]
    verbose: bool,

    /// Write logs to a file (defaults to <data dir>/discussion-board/board.log if no path given)
    #[arg(long, default_missing_value = "DEFAULT", num_args = 0..=1)]
    log_file: Option<String>,
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("discussion-board")
}

fn init_tracing(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let Some(log_file_arg) = &cli.log_file else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        return Ok(());
    };

    let log_path = if log_file_arg == "DEFAULT" {
        data_dir().join("board.log")
    } else {
        PathBuf::from(log_file_arg)
    };
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| format!("Failed to open log file {}: {e}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();

    eprintln!("Logging to {}", log_path.display());
    Ok(())
}

fn open_store(cli: &Cli) -> Result<(SqliteStore, String), Box<dyn std::error::Error>> {
    if cli.in_memory {
        return Ok((SqliteStore::open_in_memory()?, "(in memory)".into()));
    }

    let path = cli
        .database
        .clone()
        .unwrap_or_else(|| data_dir().join("board.db"));
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let store = SqliteStore::open(&path)?;
    Ok((store, path.display().to_string()))
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&cli) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    let (store, location) = match open_store(&cli) {
        Ok(opened) => opened,
        Err(e) => {
            error!("Failed to open discussion store: {e}");
            std::process::exit(1);
        }
    };

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                      Discussion Board                        ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("  Database:     {location}");
    println!("  Port:         {}", cli.port);
    println!("  Binding:      {}", cli.hostname);
    println!("  User header:  {}", cli.user_header);
    println!();

    let config = TransportConfig {
        port: cli.port,
        hostname: cli.hostname.clone(),
        user_header: cli.user_header.clone(),
        ..Default::default()
    };

    let mut transport = match TransportServer::start(config, BoardServer::new(store)).await {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to start transport: {e}");
            std::process::exit(1);
        }
    };

    let url = format!("http://{}:{}/discussions", cli.hostname, transport.port());
    info!("Serving {url}");

    println!("────────────────────────────────────────────────────────────────");
    println!();
    println!("  Server running!");
    println!();
    println!("    {url}");
    println!();
    println!("  Press Ctrl+C to stop.");
    println!();

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
    }

    println!();
    println!("  Shutting down...");
    transport.stop().await;
    println!("  Server stopped.");
}
