//! clipkeep CLI — clipboard history from the terminal.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use clipkeep_clipboard::SystemClipboard;
use clipkeep_engine::{setup, Config, Engine};

mod console;

#[derive(Parser)]
#[command(
    name = "clipkeep",
    about = "Keep a short history of everything you copy",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the clipboard and pick entries from the history.
    Watch {
        /// Path to configuration file.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the default configuration as TOML.
    PrintConfig,

    /// Print the default configuration file location.
    ConfigPath,
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Watch { config } => {
            let config = setup::load_config(config.as_deref())?;
            init_tracing(&config.general.log_level);
            watch(config).await?;
        }
        Commands::PrintConfig => {
            print!("{}", toml::to_string_pretty(&Config::default())?);
        }
        Commands::ConfigPath => {
            println!("{}", setup::default_config_path().display());
        }
    }

    Ok(())
}

async fn watch(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        capacity = config.history.capacity,
        poll_interval_ms = config.watcher.poll_interval_ms,
        "starting clipkeep"
    );

    let clipboard = SystemClipboard::new()?;
    let mut engine = Engine::new(config, Arc::new(clipboard));
    let handle = engine.handle();
    let engine_task = tokio::spawn(async move { engine.run().await });

    let mut console = tokio::spawn(console::run(handle.clone()));

    tokio::select! {
        result = &mut console => {
            result??;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("interrupted");
            console.abort();
        }
    }

    // The engine may already have exited on its own error.
    let _ = handle.shutdown().await;
    engine_task.await??;

    Ok(())
}
