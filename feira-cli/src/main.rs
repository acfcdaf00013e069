use std::path::PathBuf;

use clap::Parser;
use tracing::debug;

use feira_cli::app::{self, Command};
use feira_cli::config::FeiraConfig;
use feira_cli::logging;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Shopping list with running totals and a CSV report.
///
/// The list is kept in the configured store and survives restarts.
#[derive(Debug, Parser)]
#[command(name = "feira", version)]
struct Cli {
    /// Path to `feira.toml`. Defaults to `./feira.toml` when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Store backend (`sqlite` or `memory`). Overrides the config file.
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Store connection string. For SQLite this is a file path
    /// (e.g. `feira.db`) or `:memory:`.
    #[arg(long, global = true)]
    db: Option<String>,

    /// Outbox directory for exported reports. Overrides the config file.
    #[arg(long, global = true)]
    share_dir: Option<PathBuf>,

    /// Log at debug level unless `RUST_LOG` says otherwise.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn apply_overrides(&self, config: &mut FeiraConfig) {
        if let Some(backend) = &self.backend {
            config.store.backend = backend.clone();
        }
        if let Some(db) = &self.db {
            config.store.connection_string = db.clone();
        }
        if let Some(share_dir) = &self.share_dir {
            config.export.share_dir = Some(share_dir.clone());
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = FeiraConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    logging::init_logging(cli.verbose, config.logging.file.as_deref())?;
    debug!(?config, "configuration loaded");

    let mut controller = app::open_controller(&config).await?;
    let mut stdout = std::io::stdout().lock();
    app::run(cli.command, &config, &mut controller, &mut stdout).await
}
