//! Command handling, independent of argument parsing so it can be driven
//! from tests with any writer.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Subcommand;
use feira_core::calculations::format_two_places;
use feira_core::store::MemoryStoreFactory;
use feira_core::{Item, ItemId, ListController, ListPersistence, StoreRegistry};
use feira_export::{DirectoryShare, ExportError, ReportExporter, ShareTarget, UnavailableShare};
use feira_store_sqlite::SqliteStoreFactory;
use tracing::{debug, error};

use crate::config::FeiraConfig;
use crate::models::{ItemEditForm, ItemForm};

/// Shown when a report is requested for an empty list.
pub const EMPTY_LIST_NOTICE: &str = "Add items to the list before generating a report.";

/// Shown when the share capability is missing.
pub const SHARE_UNAVAILABLE_NOTICE: &str =
    "Sharing is not available here. Set export.share_dir in feira.toml or pass --share-dir.";

/// Shown for any other export failure.
pub const EXPORT_FAILED_NOTICE: &str = "Could not generate the report file.";

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print every item and the grand total.
    List,

    /// Add an item. Quantity and price accept `,` or `.` as decimal separator.
    Add {
        name: String,
        quantity: String,
        unit_price: String,
    },

    /// Change some fields of an item.
    Edit {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        quantity: Option<String>,
        #[arg(long = "price")]
        unit_price: Option<String>,
    },

    /// Remove an item.
    Remove { id: String },

    /// Print the CSV report.
    Report,

    /// Write the CSV report file and share it.
    Export,
}

/// Registry with every backend this binary ships.
pub fn build_registry() -> StoreRegistry {
    let mut registry = StoreRegistry::new();
    registry.register(Box::new(MemoryStoreFactory));
    registry.register(Box::new(SqliteStoreFactory));
    registry
}

/// Opens the configured store and runs the startup load.
pub async fn open_controller(config: &FeiraConfig) -> Result<ListController> {
    debug!("connecting to {} backend", config.store.backend);
    let store = build_registry()
        .create(&config.store)
        .await
        .with_context(|| format!("cannot open '{}' store", config.store.backend))?;

    let persistence = ListPersistence::with_namespace(store, &config.namespace);
    let mut controller =
        ListController::new(persistence).with_labels(config.language.report_labels());
    controller.load().await;
    Ok(controller)
}

/// Exporter wired to the configured share outbox, or to nothing.
pub fn build_exporter(config: &FeiraConfig) -> ReportExporter {
    let share: Box<dyn ShareTarget> = match &config.export.share_dir {
        Some(dir) => Box::new(DirectoryShare::new(dir)),
        None => Box::new(UnavailableShare),
    };
    ReportExporter::new(&config.export.cache_dir, share)
        .with_labels(config.language.report_labels())
}

pub async fn run(
    command: Command,
    config: &FeiraConfig,
    controller: &mut ListController,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::List => print_list(controller, out)?,
        Command::Add {
            name,
            quantity,
            unit_price,
        } => {
            let form = ItemForm::new(name, quantity, unit_price);
            if let Err(errors) = form.validate_for_submit() {
                return print_errors(&errors, out);
            }
            let id = controller
                .add(form.name, &form.quantity, &form.unit_price)
                .await;
            if let Some(item) = controller.find(&id) {
                writeln!(out, "{}", format_item(item))?;
            }
        }
        Command::Edit {
            id,
            name,
            quantity,
            unit_price,
        } => {
            let form = ItemEditForm {
                name,
                quantity,
                unit_price,
            };
            let patch = match form.to_patch() {
                Ok(patch) => patch,
                Err(errors) => return print_errors(&errors, out),
            };
            let id = ItemId::from(id);
            controller.update(&id, &patch).await;
            if let Some(item) = controller.find(&id) {
                writeln!(out, "{}", format_item(item))?;
            }
        }
        Command::Remove { id } => controller.remove(&ItemId::from(id)).await,
        Command::Report => {
            if controller.list().is_empty() {
                writeln!(out, "{EMPTY_LIST_NOTICE}")?;
                return Ok(());
            }
            let report = controller.report()?;
            write!(out, "{}", report.csv_text)?;
        }
        Command::Export => export(config, controller, out).await?,
    }
    Ok(())
}

async fn export(
    config: &FeiraConfig,
    controller: &ListController,
    out: &mut impl Write,
) -> Result<()> {
    let exporter = build_exporter(config);
    match exporter.export(&controller.items()).await {
        Ok(outcome) => {
            writeln!(out, "Report written to {}", outcome.path.display())?;
            writeln!(out, "TOTAL GERAL: R$ {}", outcome.report.total_formatted)?;
        }
        Err(ExportError::EmptyList) => writeln!(out, "{EMPTY_LIST_NOTICE}")?,
        Err(ExportError::ShareUnavailable) => writeln!(out, "{SHARE_UNAVAILABLE_NOTICE}")?,
        Err(error) => {
            error!(%error, "export failed");
            writeln!(out, "{EXPORT_FAILED_NOTICE}")?;
        }
    }
    Ok(())
}

/// `<id>  <name>  <qty> x R$ <price> = R$ <total>`
pub fn format_item(item: &Item) -> String {
    format!(
        "{}  {}  {} x R$ {} = R$ {}",
        item.id(),
        item.name(),
        format_two_places(item.quantity()),
        format_two_places(item.unit_price()),
        format_two_places(item.total())
    )
}

fn print_list(controller: &ListController, out: &mut impl Write) -> Result<()> {
    for item in controller.items().iter() {
        writeln!(out, "{}", format_item(item))?;
    }
    writeln!(out, "TOTAL GERAL: R$ {}", format_two_places(controller.total()))?;
    Ok(())
}

fn print_errors(errors: &[String], out: &mut impl Write) -> Result<()> {
    for message in errors {
        writeln!(out, "error: {message}")?;
    }
    Ok(())
}
