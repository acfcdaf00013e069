use std::{fs::File, io, path::Path, sync::Arc};

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{Event, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{
        FmtContext,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// `2025-03-07T18:04:11.123-03:00  INFO persistence.rs:180 list saved items=2`
struct LocalTimeFormat;

impl<S, N> FormatEvent<S, N> for LocalTimeFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        write!(
            writer,
            "{} {:>5} ",
            Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z"),
            meta.level()
        )?;

        if let (Some(file), Some(line)) = (meta.file(), meta.line()) {
            let file = file.rsplit(['/', '\\']).next().unwrap_or(file);
            write!(writer, "{file}:{line} ")?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` when `verbose`.
fn make_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }))
}

/// Initializes logging. Call once at startup.
///
/// Records go to stderr, so stdout only carries command output, and are
/// also appended to `file` when one is configured. The file's directory
/// must already exist.
pub fn init_logging(
    verbose: bool,
    file: Option<&Path>,
) -> Result<()> {
    let file_layer = match file {
        Some(path) => {
            let log_file = File::options()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file '{}'", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .event_format(LocalTimeFormat)
                    .with_ansi(false)
                    .with_writer(Arc::new(log_file)),
            )
        }
        None => None,
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalTimeFormat)
        .with_ansi(false)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(make_filter(verbose))
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("logging already initialized")?;
    Ok(())
}
