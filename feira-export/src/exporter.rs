use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use feira_core::{Item, Report, ReportError, ReportLabels, generate_report_with};
use thiserror::Error;

use crate::share::{ShareError, ShareTarget};

/// MIME type announced to the share target.
pub const REPORT_MIME_TYPE: &str = "text/csv";

/// Title of the share dialog.
pub const SHARE_DIALOG_TITLE: &str = "Compartilhar Relatório de Feira";

/// Errors that can occur while exporting and sharing a report.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing to report; the user should add items first.
    #[error("the list is empty; add items before generating a report")]
    EmptyList,

    #[error("sharing is not available on this device")]
    ShareUnavailable,

    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    #[error("could not write report file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Share error: {0}")]
    Share(#[from] ShareError),
}

/// `Relatorio_Feira_<YYYY-MM-DD>.csv`
pub fn report_file_name(date: NaiveDate) -> String {
    format!("Relatorio_Feira_{}.csv", date.format("%Y-%m-%d"))
}

/// What a successful export produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub report: Report,
}

/// Writes the CSV report into a cache directory and hands it to a
/// [`ShareTarget`].
pub struct ReportExporter {
    cache_dir: PathBuf,
    share: Box<dyn ShareTarget>,
    labels: ReportLabels,
}

impl ReportExporter {
    pub fn new(cache_dir: impl Into<PathBuf>, share: Box<dyn ShareTarget>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            share,
            labels: ReportLabels::default(),
        }
    }

    pub fn with_labels(mut self, labels: ReportLabels) -> Self {
        self.labels = labels;
        self
    }

    /// Exports with today's local date in the file name.
    pub async fn export(&self, items: &[Item]) -> Result<ExportOutcome, ExportError> {
        self.export_on(items, Local::now().date_naive()).await
    }

    /// Exports `items` as `Relatorio_Feira_<date>.csv`.
    ///
    /// Share availability is checked before anything touches the disk, so
    /// an unavailable share target leaves no file behind. A failed share
    /// removes the file it wrote.
    ///
    /// # Errors
    /// * [`ExportError::EmptyList`]: `items` is empty.
    /// * [`ExportError::ShareUnavailable`]: the share target reports it
    ///   cannot share.
    /// * [`ExportError::Write`]: the cache file could not be written.
    /// * [`ExportError::Share`]: the share target failed.
    pub async fn export_on(
        &self,
        items: &[Item],
        date: NaiveDate,
    ) -> Result<ExportOutcome, ExportError> {
        if items.is_empty() {
            return Err(ExportError::EmptyList);
        }

        let report = generate_report_with(items, &self.labels)?;

        if !self.share.is_available().await {
            tracing::warn!("share target unavailable, export aborted");
            return Err(ExportError::ShareUnavailable);
        }

        let path = self.cache_dir.join(report_file_name(date));
        write_atomically(&path, &report.csv_text).await?;
        tracing::debug!(path = %path.display(), "report written");

        if let Err(error) = self
            .share
            .share(&path, REPORT_MIME_TYPE, SHARE_DIALOG_TITLE)
            .await
        {
            tracing::error!(path = %path.display(), %error, "failed to share report");
            if let Err(cleanup) = tokio::fs::remove_file(&path).await {
                tracing::warn!(path = %path.display(), error = %cleanup, "could not remove report file");
            }
            return Err(error.into());
        }

        Ok(ExportOutcome { path, report })
    }
}

/// Writes to a sibling temp file and renames it into place, so the final
/// path only ever holds a complete report.
async fn write_atomically(path: &Path, contents: &str) -> Result<(), ExportError> {
    let write_error = |source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(write_error)?;
    }

    let tmp = path.with_extension("csv.tmp");
    tokio::fs::write(&tmp, contents).await.map_err(write_error)?;
    tokio::fs::rename(&tmp, path).await.map_err(write_error)?;
    Ok(())
}
