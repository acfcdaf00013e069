//! CSV report export and hand-off to a share capability.

mod exporter;
mod share;

pub use exporter::{
    ExportError, ExportOutcome, REPORT_MIME_TYPE, ReportExporter, SHARE_DIALOG_TITLE,
    report_file_name,
};
pub use share::{DirectoryShare, ShareError, ShareTarget, UnavailableShare};
