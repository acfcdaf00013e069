use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShareError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Share rejected: {0}")]
    Rejected(String),
}

/// Platform share capability: hands a finished file to something outside
/// the application.
#[async_trait]
pub trait ShareTarget: Send + Sync {
    /// Whether sharing can work at all on this device/configuration.
    async fn is_available(&self) -> bool;

    async fn share(
        &self,
        path: &Path,
        mime_type: &str,
        dialog_title: &str,
    ) -> Result<(), ShareError>;
}

/// Shares by copying the file into an outbox directory, which is created on
/// first use.
#[derive(Debug, Clone)]
pub struct DirectoryShare {
    outbox: PathBuf,
}

impl DirectoryShare {
    pub fn new(outbox: impl Into<PathBuf>) -> Self {
        Self {
            outbox: outbox.into(),
        }
    }
}

#[async_trait]
impl ShareTarget for DirectoryShare {
    async fn is_available(&self) -> bool {
        match tokio::fs::create_dir_all(&self.outbox).await {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(outbox = %self.outbox.display(), %error, "share outbox unavailable");
                false
            }
        }
    }

    async fn share(
        &self,
        path: &Path,
        mime_type: &str,
        dialog_title: &str,
    ) -> Result<(), ShareError> {
        let file_name = path
            .file_name()
            .ok_or_else(|| ShareError::Rejected(format!("'{}' has no file name", path.display())))?;
        let target = self.outbox.join(file_name);

        tokio::fs::copy(path, &target).await?;

        tracing::info!(
            destination = %target.display(),
            mime_type,
            dialog_title,
            "report shared"
        );
        Ok(())
    }
}

/// Share target for setups with no way to share. Never available.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableShare;

#[async_trait]
impl ShareTarget for UnavailableShare {
    async fn is_available(&self) -> bool {
        false
    }

    async fn share(
        &self,
        _path: &Path,
        _mime_type: &str,
        _dialog_title: &str,
    ) -> Result<(), ShareError> {
        Err(ShareError::Rejected("sharing is not available".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn directory_share_creates_outbox_and_copies_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("report.csv");
        std::fs::write(&source, "a;b\n").unwrap();
        let share = DirectoryShare::new(dir.path().join("outbox"));

        assert!(share.is_available().await);
        share.share(&source, "text/csv", "title").await.unwrap();

        let copied = std::fs::read_to_string(dir.path().join("outbox").join("report.csv")).unwrap();
        assert_eq!(copied, "a;b\n");
    }

    #[tokio::test]
    async fn directory_share_of_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let share = DirectoryShare::new(dir.path());

        let result = share.share(&dir.path().join("nope.csv"), "text/csv", "t").await;

        assert!(matches!(result, Err(ShareError::Io(_))));
    }

    #[tokio::test]
    async fn unavailable_share_is_never_available() {
        assert!(!UnavailableShare.is_available().await);
        assert!(matches!(
            UnavailableShare.share(Path::new("x.csv"), "text/csv", "t").await,
            Err(ShareError::Rejected(_))
        ));
    }
}
