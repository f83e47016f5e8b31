use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::{debug, warn};

/// Scoped handle to a request's buffered upload. The file is removed when
/// the handle is dropped, so every exit path (including early failures)
/// cleans up after itself.
pub struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    pub async fn write(dir: &Path, file_name: &str, data: Bytes) -> std::io::Result<Self> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(file_name);
        tokio::fs::write(&path, &data).await?;
        debug!(path = %path.display(), bytes = data.len(), "upload buffered to disk");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to remove uploaded file");
        } else {
            debug!(path = %self.path.display(), "uploaded file removed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let upload = TempUpload::write(dir.path(), "lecture.mp3", Bytes::from_static(b"audio"))
            .await
            .unwrap();
        let path = upload.path().to_path_buf();
        assert!(path.exists());

        drop(upload);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn file_is_removed_even_when_processing_bails_early() {
        let dir = tempfile::tempdir().unwrap();
        let path;
        {
            let upload = TempUpload::write(dir.path(), "lecture.wav", Bytes::from_static(b"audio"))
                .await
                .unwrap();
            path = upload.path().to_path_buf();
            // Simulates a handler erroring out before the pipeline runs.
        }
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn write_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("uploads");
        let upload = TempUpload::write(&nested, "a.mp3", Bytes::from_static(b"x"))
            .await
            .unwrap();
        assert!(upload.path().exists());
    }
}
