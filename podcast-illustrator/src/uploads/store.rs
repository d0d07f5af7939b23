use std::fmt;
use std::path::{Path, PathBuf};

use axum::body::Bytes;
use futures::{Stream, StreamExt};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::sanitize_filename;

/// Identifier handed back to the client for an accepted upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("upload exceeds the size limit")]
    TooLarge,
    #[error("failed reading upload body: {0}")]
    Stream(String),
    #[error("failed writing upload: {0}")]
    Io(#[from] std::io::Error),
}

/// A file written to disk under its job directory.
#[derive(Debug, Clone)]
pub struct StoredUpload {
    pub job_id: JobId,
    pub path: PathBuf,
    pub size: u64,
}

/// Writes uploads to `<root>/<job_id>/<filename>`.
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn job_dir(&self, job_id: JobId) -> PathBuf {
        self.root.join(job_id.to_string())
    }

    /// Stream `body` to disk. The job directory is removed if anything fails.
    pub async fn store<S>(
        &self,
        job_id: JobId,
        filename: &str,
        body: S,
    ) -> Result<StoredUpload, UploadError>
    where
        S: Stream<Item = Result<Bytes, UploadError>>,
    {
        let dir = self.job_dir(job_id);
        let path = dir.join(sanitize_filename(filename));

        match write_stream(&dir, &path, body).await {
            Ok(size) => Ok(StoredUpload { job_id, path, size }),
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_dir_all(&dir).await
                    && cleanup.kind() != std::io::ErrorKind::NotFound
                {
                    tracing::warn!(dir = %dir.display(), "failed to remove partial upload: {cleanup}");
                }
                Err(e)
            }
        }
    }
}

async fn write_stream<S>(dir: &Path, path: &Path, body: S) -> Result<u64, UploadError>
where
    S: Stream<Item = Result<Bytes, UploadError>>,
{
    tokio::fs::create_dir_all(dir).await?;
    let mut file = tokio::fs::File::create(path).await?;

    let mut body = std::pin::pin!(body);
    let mut size = 0u64;
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        size += chunk.len() as u64;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    fn chunks(
        parts: &[&'static [u8]],
    ) -> impl Stream<Item = Result<Bytes, UploadError>> + use<> {
        stream::iter(
            parts
                .iter()
                .map(|p| Ok(Bytes::from_static(*p)))
                .collect::<Vec<_>>(),
        )
    }

    #[test]
    fn test_job_id_display_is_hyphenated_uuid() {
        let id = JobId::new();
        let text = id.to_string();
        assert_eq!(text.len(), 36);
        assert!(Uuid::parse_str(&text).is_ok());
        assert_ne!(JobId::new(), id);
    }

    #[tokio::test]
    async fn test_store_writes_all_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().to_path_buf());
        let job_id = JobId::new();

        let body = chunks(&[
            b"ID3".as_slice(),
            b"\x00\x01".as_slice(),
            b"rest".as_slice(),
        ]);
        let stored = store.store(job_id, "show.mp3", body).await.unwrap();

        assert_eq!(stored.size, 9);
        assert_eq!(stored.path, store.job_dir(job_id).join("show.mp3"));
        let contents = tokio::fs::read(&stored.path).await.unwrap();
        assert_eq!(contents, b"ID3\x00\x01rest");
    }

    #[tokio::test]
    async fn test_store_sanitizes_filename() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().to_path_buf());
        let job_id = JobId::new();

        let stored = store
            .store(job_id, "../../escape.wav", chunks(&[b"x".as_slice()]))
            .await
            .unwrap();

        assert_eq!(stored.path, store.job_dir(job_id).join("escape.wav"));
        assert!(stored.path.starts_with(dir.path()));
    }

    #[tokio::test]
    async fn test_store_empty_body() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().to_path_buf());

        let stored = store.store(JobId::new(), "a.mp3", chunks(&[])).await.unwrap();
        assert_eq!(stored.size, 0);
        assert!(stored.path.exists());
    }

    #[tokio::test]
    async fn test_store_failure_removes_job_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().to_path_buf());
        let job_id = JobId::new();

        let body = stream::iter(vec![
            Ok(Bytes::from_static(b"partial")),
            Err(UploadError::TooLarge),
        ]);
        let err = store.store(job_id, "a.mp3", body).await.unwrap_err();

        assert!(matches!(err, UploadError::TooLarge));
        assert!(!store.job_dir(job_id).exists());
    }
}
