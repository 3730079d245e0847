//! Durable file storage for uploaded documents.
//!
//! Files land under `<upload_dir>/<candidate_id>/<timestamp>_<filename>`:
//! the per-candidate subdirectory avoids cross-candidate collisions and the
//! UTC timestamp prefix is a secondary guard within one candidate.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::warn;

use crate::errors::AppError;

/// Writes upload bytes to durable storage, returning the stored path.
pub async fn save_upload(
    upload_dir: &str,
    candidate_id: &str,
    file_name: &str,
    bytes: &[u8],
) -> Result<PathBuf, AppError> {
    let candidate_dir = Path::new(upload_dir).join(candidate_id);
    tokio::fs::create_dir_all(&candidate_dir)
        .await
        .map_err(|e| AppError::Storage(format!("Failed to create upload directory: {e}")))?;

    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let stored_name = format!("{timestamp}_{}", sanitize_file_name(file_name));
    let path = candidate_dir.join(stored_name);

    tokio::fs::write(&path, bytes)
        .await
        .map_err(|e| AppError::Storage(format!("Failed to save file: {e}")))?;

    Ok(path)
}

/// Best-effort removal of a stored file. Failure is logged, never surfaced:
/// the database deletion it follows must not be rolled back.
pub async fn remove_file(path: &str) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!("Failed to remove stored file {path}: {e}");
    }
}

/// Keeps stored names flat: path separators and parent references in the
/// client-supplied filename must not escape the candidate directory.
fn sanitize_file_name(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name)
        .replace("..", "_");
    if base.is_empty() {
        "upload.bin".to_string()
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_creates_candidate_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().to_str().unwrap();

        let path = save_upload(root, "cand-1", "resume.pdf", b"bytes")
            .await
            .unwrap();

        assert!(path.starts_with(dir.path().join("cand-1")));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"bytes");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.ends_with("_resume.pdf"));
    }

    #[tokio::test]
    async fn remove_missing_file_does_not_error() {
        // Must be infallible from the caller's perspective.
        remove_file("/definitely/not/a/real/path.bin").await;
    }

    #[test]
    fn file_names_cannot_escape_the_directory() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("c:\\temp\\cv.pdf"), "cv.pdf");
        assert_eq!(sanitize_file_name(""), "upload.bin");
        assert_eq!(sanitize_file_name("plain.txt"), "plain.txt");
    }
}
