//! Append-only audit trail of every accepted upload, kept independent of
//! the candidate/document lifecycle so deletions never erase provenance.

use sqlx::PgPool;
use tracing::warn;

/// Records an accepted upload. Failure is logged, never surfaced: the audit
/// trail must not block the ingestion path.
pub async fn record_raw_upload(db: &PgPool, file_name: &str, file_hash: &str, raw_text: &str) {
    let result = sqlx::query(
        "INSERT INTO raw_uploads (file_name, file_hash, raw_text) VALUES ($1, $2, $3)",
    )
    .bind(file_name)
    .bind(file_hash)
    .bind(raw_text)
    .execute(db)
    .await;

    if let Err(e) = result {
        warn!("Failed to record raw upload audit row for {file_name}: {e}");
    }
}
