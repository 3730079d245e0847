//! Persistence for uploaded documents.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::ingest::storage;
use crate::models::document::Document;

pub async fn get_document(db: &PgPool, id: Uuid) -> Result<Document, AppError> {
    let document: Option<Document> = sqlx::query_as("SELECT * FROM documents WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await?;
    document.ok_or_else(|| AppError::NotFound(format!("Document {id} not found")))
}

pub async fn insert_document(
    db: &PgPool,
    candidate_id: Uuid,
    file_name: &str,
    file_type: &str,
    content_text: &str,
    raw_file_path: &str,
) -> Result<Document, AppError> {
    let document = sqlx::query_as(
        r#"
        INSERT INTO documents (candidate_id, file_name, file_type, content_text, raw_file_path)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(candidate_id)
    .bind(file_name)
    .bind(file_type)
    .bind(content_text)
    .bind(raw_file_path)
    .fetch_one(db)
    .await?;
    Ok(document)
}

/// Deletes a document: database row first, then best-effort removal of the
/// stored file. A missing row is not an error — document references are
/// weak and may already be gone.
pub async fn delete_document(db: &PgPool, id: Uuid) -> Result<(), AppError> {
    let document: Option<Document> = sqlx::query_as("SELECT * FROM documents WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await?;
    let Some(document) = document else {
        return Ok(());
    };

    sqlx::query("DELETE FROM documents WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    storage::remove_file(&document.raw_file_path).await;
    Ok(())
}
