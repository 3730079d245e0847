use axum::{
    extract::{Path, State},
    http::header,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::documents::store;
use crate::errors::AppError;
use crate::models::document::Document;
use crate::state::AppState;

/// GET /api/documents/:id
pub async fn handle_get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Document>, AppError> {
    let document = store::get_document(&state.db, id).await?;
    Ok(Json(document))
}

/// GET /api/documents/:id/download
///
/// Streams the original uploaded bytes. A row whose backing file has gone
/// missing reads as not found, same as a missing row.
pub async fn handle_download_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl axum::response::IntoResponse, AppError> {
    let document = store::get_document(&state.db, id).await?;

    let bytes = tokio::fs::read(&document.raw_file_path)
        .await
        .map_err(|_| AppError::NotFound(format!("Document file for {id} not found")))?;

    let headers = [
        (
            header::CONTENT_TYPE,
            "application/octet-stream".to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", document.file_name),
        ),
    ];
    Ok((headers, bytes))
}

/// DELETE /api/documents/:id
///
/// Same receipt shape as job and candidate deletion.
pub async fn handle_delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    // 404 on unknown id; the deletion itself tolerates a vanished row.
    store::get_document(&state.db, id).await?;
    store::delete_document(&state.db, id).await?;
    Ok(Json(deletion_receipt()))
}

fn deletion_receipt() -> Value {
    json!({ "message": "Document deleted successfully" })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_receipt_matches_the_other_delete_surfaces() {
        let receipt = deletion_receipt();
        assert_eq!(receipt["message"], "Document deleted successfully");
        assert!(receipt["message"].as_str().unwrap().ends_with("successfully"));
    }
}
