//! Shared multipart handling for file-upload endpoints.

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::Bytes;
use sha2::{Digest, Sha256};

use crate::errors::AppError;

/// An uploaded file pulled out of a multipart body.
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Hex-encoded SHA-256 of the raw bytes, used for de-duplication.
    pub fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.bytes);
        hex::encode(hasher.finalize())
    }
}

/// Reads the `file` field from a multipart body. Other fields are skipped.
pub async fn read_file_field(multipart: &mut Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(map_multipart_error)?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Uploaded file has no filename".to_string()))?;
        let bytes = field.bytes().await.map_err(map_multipart_error)?;
        return Ok(UploadedFile { file_name, bytes });
    }
    Err(AppError::Validation(
        "Missing multipart field 'file'".to_string(),
    ))
}

/// Bodies that blow past the transport limit must still read as 413, not
/// as a generic malformed-multipart 400.
fn map_multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Request body exceeds the upload limit".to_string())
    } else {
        AppError::Validation(format!("Invalid multipart payload: {e}"))
    }
}

/// Builds a single-file multipart POST request for handler tests.
#[cfg(test)]
pub(crate) fn multipart_request(
    uri: &str,
    file_name: &str,
    payload: &[u8],
) -> axum::http::Request<axum::body::Body> {
    let boundary = "testboundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(payload);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            axum::http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(axum::body::Body::from(body))
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_hash_is_hex_sha256() {
        let upload = UploadedFile {
            file_name: "cv.txt".to_string(),
            bytes: Bytes::from_static(b"hello"),
        };
        assert_eq!(
            upload.content_hash(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }
}
