use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An uploaded document. Owned by exactly one candidate.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: Uuid,
    pub candidate_id: Uuid,
    pub file_name: String,
    /// One of "PDF", "DOCX", "TXT".
    pub file_type: String,
    /// Extracted text; empty when extraction failed. Extraction failure
    /// degrades gracefully rather than blocking the upload.
    pub content_text: String,
    /// Location of the original bytes on durable storage.
    pub raw_file_path: String,
    pub upload_date: DateTime<Utc>,
}

/// The closed set of storable document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Docx,
    Txt,
}

impl FileType {
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, ext) = file_name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(FileType::Pdf),
            "docx" => Some(FileType::Docx),
            "txt" | "text" => Some(FileType::Txt),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Pdf => "PDF",
            FileType::Docx => "DOCX",
            FileType::Txt => "TXT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_type_from_name() {
        assert_eq!(FileType::from_file_name("cv.pdf"), Some(FileType::Pdf));
        assert_eq!(FileType::from_file_name("cv.DOCX"), Some(FileType::Docx));
        assert_eq!(FileType::from_file_name("notes.text"), Some(FileType::Txt));
        assert_eq!(FileType::from_file_name("image.jpg"), None);
        assert_eq!(FileType::from_file_name("noext"), None);
    }

    #[test]
    fn canonical_names_are_uppercase() {
        assert_eq!(FileType::Pdf.as_str(), "PDF");
        assert_eq!(FileType::Docx.as_str(), "DOCX");
        assert_eq!(FileType::Txt.as_str(), "TXT");
    }
}
