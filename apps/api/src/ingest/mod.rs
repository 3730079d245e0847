//! Upload ingestion: multipart plumbing, text extraction from document
//! bytes, durable file storage, and the raw-upload audit trail.

pub mod audit;
pub mod multipart;
pub mod parsing;
pub mod storage;
