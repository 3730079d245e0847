//! Uploaded documents: metadata lookup, original-bytes download, deletion.

pub mod handlers;
pub mod store;
