//! Job postings: CRUD, document-driven creation, and per-job candidate
//! matching.

pub mod handlers;
pub mod store;
