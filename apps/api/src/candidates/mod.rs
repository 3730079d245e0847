//! Candidate profiles: CRUD, resume ingestion, extra details, and PDF
//! profile summaries.

pub mod handlers;
pub mod prompts;
pub mod store;
