pub mod candidates;
pub mod config;
pub mod db;
pub mod documents;
pub mod errors;
pub mod extract;
pub mod ingest;
pub mod jobs;
pub mod llm_client;
pub mod matching;
pub mod models;
pub mod render;
pub mod routes;
pub mod state;
