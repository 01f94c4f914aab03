//! Genie: AI mock-interview backend plus the voice Interview Session Controller.

pub mod config;
pub mod db;
pub mod errors;
pub mod feedback;
pub mod interview;
pub mod llm_client;
pub mod models;
pub mod resume;
pub mod routes;
pub mod session;
pub mod state;
