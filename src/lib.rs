//! Game catalog browsing and mood-based recommendation service.
//!
//! The catalog is loaded once from a pre-built JSON file and served read-only:
//! paginated, searchable and optionally shuffled browsing through `/api/games`,
//! and mood recommendations over a caller-supplied library through
//! `/api/recommendations`.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
