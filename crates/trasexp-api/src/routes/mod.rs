//! Route modules for the API server
//!
//! Larger areas are split into a directory with `mod.rs` for exports and
//! `api.rs` for the JSON handlers; small ones live in a single file.

pub mod accounts;
pub mod analytics;
pub mod auth;
pub mod dashboard;
pub mod profile;
pub mod security;
pub mod settings;
pub mod transactions;
