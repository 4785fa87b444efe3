//! gh-app-token library
//!
//! Mints GitHub App installation access tokens and caches them on disk. The
//! modules are exposed for the binary and for integration tests.

pub mod auth;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod installation;
pub mod token;
