// ABOUTME: Library root for webroll - exposes the rollout building blocks for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod error;
pub mod health;
pub mod links;
pub mod preflight;
pub mod publish;
pub mod rollout;
pub mod server;
pub mod snapshot;
pub mod tree;
pub mod types;
