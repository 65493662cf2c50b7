// ABOUTME: Library root for stable-galaxy - rollback orchestration for deployed services.
// ABOUTME: The CLI binary is in main.rs.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod hooks;
pub mod logging;
pub mod monitor;
pub mod output;
pub mod rollback;
pub mod strategy;
pub mod types;
