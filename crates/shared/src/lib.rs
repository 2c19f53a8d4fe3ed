//! Shared errors and configuration for Caixa.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error taxonomy
//! - Configuration management

pub mod config;
pub mod error;

pub use config::{AppConfig, DatabaseConfig, ReportsConfig, ServerConfig};
pub use error::{AppError, AppResult};
