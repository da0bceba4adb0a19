//! Common types and utilities for the gNB CU-CP
//!
//! This crate provides shared types, configuration structures, error types
//! and logging setup used across the CU-CP crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::{AdmissionConfig, CuCpConfig, DispatchRetryConfig, ExecutorConfig};
pub use error::Error;
pub use logging::{init_logging, init_logging_with_filter, LogLevel};
pub use types::*;
