//! Integration test framework for the gNB CU-CP orchestration core
#![allow(missing_docs)]
//!
//! This crate provides mock peer components and cross-module integration
//! tests for the `gnbcu-cucp` crate.
//!
//! # Components
//!
//! - [`mock_peers`] - Mock NGAP / E1AP / F1AP / RRC peers with call recording
//! - [`test_utils`] - Logging setup and condition polling helpers
//!
//! # Test Categories
//!
//! 1. **UE Release Tests** - UE context release through the per-UE scheduler
//! 2. **Shutdown Tests** - Full CU-CP shutdown with live peers and in-flight
//!    procedures

pub mod mock_peers;
pub mod test_utils;

pub mod cucp_shutdown;
pub mod ue_release_flow;

pub use mock_peers::{MockNgap, MockUePeers};
pub use test_utils::{init_test_logging, wait_for_condition, TestResult, DEFAULT_TEST_TIMEOUT};
