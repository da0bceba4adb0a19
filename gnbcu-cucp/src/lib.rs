//! gnbcu-cucp - CU-CP Orchestration Library
#![allow(missing_docs)]
//!
//! This crate provides the control-plane orchestration core of a gNB
//! Central Unit (CU-CP). It implements:
//!
//! - Named task executors with bounded queues and explicit shutdown
//! - An async task engine that resumes suspended tasks on their owning
//!   executor
//! - Per-key FIFO task scheduling so procedures for one UE never overlap
//! - Peer connection management for DU and CU-UP attach points
//! - A top-level controller sequencing admission and graceful shutdown
//! - The UE context release routine and inter-interface cause translation
//! - Periodic metrics report sessions
//!
//! # Architecture
//!
//! Every mutation of orchestration state happens as a job on a task
//! executor. Procedures are async tasks: launched synchronously up to
//! their first await, then resumed on the executor that owns the
//! underlying entity.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       CuCpController                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌───────────────┐  │
//! │  │ DU connection  │  │ CU-UP conn.    │  │ ctrl          │  │
//! │  │ manager        │  │ manager        │  │ TaskExecutor  │  │
//! │  └───────┬────────┘  └───────┬────────┘  └───────┬───────┘  │
//! │          │                   │                   │          │
//! │   per-peer executor   per-peer executor    NGAP teardown    │
//! │   + TaskScheduler     + TaskScheduler      async task       │
//! └──────────┼───────────────────┼───────────────────┼──────────┘
//!            │                   │                   │
//!            ▼                   ▼                   ▼
//!       UE routines         UE routines         AMF (NGAP)
//! ```
//!
//! # Shutdown
//!
//! `CuCpController::stop()` is blocking and idempotent: it drains the DU
//! and CU-UP managers, then runs the core-network teardown as an async
//! task whose completion event releases the caller.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use gnbcu_common::config::load_and_validate_cu_cp_config;
//! use gnbcu_cucp::CuCpController;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = load_and_validate_cu_cp_config("config/cu_cp.yaml").unwrap();
//!     let ctrl = CuCpController::new(config, ngap_notifier());
//!
//!     // Serve requests...
//!     // tokio::task::spawn_blocking(move || ctrl.stop()).await;
//! }
//! ```

pub mod async_task;
pub mod cause;
pub mod controller;
pub mod executor;
pub mod manager;
pub mod messages;
pub mod metrics;
pub mod notifiers;
pub mod routines;
pub mod scheduler;

// Re-export task engine types
pub use async_task::{launch_async_task, AsyncTask, ManualEvent};
pub use executor::{Job, TaskExecutor};
pub use scheduler::{TaskScheduler, UeTaskScheduler};

// Re-export connection management types
pub use manager::{
    ConnectionRequest, CuUpConnectionManager, DuConnectionManager, PeerConnectionManager,
};

// Re-export controller types
pub use controller::{ControllerState, CuCpController};

// Re-export procedure types
pub use cause::{ngap_to_e1ap_cause, ngap_to_f1ap_cause, E1apCause, F1apCause, NgapCause};
pub use routines::UeContextReleaseRoutine;

// Re-export metrics types
pub use metrics::{
    DuMetrics, DuMetricsProvider, MetricsHandler, MetricsReport, MetricsReportNotifier,
    MetricsSession, UeMetrics, UeMetricsProvider,
};
