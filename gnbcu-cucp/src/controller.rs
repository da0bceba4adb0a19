//! CU-CP controller
//!
//! Top-level orchestrator owning the peer connection managers and the
//! core-network session. It gates admission (no DU without a core-network
//! session, no UE setup without a core-network session and a user-plane
//! peer) and sequences graceful shutdown: peer managers first, then the
//! core-network teardown as an async task on the control executor.
//!
//! `stop()` is callable from an outer (non-runtime) thread. The
//! asynchronous teardown tail completes a one-shot [`ManualEvent`] that the
//! blocking caller waits on, so `stop()` never returns before the whole
//! shutdown chain has finished.

use std::sync::{Arc, Mutex};

use gnbcu_common::config::CuCpConfig;
use gnbcu_common::Error;
use tracing::{debug, error, info};

use crate::async_task::{launch_async_task, ManualEvent};
use crate::executor::TaskExecutor;
use crate::manager::{CuUpConnectionManager, DuConnectionManager, PeerConnectionManager};
use crate::messages::DuSetupRequest;
use crate::notifiers::NgapConnectionNotifier;

/// Controller lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Constructed and serving requests.
    Running,
    /// Shutdown in progress.
    Stopping,
    /// Shutdown complete.
    Stopped,
}

/// Top-level CU-CP orchestrator.
pub struct CuCpController {
    config: CuCpConfig,
    ngap_notifier: Arc<dyn NgapConnectionNotifier>,
    du_mng: DuConnectionManager,
    cu_up_mng: CuUpConnectionManager,
    ctrl_exec: TaskExecutor,
    state: Arc<Mutex<ControllerState>>,
    stop_done: ManualEvent<()>,
}

impl CuCpController {
    /// Creates the controller and its peer managers.
    ///
    /// Must be called from within a tokio runtime context (the control
    /// executor is spawned here).
    pub fn new(config: CuCpConfig, ngap_notifier: Arc<dyn NgapConnectionNotifier>) -> Self {
        let queue_size = config.executor.queue_size;
        let retry = config.dispatch_retry.clone();
        let du_mng = PeerConnectionManager::new(
            "du",
            config.admission.max_nof_dus,
            queue_size,
            retry.clone(),
        );
        let cu_up_mng = PeerConnectionManager::new(
            "cu-up",
            config.admission.max_nof_cu_ups,
            queue_size,
            retry,
        );
        let ctrl_exec = TaskExecutor::new("cu-cp-ctrl", queue_size);
        Self {
            config,
            ngap_notifier,
            du_mng,
            cu_up_mng,
            ctrl_exec,
            state: Arc::new(Mutex::new(ControllerState::Running)),
            stop_done: ManualEvent::new(),
        }
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> ControllerState {
        *self.state.lock().unwrap()
    }

    /// Returns the DU connection manager.
    pub fn du_manager(&self) -> &DuConnectionManager {
        &self.du_mng
    }

    /// Returns the CU-UP connection manager.
    pub fn cu_up_manager(&self) -> &CuUpConnectionManager {
        &self.cu_up_mng
    }

    /// Returns the control executor.
    pub fn ctrl_executor(&self) -> &TaskExecutor {
        &self.ctrl_exec
    }

    /// Admission gate for a new DU attach request.
    ///
    /// A DU is accepted only while the core-network session is connected.
    pub fn handle_du_setup_request(&self, request: &DuSetupRequest) -> bool {
        if !self.ngap_notifier.is_connected() {
            debug!(
                gnb_du_id = %request.gnb_du_id,
                "rejecting DU setup: core-network session not connected"
            );
            return false;
        }
        true
    }

    /// Admission gate for a new UE setup.
    ///
    /// Requires a connected core-network session and at least one user-plane
    /// peer.
    pub fn request_ue_setup(&self) -> bool {
        if !self.ngap_notifier.is_connected() {
            return false;
        }
        if self.cu_up_mng.count() == 0 {
            return false;
        }
        true
    }

    /// Stops the CU-CP.
    ///
    /// Blocking and idempotent; intended to be called from an outer thread.
    /// Stops the DU and CU-UP managers (draining their connections), then
    /// runs the core-network teardown as an async task on the control
    /// executor and waits for its completion event before returning.
    pub fn stop(&self) -> Result<(), Error> {
        {
            let mut state = self.state.lock().unwrap();
            match *state {
                ControllerState::Stopped => return Ok(()),
                ControllerState::Stopping => {
                    // Another caller is already driving the shutdown; wait
                    // for the same completion event.
                    drop(state);
                    self.stop_done.wait_blocking();
                    return Ok(());
                }
                ControllerState::Running => *state = ControllerState::Stopping,
            }
        }

        info!("stopping CU-CP");

        // Stop and delete DU connections, then CU-UP connections.
        self.du_mng.stop();
        self.cu_up_mng.stop();

        // Core-network teardown runs as an async task on the control
        // executor; its completion event releases this blocking caller. The
        // state flips to Stopped before the event fires, so every caller
        // released by the event observes the final state.
        let ngap = self.ngap_notifier.clone();
        let exec = self.ctrl_exec.clone();
        let state = self.state.clone();
        let done = self.stop_done.clone();
        let dispatched = self
            .ctrl_exec
            .dispatch_with_retry(&self.config.dispatch_retry, move || {
                launch_async_task(&exec, async move {
                    ngap.stop().await;
                    *state.lock().unwrap() = ControllerState::Stopped;
                    done.set(());
                });
            });

        if let Err(err) = dispatched {
            error!(%err, "failed to dispatch core-network teardown");
            *self.state.lock().unwrap() = ControllerState::Stopped;
            self.stop_done.set(());
            return Err(err);
        }

        self.stop_done.wait_blocking();
        info!("CU-CP stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::ConnectionRequest;
    use async_trait::async_trait;
    use gnbcu_common::GnbDuId;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    struct MockNgap {
        connected: AtomicBool,
        stop_calls: AtomicUsize,
        gate: ManualEvent<()>,
    }

    impl MockNgap {
        fn new(connected: bool, gate: ManualEvent<()>) -> Arc<Self> {
            Arc::new(Self {
                connected: AtomicBool::new(connected),
                stop_calls: AtomicUsize::new(0),
                gate,
            })
        }
    }

    #[async_trait]
    impl NgapConnectionNotifier for MockNgap {
        fn is_connected(&self) -> bool {
            self.connected.load(Ordering::SeqCst)
        }

        async fn stop(&self) {
            self.stop_calls.fetch_add(1, Ordering::SeqCst);
            self.gate.wait().await;
        }
    }

    fn du_request() -> DuSetupRequest {
        DuSetupRequest {
            gnb_du_id: GnbDuId(1),
            gnb_du_name: Some("du-0".into()),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_du_setup_gated_on_ngap_connection() {
        let ngap = MockNgap::new(false, ManualEvent::completed(()));
        let ctrl = CuCpController::new(CuCpConfig::default(), ngap.clone());

        assert!(!ctrl.handle_du_setup_request(&du_request()));
        ngap.connected.store(true, Ordering::SeqCst);
        assert!(ctrl.handle_du_setup_request(&du_request()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_ue_setup_requires_ngap_and_cu_up() {
        let ngap = MockNgap::new(true, ManualEvent::completed(()));
        let ctrl = CuCpController::new(CuCpConfig::default(), ngap.clone());

        // No CU-UP connected yet.
        assert!(!ctrl.request_ue_setup());

        ctrl.cu_up_manager()
            .add(ConnectionRequest {
                name: "cu-up-0".into(),
            })
            .unwrap();
        assert!(ctrl.request_ue_setup());

        // Core-network session lost.
        ngap.connected.store(false, Ordering::SeqCst);
        assert!(!ctrl.request_ue_setup());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_stop_blocks_until_teardown_completes() {
        let gate = ManualEvent::<()>::new();
        let ngap = MockNgap::new(true, gate.clone());
        let ctrl = Arc::new(CuCpController::new(CuCpConfig::default(), ngap.clone()));

        let c = ctrl.clone();
        let stop = tokio::task::spawn_blocking(move || c.stop());

        // The teardown awaits the external trigger; stop() must still be
        // blocked.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!stop.is_finished());
        assert_eq!(ngap.stop_calls.load(Ordering::SeqCst), 1);

        gate.set(());
        stop.await.unwrap().unwrap();
        assert_eq!(ctrl.state(), ControllerState::Stopped);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_stop_caller_observes_stopped_on_return() {
        let gate = ManualEvent::<()>::new();
        let ngap = MockNgap::new(true, gate.clone());
        let ctrl = Arc::new(CuCpController::new(CuCpConfig::default(), ngap.clone()));

        let c1 = ctrl.clone();
        let first = tokio::task::spawn_blocking(move || c1.stop());
        tokio::time::sleep(Duration::from_millis(50)).await;

        // A second caller joins the in-progress shutdown and must see the
        // final state the moment its stop() returns.
        let c2 = ctrl.clone();
        let second = tokio::task::spawn_blocking(move || {
            let result = c2.stop();
            (result, c2.state())
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!second.is_finished());

        gate.set(());
        let (result, observed) = second.await.unwrap();
        result.unwrap();
        assert_eq!(observed, ControllerState::Stopped);
        first.await.unwrap().unwrap();
        assert_eq!(ngap.stop_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_stop_is_idempotent() {
        let ngap = MockNgap::new(true, ManualEvent::completed(()));
        let ctrl = Arc::new(CuCpController::new(CuCpConfig::default(), ngap.clone()));
        ctrl.du_manager()
            .add(ConnectionRequest { name: "du-0".into() })
            .unwrap();

        let c = ctrl.clone();
        tokio::task::spawn_blocking(move || {
            c.stop().unwrap();
            c.stop().unwrap();
        })
        .await
        .unwrap();

        // Teardown notifier invoked exactly once despite the second stop().
        assert_eq!(ngap.stop_calls.load(Ordering::SeqCst), 1);
        assert_eq!(ctrl.state(), ControllerState::Stopped);
        assert_eq!(ctrl.du_manager().count(), 0);
    }
}
