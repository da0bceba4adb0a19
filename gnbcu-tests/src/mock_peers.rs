//! Mock peer components for integration tests
//!
//! [`MockNgap`] stands in for the core-network session; [`MockUePeers`]
//! bundles the per-UE peer interfaces (E1AP, F1AP, RRC, user-plane state,
//! registry) behind a shared call log so tests can assert ordering across
//! interfaces.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use gnbcu_common::{PduSessionId, SrbId, UeIndex};
use gnbcu_cucp::async_task::ManualEvent;
use gnbcu_cucp::messages::{
    BearerContextReleaseCommand, BearerContextReleaseComplete, F1apUeContextReleaseCommand,
    F1apUeContextReleaseResponse, RrcUeReleaseContext, UserLocationInfo,
};
use gnbcu_cucp::notifiers::{
    CuCpNotifier, E1apBearerControlNotifier, F1apUeContextNotifier, NgapConnectionNotifier,
    RrcUeNotifier, UpResourceManager,
};

/// Mock core-network session.
pub struct MockNgap {
    connected: AtomicBool,
    stop_calls: AtomicUsize,
    stop_gate: ManualEvent<()>,
}

impl MockNgap {
    /// Creates a session whose `stop()` resolves immediately.
    pub fn connected() -> Arc<Self> {
        Arc::new(Self {
            connected: AtomicBool::new(true),
            stop_calls: AtomicUsize::new(0),
            stop_gate: ManualEvent::completed(()),
        })
    }

    /// Creates a session whose `stop()` blocks until `gate` is set.
    pub fn gated(gate: ManualEvent<()>) -> Arc<Self> {
        Arc::new(Self {
            connected: AtomicBool::new(true),
            stop_calls: AtomicUsize::new(0),
            stop_gate: gate,
        })
    }

    /// Flips the connected flag.
    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    /// Number of times `stop()` has been invoked.
    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NgapConnectionNotifier for MockNgap {
    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn stop(&self) {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        self.stop_gate.wait().await;
    }
}

/// Shared record of cross-interface calls, in invocation order.
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// Per-UE peer interfaces with a shared call log.
pub struct MockUePeers {
    log: CallLog,
    sessions: Vec<PduSessionId>,
    removal_gate: Option<ManualEvent<()>>,
}

impl MockUePeers {
    /// Creates peers reporting the given active PDU sessions.
    pub fn new(sessions: Vec<PduSessionId>) -> Arc<Self> {
        Arc::new(Self {
            log: Arc::new(Mutex::new(Vec::new())),
            sessions,
            removal_gate: None,
        })
    }

    /// Like [`MockUePeers::new`], but the F1AP release blocks until `gate`
    /// is set, keeping the routine in flight.
    pub fn gated(sessions: Vec<PduSessionId>, gate: ManualEvent<()>) -> Arc<Self> {
        Arc::new(Self {
            log: Arc::new(Mutex::new(Vec::new())),
            sessions,
            removal_gate: Some(gate),
        })
    }

    /// Snapshot of the call log.
    pub fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl E1apBearerControlNotifier for MockUePeers {
    async fn on_bearer_context_release_command(
        &self,
        command: BearerContextReleaseCommand,
    ) -> BearerContextReleaseComplete {
        self.log.lock().unwrap().push("bearer_release".into());
        BearerContextReleaseComplete {
            ue_index: command.ue_index,
        }
    }
}

#[async_trait]
impl F1apUeContextNotifier for MockUePeers {
    async fn on_ue_context_release_command(
        &self,
        command: F1apUeContextReleaseCommand,
    ) -> F1apUeContextReleaseResponse {
        if let Some(gate) = &self.removal_gate {
            gate.wait().await;
        }
        self.log.lock().unwrap().push("ue_context_release".into());
        F1apUeContextReleaseResponse {
            ue_index: command.ue_index,
        }
    }
}

impl RrcUeNotifier for MockUePeers {
    fn release_context(&self) -> RrcUeReleaseContext {
        RrcUeReleaseContext {
            user_location_info: UserLocationInfo {
                nr_cell_id: 0x19b0000,
                tac: 7,
            },
            rrc_release_pdu: Bytes::from_static(&[0x28, 0x00]),
            srb_id: SrbId(1),
        }
    }
}

impl UpResourceManager for MockUePeers {
    fn pdu_sessions(&self) -> Vec<PduSessionId> {
        self.sessions.clone()
    }
}

impl CuCpNotifier for MockUePeers {
    fn on_ue_removal_required(&self, ue_index: UeIndex) {
        self.log
            .lock()
            .unwrap()
            .push(format!("removal_required:{ue_index}"));
    }
}
