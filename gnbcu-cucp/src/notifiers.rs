//! Notifier interfaces towards external collaborators
//!
//! The orchestration core reaches every peer through these capability
//! traits. Wire encoding, transport and timeouts are owned by the
//! implementations; the core only relies on "an awaited response either
//! arrives or the await never resolves".

use async_trait::async_trait;
use gnbcu_common::{PduSessionId, UeIndex};

use crate::messages::{
    BearerContextReleaseCommand, BearerContextReleaseComplete, F1apUeContextReleaseCommand,
    F1apUeContextReleaseResponse, RrcUeReleaseContext,
};

/// Core-network (NGAP) session.
#[async_trait]
pub trait NgapConnectionNotifier: Send + Sync {
    /// Returns true while the core-network session is established.
    fn is_connected(&self) -> bool;

    /// Tears the session down; resolves once teardown has completed.
    async fn stop(&self);
}

/// Control interface of the user-plane peer (E1AP).
#[async_trait]
pub trait E1apBearerControlNotifier: Send + Sync {
    /// Orders release of a UE's bearer contexts and awaits confirmation.
    async fn on_bearer_context_release_command(
        &self,
        command: BearerContextReleaseCommand,
    ) -> BearerContextReleaseComplete;
}

/// UE-context interface of the access peer (F1AP).
#[async_trait]
pub trait F1apUeContextNotifier: Send + Sync {
    /// Orders release of a UE context and awaits the peer's response.
    async fn on_ue_context_release_command(
        &self,
        command: F1apUeContextReleaseCommand,
    ) -> F1apUeContextReleaseResponse;
}

/// Synchronous accessor into the RRC layer for a single UE.
pub trait RrcUeNotifier: Send + Sync {
    /// Returns the release context (location, release PDU, SRB id).
    fn release_context(&self) -> RrcUeReleaseContext;
}

/// Synchronous accessor into a UE's user-plane resource state.
pub trait UpResourceManager: Send + Sync {
    /// Returns the identifiers of the UE's active PDU sessions.
    fn pdu_sessions(&self) -> Vec<PduSessionId>;
}

/// One-way notifications towards the owning CU-CP registry.
pub trait CuCpNotifier: Send + Sync {
    /// Signals that the UE's entry should be removed. Fire-and-forget.
    fn on_ue_removal_required(&self, ue_index: UeIndex);
}
