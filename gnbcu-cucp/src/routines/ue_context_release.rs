//! UE context release routine
//!
//! Orderly teardown of a UE context across the peers that hold state for
//! it: first the user-plane bearers (skipped when the UE has no active PDU
//! session), then the access-peer context, then the owning registry. The
//! inbound core-network cause is translated into each peer's own taxonomy
//! at each hop.

use std::sync::Arc;

use tracing::debug;

use crate::cause::{ngap_to_e1ap_cause, ngap_to_f1ap_cause};
use crate::messages::{
    BearerContextReleaseCommand, F1apUeContextReleaseCommand, UeContextReleaseCommand,
    UeContextReleaseComplete,
};
use crate::notifiers::{
    CuCpNotifier, E1apBearerControlNotifier, F1apUeContextNotifier, RrcUeNotifier,
    UpResourceManager,
};

/// Releases a UE context across the user-plane peer, the access peer and
/// the owning registry.
///
/// The release cause is part of [`UeContextReleaseCommand`] and therefore
/// always present; the routine has no recoverable failure modes of its own.
pub struct UeContextReleaseRoutine {
    command: UeContextReleaseCommand,
    e1ap_ctrl_notifier: Arc<dyn E1apBearerControlNotifier>,
    f1ap_ue_ctxt_notifier: Arc<dyn F1apUeContextNotifier>,
    cu_cp_notifier: Arc<dyn CuCpNotifier>,
    rrc_ue_notifier: Arc<dyn RrcUeNotifier>,
    up_resource_mng: Arc<dyn UpResourceManager>,
}

impl UeContextReleaseRoutine {
    /// Routine name used in logs.
    pub const NAME: &'static str = "UE Context Release";

    /// Creates the routine for one release command.
    pub fn new(
        command: UeContextReleaseCommand,
        e1ap_ctrl_notifier: Arc<dyn E1apBearerControlNotifier>,
        f1ap_ue_ctxt_notifier: Arc<dyn F1apUeContextNotifier>,
        cu_cp_notifier: Arc<dyn CuCpNotifier>,
        rrc_ue_notifier: Arc<dyn RrcUeNotifier>,
        up_resource_mng: Arc<dyn UpResourceManager>,
    ) -> Self {
        Self {
            command,
            e1ap_ctrl_notifier,
            f1ap_ue_ctxt_notifier,
            cu_cp_notifier,
            rrc_ue_notifier,
            up_resource_mng,
        }
    }

    /// Runs the routine to completion.
    pub async fn run(self) -> UeContextReleaseComplete {
        let ue_index = self.command.ue_index;
        debug!(%ue_index, "\"{}\" initialized", Self::NAME);

        // Snapshot the state that goes into the release complete before any
        // peer is told to tear it down.
        let pdu_sessions = self.up_resource_mng.pdu_sessions();
        let release_context = self.rrc_ue_notifier.release_context();

        if !pdu_sessions.is_empty() {
            let command = BearerContextReleaseCommand {
                ue_index,
                cause: ngap_to_e1ap_cause(self.command.cause),
            };
            self.e1ap_ctrl_notifier
                .on_bearer_context_release_command(command)
                .await;
        }

        let command = F1apUeContextReleaseCommand {
            ue_index,
            cause: ngap_to_f1ap_cause(self.command.cause),
            rrc_release_pdu: release_context.rrc_release_pdu.clone(),
            srb_id: release_context.srb_id,
        };
        let _response = self
            .f1ap_ue_ctxt_notifier
            .on_ue_context_release_command(command)
            .await;

        self.cu_cp_notifier.on_ue_removal_required(ue_index);

        debug!(%ue_index, "\"{}\" finalized", Self::NAME);
        UeContextReleaseComplete {
            ue_index,
            pdu_session_res_list: pdu_sessions,
            user_location_info: release_context.user_location_info,
        }
    }
}
