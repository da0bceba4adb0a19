//! Command and response types exchanged with peer notifiers
//!
//! These are opaque structured values at this layer: only the fields the
//! procedures order on (cause, ids, release payload, location info) are
//! modelled; wire encoding is owned by the notifier implementations.

use bytes::Bytes;
use gnbcu_common::{GnbDuId, PduSessionId, SrbId, UeIndex};

use crate::cause::{E1apCause, F1apCause, NgapCause};

/// User location information reported towards the core network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserLocationInfo {
    /// NR cell identity the UE was last served by.
    pub nr_cell_id: u64,
    /// Tracking area code.
    pub tac: u32,
}

/// Inbound command ordering the release of a UE context.
#[derive(Debug, Clone)]
pub struct UeContextReleaseCommand {
    /// UE to release.
    pub ue_index: UeIndex,
    /// Release cause, in the core-network taxonomy.
    pub cause: NgapCause,
}

/// Aggregate result of a completed UE context release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UeContextReleaseComplete {
    /// Released UE.
    pub ue_index: UeIndex,
    /// PDU sessions that were active when the release started.
    pub pdu_session_res_list: Vec<PduSessionId>,
    /// Last known user location.
    pub user_location_info: UserLocationInfo,
}

/// Bearer release request towards the user-plane peer.
#[derive(Debug, Clone)]
pub struct BearerContextReleaseCommand {
    /// UE whose bearer contexts are released.
    pub ue_index: UeIndex,
    /// Cause, translated into the user-plane taxonomy.
    pub cause: E1apCause,
}

/// User-plane peer confirmation of a bearer context release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BearerContextReleaseComplete {
    /// UE whose bearer contexts were released.
    pub ue_index: UeIndex,
}

/// Context release request towards the access peer.
#[derive(Debug, Clone)]
pub struct F1apUeContextReleaseCommand {
    /// UE whose context is released.
    pub ue_index: UeIndex,
    /// Cause, translated into the access-peer taxonomy.
    pub cause: F1apCause,
    /// Opaque RRC release message delivered to the UE on the way out.
    pub rrc_release_pdu: Bytes,
    /// Signalling bearer carrying the release message.
    pub srb_id: SrbId,
}

/// Access peer response to a UE context release command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct F1apUeContextReleaseResponse {
    /// UE whose context was released.
    pub ue_index: UeIndex,
}

/// Release context read synchronously from the RRC layer before a release.
#[derive(Debug, Clone)]
pub struct RrcUeReleaseContext {
    /// Last known user location.
    pub user_location_info: UserLocationInfo,
    /// Opaque RRC release message for the UE.
    pub rrc_release_pdu: Bytes,
    /// Signalling bearer to carry the release message.
    pub srb_id: SrbId,
}

/// Request from a DU to attach to the CU-CP.
#[derive(Debug, Clone)]
pub struct DuSetupRequest {
    /// DU-reported identity.
    pub gnb_du_id: GnbDuId,
    /// DU-reported display name.
    pub gnb_du_name: Option<String>,
}
