//! Release/failure cause taxonomies and inter-peer translation
//!
//! The core network (NGAP), the user plane peer (E1AP) and the access peer
//! (F1AP) each carry their own cause taxonomy. A procedure that fans out to
//! several peers translates the inbound NGAP cause independently at each
//! hop. The translations are total, deterministic and side-effect free:
//! exhaustive matches, so adding a cause variant without extending the
//! mappings fails to compile.

use std::fmt;

// ============================================================================
// NGAP (core-network facing) causes
// ============================================================================

/// Radio-network group of NGAP causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NgapCauseRadioNetwork {
    /// No further detail available.
    Unspecified,
    /// Release initiated by the NG-RAN itself.
    ReleaseDueToNgranGeneratedReason,
    /// UE stopped exchanging traffic.
    UserInactivity,
    /// Radio connection with the UE was lost.
    RadioConnectionWithUeLost,
    /// Handover was cancelled.
    HandoverCancelled,
}

/// Transport group of NGAP causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NgapCauseTransport {
    /// Transport resource is unavailable.
    TransportResourceUnavailable,
    /// No further detail available.
    Unspecified,
}

/// NAS group of NGAP causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NgapCauseNas {
    /// Normal NAS-level release.
    NormalRelease,
    /// NAS authentication failed.
    AuthenticationFailure,
    /// UE deregistered.
    Deregister,
    /// No further detail available.
    Unspecified,
}

/// Protocol group of NGAP causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NgapCauseProtocol {
    /// Transfer syntax error in a received message.
    TransferSyntaxError,
    /// Semantic error in a received message.
    SemanticError,
    /// Message not compatible with receiver state.
    MessageNotCompatibleWithReceiverState,
    /// No further detail available.
    Unspecified,
}

/// Miscellaneous group of NGAP causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NgapCauseMisc {
    /// Control processing overload.
    ControlProcessingOverload,
    /// Hardware failure.
    HardwareFailure,
    /// Operations and maintenance intervention.
    OmIntervention,
    /// No further detail available.
    Unspecified,
}

/// Core-network facing cause taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NgapCause {
    /// Radio network layer causes.
    RadioNetwork(NgapCauseRadioNetwork),
    /// Transport layer causes.
    Transport(NgapCauseTransport),
    /// NAS layer causes.
    Nas(NgapCauseNas),
    /// Protocol causes.
    Protocol(NgapCauseProtocol),
    /// Miscellaneous causes.
    Misc(NgapCauseMisc),
}

impl fmt::Display for NgapCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NgapCause::RadioNetwork(c) => write!(f, "radio-network/{c:?}"),
            NgapCause::Transport(c) => write!(f, "transport/{c:?}"),
            NgapCause::Nas(c) => write!(f, "nas/{c:?}"),
            NgapCause::Protocol(c) => write!(f, "protocol/{c:?}"),
            NgapCause::Misc(c) => write!(f, "misc/{c:?}"),
        }
    }
}

// ============================================================================
// E1AP (user-plane peer) causes
// ============================================================================

/// Radio-network group of E1AP causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum E1apCauseRadioNetwork {
    /// No further detail available.
    Unspecified,
    /// Normal bearer release.
    NormalRelease,
    /// UE stopped exchanging traffic.
    UeInactivity,
    /// Release requested by the control plane.
    ReleaseDueToPreemption,
}

/// Transport group of E1AP causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum E1apCauseTransport {
    /// Transport resource is unavailable.
    TransportResourceUnavailable,
    /// No further detail available.
    Unspecified,
}

/// Protocol group of E1AP causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum E1apCauseProtocol {
    /// Transfer syntax error in a received message.
    TransferSyntaxError,
    /// Semantic error in a received message.
    SemanticError,
    /// Message not compatible with receiver state.
    MessageNotCompatibleWithReceiverState,
    /// No further detail available.
    Unspecified,
}

/// Miscellaneous group of E1AP causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum E1apCauseMisc {
    /// Control processing overload.
    ControlProcessingOverload,
    /// Hardware failure.
    HardwareFailure,
    /// Operations and maintenance intervention.
    OmIntervention,
    /// No further detail available.
    Unspecified,
}

/// User-plane peer cause taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum E1apCause {
    /// Radio network layer causes.
    RadioNetwork(E1apCauseRadioNetwork),
    /// Transport layer causes.
    Transport(E1apCauseTransport),
    /// Protocol causes.
    Protocol(E1apCauseProtocol),
    /// Miscellaneous causes.
    Misc(E1apCauseMisc),
}

// ============================================================================
// F1AP (access peer) causes
// ============================================================================

/// Radio-network group of F1AP causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum F1apCauseRadioNetwork {
    /// No further detail available.
    Unspecified,
    /// Normal context release.
    NormalRelease,
    /// Radio link with the UE was lost.
    RlFailureOthers,
    /// Release requested by a higher layer.
    InteractionWithOtherProcedure,
}

/// Transport group of F1AP causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum F1apCauseTransport {
    /// Transport resource is unavailable.
    TransportResourceUnavailable,
    /// No further detail available.
    Unspecified,
}

/// Protocol group of F1AP causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum F1apCauseProtocol {
    /// Transfer syntax error in a received message.
    TransferSyntaxError,
    /// Semantic error in a received message.
    SemanticError,
    /// Message not compatible with receiver state.
    MessageNotCompatibleWithReceiverState,
    /// No further detail available.
    Unspecified,
}

/// Miscellaneous group of F1AP causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum F1apCauseMisc {
    /// Control processing overload.
    ControlProcessingOverload,
    /// Hardware failure.
    HardwareFailure,
    /// Operations and maintenance intervention.
    OmIntervention,
    /// No further detail available.
    Unspecified,
}

/// Access peer cause taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum F1apCause {
    /// Radio network layer causes.
    RadioNetwork(F1apCauseRadioNetwork),
    /// Transport layer causes.
    Transport(F1apCauseTransport),
    /// Protocol causes.
    Protocol(F1apCauseProtocol),
    /// Miscellaneous causes.
    Misc(F1apCauseMisc),
}

// ============================================================================
// Translations
// ============================================================================

/// Translates a core-network cause into the user-plane peer taxonomy.
pub fn ngap_to_e1ap_cause(cause: NgapCause) -> E1apCause {
    match cause {
        NgapCause::RadioNetwork(c) => E1apCause::RadioNetwork(match c {
            NgapCauseRadioNetwork::Unspecified => E1apCauseRadioNetwork::Unspecified,
            NgapCauseRadioNetwork::ReleaseDueToNgranGeneratedReason => {
                E1apCauseRadioNetwork::NormalRelease
            }
            NgapCauseRadioNetwork::UserInactivity => E1apCauseRadioNetwork::UeInactivity,
            NgapCauseRadioNetwork::RadioConnectionWithUeLost => {
                E1apCauseRadioNetwork::Unspecified
            }
            NgapCauseRadioNetwork::HandoverCancelled => E1apCauseRadioNetwork::NormalRelease,
        }),
        // NAS-level causes have no E1AP equivalent group; releases map to a
        // normal bearer release, everything else to unspecified.
        NgapCause::Nas(c) => E1apCause::RadioNetwork(match c {
            NgapCauseNas::NormalRelease | NgapCauseNas::Deregister => {
                E1apCauseRadioNetwork::NormalRelease
            }
            NgapCauseNas::AuthenticationFailure | NgapCauseNas::Unspecified => {
                E1apCauseRadioNetwork::Unspecified
            }
        }),
        NgapCause::Transport(c) => E1apCause::Transport(match c {
            NgapCauseTransport::TransportResourceUnavailable => {
                E1apCauseTransport::TransportResourceUnavailable
            }
            NgapCauseTransport::Unspecified => E1apCauseTransport::Unspecified,
        }),
        NgapCause::Protocol(c) => E1apCause::Protocol(match c {
            NgapCauseProtocol::TransferSyntaxError => E1apCauseProtocol::TransferSyntaxError,
            NgapCauseProtocol::SemanticError => E1apCauseProtocol::SemanticError,
            NgapCauseProtocol::MessageNotCompatibleWithReceiverState => {
                E1apCauseProtocol::MessageNotCompatibleWithReceiverState
            }
            NgapCauseProtocol::Unspecified => E1apCauseProtocol::Unspecified,
        }),
        NgapCause::Misc(c) => E1apCause::Misc(match c {
            NgapCauseMisc::ControlProcessingOverload => E1apCauseMisc::ControlProcessingOverload,
            NgapCauseMisc::HardwareFailure => E1apCauseMisc::HardwareFailure,
            NgapCauseMisc::OmIntervention => E1apCauseMisc::OmIntervention,
            NgapCauseMisc::Unspecified => E1apCauseMisc::Unspecified,
        }),
    }
}

/// Translates a core-network cause into the access peer taxonomy.
pub fn ngap_to_f1ap_cause(cause: NgapCause) -> F1apCause {
    match cause {
        NgapCause::RadioNetwork(c) => F1apCause::RadioNetwork(match c {
            NgapCauseRadioNetwork::Unspecified => F1apCauseRadioNetwork::Unspecified,
            NgapCauseRadioNetwork::ReleaseDueToNgranGeneratedReason => {
                F1apCauseRadioNetwork::NormalRelease
            }
            NgapCauseRadioNetwork::UserInactivity => F1apCauseRadioNetwork::NormalRelease,
            NgapCauseRadioNetwork::RadioConnectionWithUeLost => {
                F1apCauseRadioNetwork::RlFailureOthers
            }
            NgapCauseRadioNetwork::HandoverCancelled => {
                F1apCauseRadioNetwork::InteractionWithOtherProcedure
            }
        }),
        NgapCause::Nas(c) => F1apCause::RadioNetwork(match c {
            NgapCauseNas::NormalRelease | NgapCauseNas::Deregister => {
                F1apCauseRadioNetwork::NormalRelease
            }
            NgapCauseNas::AuthenticationFailure | NgapCauseNas::Unspecified => {
                F1apCauseRadioNetwork::Unspecified
            }
        }),
        NgapCause::Transport(c) => F1apCause::Transport(match c {
            NgapCauseTransport::TransportResourceUnavailable => {
                F1apCauseTransport::TransportResourceUnavailable
            }
            NgapCauseTransport::Unspecified => F1apCauseTransport::Unspecified,
        }),
        NgapCause::Protocol(c) => F1apCause::Protocol(match c {
            NgapCauseProtocol::TransferSyntaxError => F1apCauseProtocol::TransferSyntaxError,
            NgapCauseProtocol::SemanticError => F1apCauseProtocol::SemanticError,
            NgapCauseProtocol::MessageNotCompatibleWithReceiverState => {
                F1apCauseProtocol::MessageNotCompatibleWithReceiverState
            }
            NgapCauseProtocol::Unspecified => F1apCauseProtocol::Unspecified,
        }),
        NgapCause::Misc(c) => F1apCause::Misc(match c {
            NgapCauseMisc::ControlProcessingOverload => F1apCauseMisc::ControlProcessingOverload,
            NgapCauseMisc::HardwareFailure => F1apCauseMisc::HardwareFailure,
            NgapCauseMisc::OmIntervention => F1apCauseMisc::OmIntervention,
            NgapCauseMisc::Unspecified => F1apCauseMisc::Unspecified,
        }),
    }
}
