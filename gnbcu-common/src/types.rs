//! Identifier types shared across the CU-CP
//!
//! Typed indices for the entities the CU-CP manages. Each index is a thin
//! newtype so that a DU index can never be passed where a UE index is
//! expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a UE context inside the CU-CP.
///
/// This is the entity key used to serialize procedures: at most one
/// procedure runs for a given `UeIndex` at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UeIndex(pub u32);

impl fmt::Display for UeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ue={}", self.0)
    }
}

/// Index of a connected DU (distributed unit) peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DuIndex(pub u32);

impl fmt::Display for DuIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "du={}", self.0)
    }
}

/// Index of a connected CU-UP (user plane) peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CuUpIndex(pub u32);

impl fmt::Display for CuUpIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cu-up={}", self.0)
    }
}

/// PDU session identifier (1..=256 on the wire, opaque here).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PduSessionId(pub u8);

impl fmt::Display for PduSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "psi={}", self.0)
    }
}

/// Signalling radio bearer identifier (SRB0..SRB3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SrbId(pub u8);

impl fmt::Display for SrbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "srb{}", self.0)
    }
}

/// gNB-DU identifier reported by a DU during setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GnbDuId(pub u64);

impl fmt::Display for GnbDuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gnb-du-id={}", self.0)
    }
}

/// Conversion between a typed connection index and its raw repository slot.
///
/// Implemented by the index types that the peer connection managers hand
/// out (`DuIndex`, `CuUpIndex`).
pub trait ConnectionIndex:
    Copy + Eq + std::hash::Hash + fmt::Display + Send + Sync + 'static
{
    /// Builds the typed index from a raw repository slot number.
    fn from_raw(raw: u32) -> Self;
    /// Returns the raw repository slot number.
    fn raw(self) -> u32;
}

impl ConnectionIndex for DuIndex {
    fn from_raw(raw: u32) -> Self {
        DuIndex(raw)
    }
    fn raw(self) -> u32 {
        self.0
    }
}

impl ConnectionIndex for CuUpIndex {
    fn from_raw(raw: u32) -> Self {
        CuUpIndex(raw)
    }
    fn raw(self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_display() {
        assert_eq!(UeIndex(7).to_string(), "ue=7");
        assert_eq!(DuIndex(1).to_string(), "du=1");
        assert_eq!(CuUpIndex(0).to_string(), "cu-up=0");
        assert_eq!(PduSessionId(5).to_string(), "psi=5");
        assert_eq!(SrbId(1).to_string(), "srb1");
    }

    #[test]
    fn test_connection_index_roundtrip() {
        assert_eq!(DuIndex::from_raw(3), DuIndex(3));
        assert_eq!(DuIndex(3).raw(), 3);
        assert_eq!(CuUpIndex::from_raw(9).raw(), 9);
    }
}
