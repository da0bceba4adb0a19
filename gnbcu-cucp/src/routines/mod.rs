//! Multi-step control-plane procedures
//!
//! Each routine is a linear async task launched through the per-key task
//! scheduler, so procedures for the same UE never interleave.

pub mod ue_context_release;

pub use ue_context_release::UeContextReleaseRoutine;
