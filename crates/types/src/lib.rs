//! # Triage Types
//!
//! Validated domain primitives shared by the allocation core, the REST API and the CLI.
//!
//! Every type here guarantees its invariant once constructed, so code further in never has to
//! re-check a triage level range or an empty patient identifier.

mod ids;
mod level;
mod needs;

pub use ids::{FacilityId, PatientId};
pub use level::TriageLevel;
pub use needs::{Needs, ResourceKind};

/// Errors that can occur when creating validated domain types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypesError {
    /// The triage level was outside 1..=5
    #[error("triage level must be an integer between 1 and 5, got {0}")]
    InvalidTriageLevel(i64),
    /// The patient identifier was empty or contained only whitespace
    #[error("patient id cannot be empty")]
    EmptyPatientId,
}
