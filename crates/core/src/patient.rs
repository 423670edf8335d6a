//! Arriving patients.

use triage_types::{Needs, PatientId, TriageLevel};

/// A patient awaiting allocation.
///
/// Created per incoming request and discarded once the response is produced; only the
/// [`Admission`](crate::ledger::Admission) recorded by a facility outlives the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    pub id: PatientId,
    pub level: TriageLevel,
    pub needs: Needs,
}

impl Patient {
    pub fn new(id: PatientId, level: TriageLevel, needs: Needs) -> Self {
        Self { id, level, needs }
    }
}
