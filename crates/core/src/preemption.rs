//! Preemptive reallocation.
//!
//! When no facility can take a severe patient, one less urgent admitted patient per facility is
//! displaced until the arrival fits. This is a single best-effort pass: a displaced patient is
//! not re-placed anywhere, even when the arrival still does not fit the facility they were
//! released from. Callers report such patients as unassigned.

use crate::facility::FacilityRegistry;
use crate::patient::Patient;
use triage_types::{FacilityId, Needs, PatientId};

/// Record of one displacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reallocation {
    pub released_patient_id: PatientId,
    pub facility_id: FacilityId,
    pub incoming_patient_id: PatientId,
    pub freed_needs: Needs,
}

/// Result of one preemption attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreemptionOutcome {
    /// Facility the incoming patient was admitted to, if the attempt succeeded.
    pub placed: Option<FacilityId>,
    /// Every displacement performed, successful or not, in scan order.
    pub events: Vec<Reallocation>,
}

/// Displaces less urgent patients to make room for `patient`.
///
/// Facilities are scanned in registry order. In each, the admitted patient with the greatest
/// (least severe) level above the arrival's is released; among equals the earliest admission
/// goes first. The arrival is reserved on the first facility that can then satisfy it.
///
/// Levels above 3 never preempt and get an empty outcome.
pub fn preempt(registry: &mut FacilityRegistry, patient: &Patient) -> PreemptionOutcome {
    let mut outcome = PreemptionOutcome::default();
    if !patient.level.is_preemptive() {
        return outcome;
    }

    for facility in registry.iter_mut() {
        let facility_id = facility.id();
        let candidate = facility
            .ledger()
            .admitted()
            .filter(|(_, admission)| admission.level.is_less_severe_than(patient.level))
            .max_by(|(_, a), (_, b)| {
                a.level
                    .cmp(&b.level)
                    .then_with(|| b.sequence.cmp(&a.sequence))
            })
            .map(|(id, _)| id.clone());

        let Some(candidate) = candidate else {
            continue;
        };

        let ledger = facility.ledger_mut();
        let Some(released) = ledger.release(&candidate) else {
            continue;
        };

        tracing::info!(
            "released {} ({}) from facility {} for {} ({})",
            candidate,
            released.level,
            facility_id,
            patient.id,
            patient.level
        );
        outcome.events.push(Reallocation {
            released_patient_id: candidate,
            facility_id,
            incoming_patient_id: patient.id.clone(),
            freed_needs: released.needs,
        });

        if ledger.can_satisfy(&patient.needs) {
            ledger.reserve(patient.id.clone(), patient.level, patient.needs.clone());
            outcome.placed = Some(facility_id);
            break;
        }

        tracing::debug!(
            "facility {} still cannot satisfy {} after displacement",
            facility_id,
            patient.id
        );
    }

    outcome
}
