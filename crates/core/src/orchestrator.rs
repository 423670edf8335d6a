//! Allocation of a batch of arriving patients, most urgent first.

use crate::facility::FacilityRegistry;
use crate::patient::Patient;
use crate::preemption::{preempt, Reallocation};
use crate::selector::select_best;
use crate::{TriageError, TriageResult};
use std::collections::{BTreeMap, BTreeSet};
use triage_types::{FacilityId, PatientId};

/// Everything a single allocation pass produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllocationOutcome {
    /// Every current admission across the registry after the pass.
    pub allocation: BTreeMap<PatientId, FacilityId>,
    /// Displacements performed during the pass, in order.
    pub reallocations: Vec<Reallocation>,
    /// Batch patients left without a facility (input order), followed by displaced patients
    /// that are no longer admitted anywhere (event order).
    pub unassigned: Vec<PatientId>,
}

impl AllocationOutcome {
    /// Facility the given patient ended up in, if any.
    pub fn facility_of(&self, patient_id: &PatientId) -> Option<FacilityId> {
        self.allocation.get(patient_id).copied()
    }
}

/// Rejects batches that would admit the same patient twice.
fn check_unique(registry: &FacilityRegistry, patients: &[Patient]) -> TriageResult<()> {
    let mut seen = BTreeSet::new();
    for patient in patients {
        if !seen.insert(&patient.id) || registry.locate(&patient.id).is_some() {
            return Err(TriageError::DuplicatePatient(patient.id.to_string()));
        }
    }
    Ok(())
}

/// Allocates `patients` against `registry`.
///
/// Patients are processed by ascending level; equal levels keep their input order. Each patient
/// goes to the nearest eligible facility, or through preemption when none is eligible and the
/// level allows it. Anyone left over is reported as unassigned rather than as an error.
///
/// # Errors
///
/// Returns `TriageError::DuplicatePatient` before touching the registry if an id repeats within
/// the batch or is already admitted.
pub fn assign(
    registry: &mut FacilityRegistry,
    patients: Vec<Patient>,
) -> TriageResult<AllocationOutcome> {
    check_unique(registry, &patients)?;

    let input_order: Vec<PatientId> = patients.iter().map(|p| p.id.clone()).collect();
    let mut ordered = patients;
    // `sort_by_key` is stable, which keeps input order among equal levels.
    ordered.sort_by_key(|p| p.level);

    let mut reallocations = Vec::new();

    for patient in &ordered {
        if let Some(facility_id) = select_best(registry, &patient.needs) {
            if let Some(facility) = registry.get_mut(facility_id) {
                facility.ledger_mut().reserve(
                    patient.id.clone(),
                    patient.level,
                    patient.needs.clone(),
                );
                tracing::info!(
                    "assigned {} ({}) to facility {}",
                    patient.id,
                    patient.level,
                    facility_id
                );
            }
            continue;
        }

        if !patient.level.is_preemptive() {
            tracing::warn!(
                "no facility can take {} ({}) and its level does not allow preemption",
                patient.id,
                patient.level
            );
            continue;
        }

        let outcome = preempt(registry, patient);
        match outcome.placed {
            Some(facility_id) => tracing::info!(
                "assigned {} ({}) to facility {} after preemption",
                patient.id,
                patient.level,
                facility_id
            ),
            None => tracing::warn!(
                "preemption could not place {} ({})",
                patient.id,
                patient.level
            ),
        }
        reallocations.extend(outcome.events);
    }

    let allocation: BTreeMap<PatientId, FacilityId> = registry
        .iter()
        .flat_map(|facility| {
            facility
                .ledger()
                .admitted()
                .map(move |(id, _)| (id.clone(), facility.id()))
        })
        .collect();

    let mut unassigned: Vec<PatientId> = input_order
        .into_iter()
        .filter(|id| !allocation.contains_key(id))
        .collect();
    for event in &reallocations {
        let id = &event.released_patient_id;
        if !allocation.contains_key(id) && !unassigned.contains(id) {
            unassigned.push(id.clone());
        }
    }

    Ok(AllocationOutcome {
        allocation,
        reallocations,
        unassigned,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facility::Facility;
    use triage_types::{Needs, ResourceKind, TriageLevel};

    fn beds(n: u32) -> Needs {
        Needs::new().with(ResourceKind::Bed, n)
    }

    fn patient(id: &str, level: i64, needs: Needs) -> Patient {
        Patient::new(
            PatientId::new(id).unwrap(),
            TriageLevel::new(level).unwrap(),
            needs,
        )
    }

    fn pid(s: &str) -> PatientId {
        PatientId::new(s).unwrap()
    }

    fn assert_capacity_invariant(registry: &FacilityRegistry) {
        for facility in registry.iter() {
            let ledger = facility.ledger();
            for kind in ResourceKind::ALL {
                let committed: u32 = ledger.admitted().map(|(_, a)| a.needs.get(kind)).sum();
                assert_eq!(
                    ledger.available().get(kind) + committed,
                    ledger.capacity().get(kind)
                );
            }
        }
    }

    #[test]
    fn most_urgent_patient_is_served_first() {
        let mut registry =
            FacilityRegistry::new(vec![Facility::new(FacilityId(0), 3, beds(1))]).unwrap();

        let outcome = assign(
            &mut registry,
            vec![patient("low", 4, beds(1)), patient("high", 2, beds(1))],
        )
        .unwrap();

        assert_eq!(outcome.facility_of(&pid("high")), Some(FacilityId(0)));
        assert_eq!(outcome.unassigned, vec![pid("low")]);
        assert!(outcome.reallocations.is_empty());
    }

    #[test]
    fn equal_levels_keep_input_order() {
        let mut registry =
            FacilityRegistry::new(vec![Facility::new(FacilityId(0), 3, beds(1))]).unwrap();

        let outcome = assign(
            &mut registry,
            vec![patient("second", 3, beds(1)), patient("first", 3, beds(1))],
        )
        .unwrap();

        // "second" appears first in the input, so it wins the slot.
        assert_eq!(outcome.facility_of(&pid("second")), Some(FacilityId(0)));
        assert_eq!(outcome.unassigned, vec![pid("first")]);
    }

    #[test]
    fn preemption_scenario_reports_displaced_patient() {
        let mut registry = FacilityRegistry::new(vec![
            Facility::new(FacilityId(0), 4, beds(1)),
            Facility::new(FacilityId(1), 2, Needs::new()),
        ])
        .unwrap();
        assign(&mut registry, vec![patient("A", 4, beds(1))]).unwrap();

        let outcome = assign(&mut registry, vec![patient("B", 1, beds(1))]).unwrap();

        assert_eq!(outcome.facility_of(&pid("B")), Some(FacilityId(0)));
        assert_eq!(outcome.facility_of(&pid("A")), None);
        assert_eq!(
            outcome.reallocations,
            vec![Reallocation {
                released_patient_id: pid("A"),
                facility_id: FacilityId(0),
                incoming_patient_id: pid("B"),
                freed_needs: beds(1),
            }]
        );
        assert_eq!(outcome.unassigned, vec![pid("A")]);
        assert_eq!(
            registry
                .get(FacilityId(0))
                .unwrap()
                .ledger()
                .available()
                .get(ResourceKind::Bed),
            0
        );
        assert_capacity_invariant(&registry);
    }

    #[test]
    fn low_urgency_never_preempts() {
        let mut registry =
            FacilityRegistry::new(vec![Facility::new(FacilityId(0), 4, beds(1))]).unwrap();
        assign(&mut registry, vec![patient("A", 5, beds(1))]).unwrap();

        let outcome = assign(&mut registry, vec![patient("B", 5, beds(1))]).unwrap();

        assert!(outcome.reallocations.is_empty());
        assert_eq!(outcome.unassigned, vec![pid("B")]);
        assert_eq!(outcome.facility_of(&pid("A")), Some(FacilityId(0)));
    }

    #[test]
    fn allocation_includes_untouched_admissions() {
        let mut registry = FacilityRegistry::new(vec![
            Facility::new(FacilityId(0), 4, beds(2)),
            Facility::new(FacilityId(1), 8, beds(2)),
        ])
        .unwrap();
        assign(&mut registry, vec![patient("A", 3, beds(2))]).unwrap();

        let outcome = assign(&mut registry, vec![patient("B", 3, beds(1))]).unwrap();

        assert_eq!(outcome.facility_of(&pid("A")), Some(FacilityId(0)));
        assert_eq!(outcome.facility_of(&pid("B")), Some(FacilityId(1)));
        assert!(outcome.unassigned.is_empty());
    }

    #[test]
    fn patient_with_no_needs_goes_to_nearest_facility() {
        let mut registry = FacilityRegistry::new(vec![
            Facility::new(FacilityId(0), 9, beds(1)),
            Facility::new(FacilityId(1), 1, Needs::new()),
        ])
        .unwrap();

        let outcome = assign(&mut registry, vec![patient("A", 5, Needs::new())]).unwrap();

        assert_eq!(outcome.facility_of(&pid("A")), Some(FacilityId(1)));
    }

    #[test]
    fn duplicate_ids_are_rejected_without_mutation() {
        let mut registry =
            FacilityRegistry::new(vec![Facility::new(FacilityId(0), 4, beds(3))]).unwrap();

        let err = assign(
            &mut registry,
            vec![patient("A", 3, beds(1)), patient("A", 2, beds(1))],
        )
        .expect_err("expected duplicate failure");
        assert!(matches!(err, TriageError::DuplicatePatient(ref id) if id == "A"));
        assert_eq!(registry.get(FacilityId(0)).unwrap().ledger().snapshot().admitted, 0);

        assign(&mut registry, vec![patient("A", 3, beds(1))]).unwrap();
        let err = assign(&mut registry, vec![patient("A", 1, beds(1))])
            .expect_err("expected already-admitted failure");
        assert!(matches!(err, TriageError::DuplicatePatient(_)));
    }

    #[test]
    fn invariant_holds_across_a_mixed_batch() {
        let mut registry = FacilityRegistry::new(vec![
            Facility::new(FacilityId(0), 5, beds(2).with(ResourceKind::Specialist, 1)),
            Facility::new(FacilityId(1), 2, beds(1).with(ResourceKind::Scanner, 1)),
        ])
        .unwrap();
        let batch = vec![
            patient("p1", 5, beds(1)),
            patient("p2", 4, beds(1).with(ResourceKind::Scanner, 1)),
            patient("p3", 1, beds(1).with(ResourceKind::Specialist, 1)),
            patient("p4", 2, beds(1)),
            patient("p5", 3, beds(1).with(ResourceKind::Specialist, 1)),
        ];

        let outcome = assign(&mut registry, batch).unwrap();

        assert_capacity_invariant(&registry);
        for id in &outcome.unassigned {
            assert!(registry.locate(id).is_none());
        }
        for (id, facility) in &outcome.allocation {
            assert_eq!(registry.locate(id), Some(*facility));
        }
    }
}
