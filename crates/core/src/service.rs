//! Shared allocation service.
//!
//! [`AllocationService`] owns the facility registry for the lifetime of the process. It is
//! cheap to clone; all clones share one registry behind a mutex, and every operation holds that
//! lock from its first eligibility check to its last reservation, so two concurrent requests can
//! never both observe the same free capacity.

use crate::facility::{FacilityRegistry, FacilitySnapshot};
use crate::orchestrator::{self, AllocationOutcome};
use crate::patient::Patient;
use crate::{TriageError, TriageResult};
use std::sync::{Arc, Mutex, MutexGuard};
use triage_types::{FacilityId, PatientId};

#[derive(Clone, Debug)]
pub struct AllocationService {
    registry: Arc<Mutex<FacilityRegistry>>,
}

impl AllocationService {
    /// Takes ownership of a registry produced at startup.
    pub fn new(registry: FacilityRegistry) -> Self {
        Self {
            registry: Arc::new(Mutex::new(registry)),
        }
    }

    fn lock(&self) -> TriageResult<MutexGuard<'_, FacilityRegistry>> {
        self.registry
            .lock()
            .map_err(|_| TriageError::RegistryUnavailable)
    }

    /// Allocates a batch of patients.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - a patient id is repeated or already admitted,
    /// - the registry lock is poisoned.
    pub fn assign(&self, patients: Vec<Patient>) -> TriageResult<AllocationOutcome> {
        let mut registry = self.lock()?;
        orchestrator::assign(&mut registry, patients)
    }

    /// Allocates a single patient.
    pub fn assign_one(&self, patient: Patient) -> TriageResult<AllocationOutcome> {
        self.assign(vec![patient])
    }

    /// Allocates a batch and captures the facility state it left behind, under one lock.
    pub fn assign_reporting(
        &self,
        patients: Vec<Patient>,
    ) -> TriageResult<(AllocationOutcome, Vec<FacilitySnapshot>)> {
        let mut registry = self.lock()?;
        let outcome = orchestrator::assign(&mut registry, patients)?;
        Ok((outcome, registry.snapshot()))
    }

    /// Current state of every facility, in registry order.
    pub fn snapshot(&self) -> TriageResult<Vec<FacilitySnapshot>> {
        Ok(self.lock()?.snapshot())
    }

    /// Releases an admitted patient, returning the facility they left.
    ///
    /// Discharging someone who is not admitted is not an error and returns `None`.
    pub fn discharge(&self, patient_id: &PatientId) -> TriageResult<Option<FacilityId>> {
        let mut registry = self.lock()?;
        let Some(facility_id) = registry.locate(patient_id) else {
            tracing::debug!("discharge of {} ignored: not admitted", patient_id);
            return Ok(None);
        };

        if let Some(facility) = registry.get_mut(facility_id) {
            facility.ledger_mut().release(patient_id);
            tracing::info!("discharged {} from facility {}", patient_id, facility_id);
        }
        Ok(Some(facility_id))
    }
}
