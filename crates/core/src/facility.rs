//! Facilities and the fixed registry that holds them.
//!
//! The registry is built once at startup by a [`FacilitySeeder`](crate::seeding::FacilitySeeder)
//! and then handed to the [`AllocationService`](crate::AllocationService), which is the only
//! place it is mutated. Membership never changes after construction; only the ledgers inside do.

use crate::ledger::{LedgerSnapshot, ResourceLedger};
use crate::{TriageError, TriageResult};
use std::collections::BTreeSet;
use triage_types::{FacilityId, Needs, PatientId};

/// A hospital facility that patients can be admitted to.
#[derive(Debug, Clone)]
pub struct Facility {
    id: FacilityId,
    distance_km: u32,
    ledger: ResourceLedger,
}

impl Facility {
    /// Creates a facility with nothing reserved.
    pub fn new(id: FacilityId, distance_km: u32, capacity: Needs) -> Self {
        Self {
            id,
            distance_km,
            ledger: ResourceLedger::new(capacity),
        }
    }

    pub fn id(&self) -> FacilityId {
        self.id
    }

    /// Distance from the intake point. Only used for ordering.
    pub fn distance_km(&self) -> u32 {
        self.distance_km
    }

    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut ResourceLedger {
        &mut self.ledger
    }

    pub fn snapshot(&self) -> FacilitySnapshot {
        let LedgerSnapshot {
            available,
            admitted,
        } = self.ledger.snapshot();
        FacilitySnapshot {
            id: self.id,
            distance_km: self.distance_km,
            available,
            admitted,
        }
    }
}

/// Reporting view of one facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilitySnapshot {
    pub id: FacilityId,
    pub distance_km: u32,
    pub available: Needs,
    pub admitted: usize,
}

/// Ordered, fixed collection of facilities.
#[derive(Debug, Clone)]
pub struct FacilityRegistry {
    facilities: Vec<Facility>,
}

impl FacilityRegistry {
    /// Builds the registry, keeping the given order.
    ///
    /// # Errors
    ///
    /// Returns `TriageError::EmptyRegistry` for an empty list and
    /// `TriageError::DuplicateFacility` if two facilities share an id.
    pub fn new(facilities: Vec<Facility>) -> TriageResult<Self> {
        if facilities.is_empty() {
            return Err(TriageError::EmptyRegistry);
        }

        let mut seen = BTreeSet::new();
        for facility in &facilities {
            if !seen.insert(facility.id) {
                return Err(TriageError::DuplicateFacility(facility.id.value()));
            }
        }

        Ok(Self { facilities })
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Facility> {
        self.facilities.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Facility> {
        self.facilities.iter_mut()
    }

    pub fn get(&self, id: FacilityId) -> Option<&Facility> {
        self.facilities.iter().find(|f| f.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: FacilityId) -> Option<&mut Facility> {
        self.facilities.iter_mut().find(|f| f.id == id)
    }

    /// The facility currently admitting `patient_id`, if any.
    pub fn locate(&self, patient_id: &PatientId) -> Option<FacilityId> {
        self.facilities
            .iter()
            .find(|f| f.ledger.is_admitted(patient_id))
            .map(|f| f.id)
    }

    pub fn snapshot(&self) -> Vec<FacilitySnapshot> {
        self.facilities.iter().map(Facility::snapshot).collect()
    }
}
