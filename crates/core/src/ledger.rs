//! Per-facility resource accounting.
//!
//! A [`ResourceLedger`] owns one facility's capacity and the reservations committed against it.
//! Availability is only ever changed through [`ResourceLedger::reserve`] and
//! [`ResourceLedger::release`], so for every resource type
//! `available = capacity - sum(needs of admitted patients)` holds after each call.

use std::collections::BTreeMap;
use triage_types::{Needs, PatientId, TriageLevel};

/// What a facility remembers about an admitted patient.
///
/// The needs snapshot is kept verbatim so that release restores exactly what was reserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub level: TriageLevel,
    pub needs: Needs,
    /// Position in this ledger's admission order.
    pub sequence: u64,
}

/// Read-only view of a ledger for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub available: Needs,
    pub admitted: usize,
}

#[derive(Debug, Clone)]
pub struct ResourceLedger {
    capacity: Needs,
    available: Needs,
    admitted: BTreeMap<PatientId, Admission>,
    next_sequence: u64,
}

impl ResourceLedger {
    /// Creates an empty ledger where everything in `capacity` is available.
    pub fn new(capacity: Needs) -> Self {
        Self {
            available: capacity.clone(),
            capacity,
            admitted: BTreeMap::new(),
            next_sequence: 0,
        }
    }

    /// Whether every quantity in `needs` is currently available.
    ///
    /// Resource types the facility has no entry for count as zero available.
    pub fn can_satisfy(&self, needs: &Needs) -> bool {
        needs
            .iter()
            .all(|(kind, qty)| self.available.get(kind) >= qty)
    }

    /// Commits `needs` to `patient_id`.
    ///
    /// The caller must have checked [`can_satisfy`](Self::can_satisfy) for the same needs while
    /// holding the registry lock. The ledger does not validate again.
    pub fn reserve(&mut self, patient_id: PatientId, level: TriageLevel, needs: Needs) {
        debug_assert!(self.can_satisfy(&needs), "reserve without capacity");
        debug_assert!(!self.admitted.contains_key(&patient_id));

        for (kind, qty) in needs.iter() {
            let current = self.available.get(kind);
            if current < qty {
                tracing::error!(
                    "reservation for {} exceeds available {} ({} < {})",
                    patient_id,
                    kind,
                    current,
                    qty
                );
            }
            self.available.set(kind, current.saturating_sub(qty));
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.admitted.insert(
            patient_id,
            Admission {
                level,
                needs,
                sequence,
            },
        );
    }

    /// Returns the recorded needs of `patient_id` to the available pool.
    ///
    /// Releasing a patient who is not admitted is a no-op and returns `None`.
    pub fn release(&mut self, patient_id: &PatientId) -> Option<Admission> {
        let admission = self.admitted.remove(patient_id)?;
        for (kind, qty) in admission.needs.iter() {
            self.available.add(kind, qty);
        }
        Some(admission)
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            available: self.available.clone(),
            admitted: self.admitted.len(),
        }
    }

    pub fn capacity(&self) -> &Needs {
        &self.capacity
    }

    pub fn available(&self) -> &Needs {
        &self.available
    }

    pub fn is_admitted(&self, patient_id: &PatientId) -> bool {
        self.admitted.contains_key(patient_id)
    }

    pub fn admitted(&self) -> impl Iterator<Item = (&PatientId, &Admission)> {
        self.admitted.iter()
    }
}
