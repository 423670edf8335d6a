//! Eligibility selection: the nearest facility that can meet a patient's needs.

use crate::facility::FacilityRegistry;
use triage_types::{FacilityId, Needs};

/// Picks the nearest facility whose ledger can satisfy `needs`.
///
/// Facilities at equal distance are ordered by id, lowest first, so the result does not depend
/// on registry order.
pub fn select_best(registry: &FacilityRegistry, needs: &Needs) -> Option<FacilityId> {
    let best = registry
        .iter()
        .filter(|facility| {
            let eligible = facility.ledger().can_satisfy(needs);
            if !eligible {
                tracing::debug!("facility {} cannot satisfy {:?}", facility.id(), needs);
            }
            eligible
        })
        .min_by_key(|facility| (facility.distance_km(), facility.id()))?;

    tracing::debug!(
        "facility {} selected (distance: {} km)",
        best.id(),
        best.distance_km()
    );
    Some(best.id())
}
