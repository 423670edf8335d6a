//! Constants used throughout the triage core crate.
//!
//! Seeding ranges describe the random startup pool. They are not part of
//! the allocation contract; the core accepts any non-negative capacity.

use std::ops::RangeInclusive;
use triage_types::ResourceKind;

/// Default number of facilities seeded at startup.
pub const DEFAULT_FACILITY_COUNT: usize = 10;

/// Default REST bind address.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:5000";

/// Distance range (km) for randomly seeded facilities.
pub const SEED_DISTANCE_KM: RangeInclusive<u32> = 1..=50;

/// Capacity range per resource type for randomly seeded facilities.
pub const SEED_CAPACITY: [(ResourceKind, RangeInclusive<u32>); 7] = [
    (ResourceKind::Bed, 35..=45),
    (ResourceKind::Specialist, 15..=25),
    (ResourceKind::GeneralPractitioner, 15..=25),
    (ResourceKind::Defibrillator, 3..=8),
    (ResourceKind::Scanner, 2..=5),
    (ResourceKind::Ventilator, 5..=10),
    (ResourceKind::BloodUnit, 50..=100),
];

/// Upper bound for blood units drawn for a level-1 baseline.
pub const MAX_BASELINE_BLOOD_UNITS: u32 = 3;

/// Free-text request labels and the resource each one resolves to.
pub const RESOURCE_LABELS: &[(&str, ResourceKind)] = &[
    ("Lit", ResourceKind::Bed),
    ("Respirateur", ResourceKind::Ventilator),
    ("Oxygène", ResourceKind::BloodUnit),
    ("Sang", ResourceKind::BloodUnit),
    ("Spécialiste", ResourceKind::Specialist),
    ("Généraliste", ResourceKind::GeneralPractitioner),
    ("Défibrillateur", ResourceKind::Defibrillator),
];
