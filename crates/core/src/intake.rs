//! Turning an intake request into a [`Patient`].
//!
//! Needs are the level-derived baseline plus one unit for every recognised free-text label in the
//! request. The label table is fixed at compile time and validated once when the service starts;
//! labels outside it are reported back to the caller instead of being silently dropped.

use crate::constants::{MAX_BASELINE_BLOOD_UNITS, RESOURCE_LABELS};
use crate::patient::Patient;
use crate::{TriageError, TriageResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use triage_types::{Needs, PatientId, ResourceKind, TriageLevel};

/// Lookup from request labels to resource types.
#[derive(Debug, Clone)]
pub struct ResourceLabels {
    table: BTreeMap<String, ResourceKind>,
}

impl ResourceLabels {
    /// The standard label table.
    pub fn standard() -> TriageResult<Self> {
        Self::from_table(RESOURCE_LABELS)
    }

    /// Builds a table, rejecting labels that appear twice.
    pub fn from_table(entries: &[(&str, ResourceKind)]) -> TriageResult<Self> {
        let mut table = BTreeMap::new();
        for (label, kind) in entries {
            let label = label.trim();
            if label.is_empty() {
                return Err(TriageError::InvalidInput(
                    "resource label cannot be empty".into(),
                ));
            }
            if table.insert(label.to_string(), *kind).is_some() {
                return Err(TriageError::DuplicateResourceLabel(label.to_string()));
            }
        }
        Ok(Self { table })
    }

    pub fn resolve(&self, label: &str) -> Option<ResourceKind> {
        self.table.get(label.trim()).copied()
    }

    pub fn labels(&self) -> impl Iterator<Item = (&str, ResourceKind)> {
        self.table.iter().map(|(l, k)| (l.as_str(), *k))
    }
}

/// Source of level-derived baseline needs.
pub trait NeedsGenerator: Send {
    fn baseline(&mut self, level: TriageLevel) -> Needs;
}

/// Baseline needs with the optional items drawn at random.
///
/// Mandatory items per level:
/// - 1: bed and specialist, plus optional defibrillator, ventilator and up to 3 blood units
/// - 2: bed and specialist, plus optional scanner and ventilator
/// - 3: bed, plus optional scanner, specialist and general practitioner
/// - 4: optional bed, scanner and general practitioner only
/// - 5: half the time nothing, otherwise an optional bed
#[derive(Debug)]
pub struct RandomNeeds<R: Rng> {
    rng: R,
}

impl<R: Rng> RandomNeeds<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn coin(&mut self) -> u32 {
        self.rng.gen_range(0..=1)
    }
}

impl RandomNeeds<StdRng> {
    /// Reproducible generator for tests and seeded runs.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng + Send> NeedsGenerator for RandomNeeds<R> {
    fn baseline(&mut self, level: TriageLevel) -> Needs {
        use ResourceKind::*;

        match level.value() {
            1 => Needs::new()
                .with(Bed, 1)
                .with(Specialist, 1)
                .with(Defibrillator, self.coin())
                .with(Ventilator, self.coin())
                .with(BloodUnit, self.rng.gen_range(0..=MAX_BASELINE_BLOOD_UNITS)),
            2 => Needs::new()
                .with(Bed, 1)
                .with(Specialist, 1)
                .with(Scanner, self.coin())
                .with(Ventilator, self.coin()),
            3 => Needs::new()
                .with(Bed, 1)
                .with(Scanner, self.coin())
                .with(Specialist, self.coin())
                .with(GeneralPractitioner, self.coin()),
            4 => Needs::new()
                .with(Bed, self.coin())
                .with(Scanner, self.coin())
                .with(GeneralPractitioner, self.coin()),
            _ => {
                if self.rng.gen_bool(0.5) {
                    Needs::new().with(Bed, self.coin())
                } else {
                    Needs::new()
                }
            }
        }
    }
}

/// Only the mandatory items of each level. Deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimalNeeds;

impl NeedsGenerator for MinimalNeeds {
    fn baseline(&mut self, level: TriageLevel) -> Needs {
        match level.value() {
            1 | 2 => Needs::new()
                .with(ResourceKind::Bed, 1)
                .with(ResourceKind::Specialist, 1),
            3 => Needs::new().with(ResourceKind::Bed, 1),
            _ => Needs::new(),
        }
    }
}

/// Raw intake data as received at the boundary.
#[derive(Debug, Clone, Default)]
pub struct IntakeRequest {
    pub id: Option<String>,
    pub level: i64,
    pub resources: Vec<String>,
}

/// A validated patient plus the labels that could not be resolved.
#[derive(Debug, Clone)]
pub struct Intake {
    pub patient: Patient,
    pub unrecognised: Vec<String>,
}

#[derive(Clone)]
pub struct IntakeService {
    labels: Arc<ResourceLabels>,
    needs: Arc<Mutex<Box<dyn NeedsGenerator>>>,
}

impl IntakeService {
    pub fn new(labels: ResourceLabels, needs: Box<dyn NeedsGenerator>) -> Self {
        Self {
            labels: Arc::new(labels),
            needs: Arc::new(Mutex::new(needs)),
        }
    }

    /// Validates the request and derives the patient's needs.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the level is outside 1..=5,
    /// - a supplied id is blank,
    /// - the needs generator lock is poisoned.
    pub fn admit_request(&self, request: IntakeRequest) -> TriageResult<Intake> {
        let level = TriageLevel::new(request.level)?;
        let id = match request.id {
            Some(raw) => PatientId::new(raw)?,
            None => PatientId::generate(),
        };

        let mut needs = self
            .needs
            .lock()
            .map_err(|_| TriageError::GeneratorUnavailable)?
            .baseline(level);

        let mut unrecognised = Vec::new();
        for label in request.resources {
            match self.labels.resolve(&label) {
                Some(kind) => needs.add(kind, 1),
                None => {
                    tracing::warn!("unrecognised resource label: {}", label);
                    unrecognised.push(label);
                }
            }
        }

        tracing::debug!("needs derived for {} ({}): {:?}", id, level, needs);
        Ok(Intake {
            patient: Patient::new(id, level, needs),
            unrecognised,
        })
    }
}

impl std::fmt::Debug for IntakeService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntakeService")
            .field("labels", &self.labels)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_types::TypesError;

    fn minimal_service() -> IntakeService {
        IntakeService::new(ResourceLabels::standard().unwrap(), Box::new(MinimalNeeds))
    }

    fn level(v: i64) -> TriageLevel {
        TriageLevel::new(v).unwrap()
    }

    #[test]
    fn standard_table_resolves_known_labels() {
        let labels = ResourceLabels::standard().unwrap();
        assert_eq!(labels.resolve("Lit"), Some(ResourceKind::Bed));
        assert_eq!(labels.resolve(" Sang "), Some(ResourceKind::BloodUnit));
        assert_eq!(labels.resolve("Oxygène"), Some(ResourceKind::BloodUnit));
        assert_eq!(labels.resolve("Scanner"), None);
        assert_eq!(labels.labels().count(), RESOURCE_LABELS.len());
    }

    #[test]
    fn duplicate_labels_are_rejected_at_construction() {
        let err = ResourceLabels::from_table(&[
            ("Lit", ResourceKind::Bed),
            ("Lit", ResourceKind::Scanner),
        ])
        .expect_err("expected duplicate label failure");
        assert!(matches!(err, TriageError::DuplicateResourceLabel(ref l) if l == "Lit"));
    }

    #[test]
    fn requested_labels_add_to_baseline() {
        let intake = minimal_service()
            .admit_request(IntakeRequest {
                id: Some("P1".into()),
                level: 1,
                resources: vec!["Lit".into(), "Respirateur".into()],
            })
            .unwrap();

        let needs = &intake.patient.needs;
        assert_eq!(needs.get(ResourceKind::Bed), 2);
        assert_eq!(needs.get(ResourceKind::Specialist), 1);
        assert_eq!(needs.get(ResourceKind::Ventilator), 1);
        assert!(intake.unrecognised.is_empty());
    }

    #[test]
    fn unknown_label_leaves_needs_unchanged() {
        let service = minimal_service();
        let plain = service
            .admit_request(IntakeRequest {
                id: Some("P1".into()),
                level: 3,
                resources: vec![],
            })
            .unwrap();
        let with_unknown = service
            .admit_request(IntakeRequest {
                id: Some("P2".into()),
                level: 3,
                resources: vec!["Hélicoptère".into()],
            })
            .unwrap();

        assert_eq!(plain.patient.needs, with_unknown.patient.needs);
        assert_eq!(with_unknown.unrecognised, vec!["Hélicoptère".to_string()]);
    }

    #[test]
    fn missing_id_is_generated() {
        let intake = minimal_service()
            .admit_request(IntakeRequest {
                id: None,
                level: 5,
                resources: vec![],
            })
            .unwrap();
        assert!(intake.patient.id.as_str().starts_with("PAT-"));
    }

    #[test]
    fn invalid_level_is_rejected() {
        let err = minimal_service()
            .admit_request(IntakeRequest {
                id: None,
                level: 7,
                resources: vec![],
            })
            .expect_err("expected level validation failure");
        assert!(matches!(
            err,
            TriageError::Types(TypesError::InvalidTriageLevel(7))
        ));
    }

    #[test]
    fn random_baselines_respect_level_policy() {
        let mut generator = RandomNeeds::seeded(42);
        for _ in 0..200 {
            let l1 = generator.baseline(level(1));
            assert_eq!(l1.get(ResourceKind::Bed), 1);
            assert_eq!(l1.get(ResourceKind::Specialist), 1);
            assert!(l1.get(ResourceKind::BloodUnit) <= MAX_BASELINE_BLOOD_UNITS);

            let l2 = generator.baseline(level(2));
            assert_eq!(l2.get(ResourceKind::Bed), 1);
            assert!(l2.get(ResourceKind::Scanner) <= 1);

            let l3 = generator.baseline(level(3));
            assert_eq!(l3.get(ResourceKind::Bed), 1);

            let l4 = generator.baseline(level(4));
            assert_eq!(l4.get(ResourceKind::Specialist), 0);
            assert!(l4.get(ResourceKind::Bed) <= 1);

            let l5 = generator.baseline(level(5));
            assert!(l5.total_units() <= 1);
            assert!(l5.iter().all(|(kind, _)| kind == ResourceKind::Bed));
        }
    }

    #[test]
    fn seeded_generators_are_reproducible() {
        let mut a = RandomNeeds::seeded(7);
        let mut b = RandomNeeds::seeded(7);
        for l in TriageLevel::all() {
            assert_eq!(a.baseline(l), b.baseline(l));
        }
    }
}
