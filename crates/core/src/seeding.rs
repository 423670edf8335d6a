//! Startup seeding of the facility registry.
//!
//! Two seeders are provided: [`RandomSeeder`] reproduces the randomly generated pool used in
//! demos (seedable for reproducible runs), and [`FixtureSeeder`] reads a fixed pool from YAML.
//!
//! Fixture format:
//!
//! ```yaml
//! facilities:
//!   - id: 0
//!     distance_km: 12
//!     capacity:
//!       bed: 2
//!       specialist: 1
//! ```

use crate::constants::{SEED_CAPACITY, SEED_DISTANCE_KM};
use crate::facility::{Facility, FacilityRegistry};
use crate::{TriageError, TriageResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::path::Path;
use triage_types::{FacilityId, Needs};

/// Produces the facility registry the service starts with.
pub trait FacilitySeeder {
    fn seed(&mut self) -> TriageResult<FacilityRegistry>;
}

/// Random capacities and distances within the configured policy ranges.
#[derive(Debug)]
pub struct RandomSeeder<R: Rng> {
    count: usize,
    rng: R,
}

impl<R: Rng> RandomSeeder<R> {
    pub fn new(count: usize, rng: R) -> Self {
        Self { count, rng }
    }
}

impl RandomSeeder<StdRng> {
    /// Seeds from `seed` when given, otherwise from OS entropy.
    pub fn with_seed(count: usize, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(count, rng)
    }
}

impl<R: Rng> FacilitySeeder for RandomSeeder<R> {
    fn seed(&mut self) -> TriageResult<FacilityRegistry> {
        let mut facilities = Vec::with_capacity(self.count);
        for i in 0..self.count {
            let id = u32::try_from(i)
                .map_err(|_| TriageError::InvalidInput("too many facilities".into()))?;
            let capacity: Needs = SEED_CAPACITY
                .iter()
                .map(|(kind, range)| (*kind, self.rng.gen_range(range.clone())))
                .collect();
            let distance_km = self.rng.gen_range(SEED_DISTANCE_KM);
            facilities.push(Facility::new(FacilityId(id), distance_km, capacity));
        }

        let registry = FacilityRegistry::new(facilities)?;
        tracing::info!("seeded {} facilities", registry.len());
        Ok(registry)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct FacilityFixture {
    id: u32,
    distance_km: u32,
    #[serde(default)]
    capacity: Needs,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RegistryFixture {
    facilities: Vec<FacilityFixture>,
}

/// Fixed facility pool loaded from YAML.
#[derive(Debug, Clone)]
pub struct FixtureSeeder {
    fixture: RegistryFixture,
}

impl FixtureSeeder {
    /// Parses a fixture document.
    ///
    /// Unknown resource names or fields are rejected.
    pub fn from_yaml_str(yaml: &str) -> TriageResult<Self> {
        let fixture = serde_yaml::from_str(yaml).map_err(TriageError::FixtureParse)?;
        Ok(Self { fixture })
    }

    pub fn from_path(path: &Path) -> TriageResult<Self> {
        let yaml = std::fs::read_to_string(path).map_err(TriageError::FixtureRead)?;
        Self::from_yaml_str(&yaml)
    }
}

impl FacilitySeeder for FixtureSeeder {
    fn seed(&mut self) -> TriageResult<FacilityRegistry> {
        let facilities = self
            .fixture
            .facilities
            .iter()
            .map(|f| Facility::new(FacilityId(f.id), f.distance_km, f.capacity.clone()))
            .collect();
        let registry = FacilityRegistry::new(facilities)?;
        tracing::info!("loaded {} facilities from fixture", registry.len());
        Ok(registry)
    }
}
