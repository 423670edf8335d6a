//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Request handling never reads process-wide environment variables.

use crate::constants::DEFAULT_FACILITY_COUNT;
use crate::intake::{IntakeService, NeedsGenerator, RandomNeeds, ResourceLabels};
use crate::seeding::{FacilitySeeder, FixtureSeeder, RandomSeeder};
use crate::service::AllocationService;
use crate::{TriageError, TriageResult};
use std::path::PathBuf;

/// Core configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriageConfig {
    facility_count: usize,
    seed: Option<u64>,
    facilities_file: Option<PathBuf>,
}

impl TriageConfig {
    /// Create a new `TriageConfig`.
    pub fn new(
        facility_count: usize,
        seed: Option<u64>,
        facilities_file: Option<PathBuf>,
    ) -> TriageResult<Self> {
        if facility_count == 0 && facilities_file.is_none() {
            return Err(TriageError::InvalidInput(
                "facility_count must be at least 1".into(),
            ));
        }

        Ok(Self {
            facility_count,
            seed,
            facilities_file,
        })
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Builds the allocation service, seeding facilities from the fixture file when one is
    /// configured and randomly otherwise.
    pub fn build_allocation_service(&self) -> TriageResult<AllocationService> {
        let registry = match &self.facilities_file {
            Some(path) => FixtureSeeder::from_path(path)?.seed()?,
            None => RandomSeeder::with_seed(self.facility_count, self.seed).seed()?,
        };
        Ok(AllocationService::new(registry))
    }

    /// Builds the intake service with the standard label table.
    ///
    /// A configured seed is offset so that patient needs do not replay the facility draws.
    pub fn build_intake_service(&self) -> TriageResult<IntakeService> {
        let needs: Box<dyn NeedsGenerator> = match self.seed {
            Some(seed) => Box::new(RandomNeeds::seeded(seed.wrapping_add(1))),
            None => Box::new(RandomNeeds::from_entropy()),
        };
        Ok(IntakeService::new(ResourceLabels::standard()?, needs))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse the facility count from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns the default count.
pub fn facility_count_from_env_value(value: Option<String>) -> TriageResult<usize> {
    let Some(value) = non_empty(value) else {
        return Ok(DEFAULT_FACILITY_COUNT);
    };

    let count: usize = value.parse().map_err(|_| {
        TriageError::InvalidInput(format!(
            "facility count must be a positive integer, got {value:?}"
        ))
    })?;
    if count == 0 {
        return Err(TriageError::InvalidInput(
            "facility count must be at least 1".into(),
        ));
    }
    Ok(count)
}

/// Parse an optional RNG seed. Empty means unseeded.
pub fn seed_from_env_value(value: Option<String>) -> TriageResult<Option<u64>> {
    non_empty(value)
        .map(|v| {
            v.parse::<u64>().map_err(|_| {
                TriageError::InvalidInput(format!("seed must be an unsigned integer, got {v:?}"))
            })
        })
        .transpose()
}

/// Parse an optional fixture path. Empty means none.
pub fn facilities_file_from_env_value(value: Option<String>) -> Option<PathBuf> {
    non_empty(value).map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facility_count_defaults_when_unset_or_blank() {
        assert_eq!(
            facility_count_from_env_value(None).unwrap(),
            DEFAULT_FACILITY_COUNT
        );
        assert_eq!(
            facility_count_from_env_value(Some("  ".into())).unwrap(),
            DEFAULT_FACILITY_COUNT
        );
        assert_eq!(facility_count_from_env_value(Some(" 4 ".into())).unwrap(), 4);
    }

    #[test]
    fn facility_count_rejects_zero_and_garbage() {
        assert!(facility_count_from_env_value(Some("0".into())).is_err());
        assert!(facility_count_from_env_value(Some("ten".into())).is_err());
    }

    #[test]
    fn seed_is_optional() {
        assert_eq!(seed_from_env_value(None).unwrap(), None);
        assert_eq!(seed_from_env_value(Some("42".into())).unwrap(), Some(42));
        assert!(seed_from_env_value(Some("-1".into())).is_err());
    }

    #[test]
    fn config_requires_facilities() {
        assert!(TriageConfig::new(0, None, None).is_err());
        assert!(TriageConfig::new(0, None, Some("pool.yaml".into())).is_ok());
    }

    #[test]
    fn seeded_config_builds_reproducible_services() {
        let cfg = TriageConfig::new(3, Some(5), None).unwrap();
        let a = cfg.build_allocation_service().unwrap().snapshot().unwrap();
        let b = cfg.build_allocation_service().unwrap().snapshot().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 3);
        assert!(cfg.build_intake_service().is_ok());
    }
}
