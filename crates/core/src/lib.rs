//! # Triage Core
//!
//! Core allocation logic for the triage service.
//!
//! This crate assigns arriving patients to hospital facilities:
//! - per-facility resource ledgers that never oversubscribe capacity
//! - nearest-eligible facility selection
//! - preemptive reallocation of less urgent patients for severe arrivals
//! - batch orchestration, most urgent first
//!
//! It also holds the startup collaborators the service needs (facility seeding, intake needs
//! derivation, configuration).
//!
//! **No API concerns**: HTTP servers, CORS and request marshalling belong in `api-rest` and
//! `api-shared`.

pub mod config;
pub mod constants;
pub mod error;
pub mod facility;
pub mod intake;
pub mod ledger;
pub mod orchestrator;
pub mod patient;
pub mod preemption;
pub mod seeding;
pub mod selector;
pub mod service;

pub use config::TriageConfig;
pub use error::{TriageError, TriageResult};
pub use facility::{Facility, FacilityRegistry, FacilitySnapshot};
pub use intake::{Intake, IntakeRequest, IntakeService, MinimalNeeds, RandomNeeds, ResourceLabels};
pub use ledger::{Admission, LedgerSnapshot, ResourceLedger};
pub use orchestrator::AllocationOutcome;
pub use patient::Patient;
pub use preemption::Reallocation;
pub use seeding::{FacilitySeeder, FixtureSeeder, RandomSeeder};
pub use service::AllocationService;

pub use triage_types::{FacilityId, Needs, PatientId, ResourceKind, TriageLevel, TypesError};
