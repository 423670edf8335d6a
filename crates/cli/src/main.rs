use api_shared::{AssignPatientRes, FacilitiesRes};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use triage_core::constants::DEFAULT_FACILITY_COUNT;
use triage_core::{FacilitySnapshot, IntakeRequest, TriageConfig, TriageResult};

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Triage facility allocation CLI")]
struct Cli {
    /// Print allocation decisions as they happen
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Where the facility pool comes from.
#[derive(Args)]
struct PoolArgs {
    /// Number of randomly seeded facilities
    #[arg(long, default_value_t = DEFAULT_FACILITY_COUNT)]
    count: usize,
    /// Seed for reproducible facilities and needs
    #[arg(long)]
    seed: Option<u64>,
    /// YAML facility fixture (overrides random seeding)
    #[arg(long)]
    file: Option<PathBuf>,
}

impl PoolArgs {
    fn config(&self) -> TriageResult<TriageConfig> {
        TriageConfig::new(self.count, self.seed, self.file.clone())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the seeded facility pool
    Facilities {
        #[command(flatten)]
        pool: PoolArgs,
    },
    /// Allocate one patient against a fresh pool and print the JSON response
    Assign {
        /// Triage level (1 = most severe, 5 = least)
        #[arg(long)]
        esi: i64,
        /// Patient id (generated if omitted)
        #[arg(long)]
        id: Option<String>,
        /// Requested resource label, e.g. "Lit" (repeatable)
        #[arg(long = "resource")]
        resources: Vec<String>,
        #[command(flatten)]
        pool: PoolArgs,
    },
    /// Allocate a random batch of patients in one pass and summarise the outcome
    Simulate {
        /// Number of patients in the batch
        #[arg(long, default_value_t = 50)]
        patients: usize,
        #[command(flatten)]
        pool: PoolArgs,
    },
}

fn print_facilities(facilities: &[FacilitySnapshot]) {
    for facility in facilities {
        let available: Vec<String> = facility
            .available
            .iter()
            .map(|(kind, qty)| format!("{kind}={qty}"))
            .collect();
        println!(
            "Facility {:>3}  {:>3} km  admitted: {:>3}  available: {}",
            facility.id,
            facility.distance_km,
            facility.admitted,
            available.join(", ")
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("triage_core=debug"))
            .init();
    }

    match cli.command {
        Some(Commands::Facilities { pool }) => {
            let allocation = pool.config()?.build_allocation_service()?;
            let facilities = allocation.snapshot()?;
            if cli.verbose {
                println!("{}", serde_json::to_string_pretty(&FacilitiesRes::new(&facilities))?);
            } else {
                print_facilities(&facilities);
            }
        }
        Some(Commands::Assign {
            esi,
            id,
            resources,
            pool,
        }) => {
            let cfg = pool.config()?;
            let allocation = cfg.build_allocation_service()?;
            let intake = cfg.build_intake_service()?.admit_request(IntakeRequest {
                id,
                level: esi,
                resources,
            })?;
            let patient_id = intake.patient.id.clone();

            let (outcome, facilities) = allocation.assign_reporting(vec![intake.patient])?;
            let res =
                AssignPatientRes::new(&patient_id, &outcome, &facilities, intake.unrecognised);
            println!("{}", serde_json::to_string_pretty(&res)?);
        }
        Some(Commands::Simulate { patients, pool }) => {
            let cfg = pool.config()?;
            let allocation = cfg.build_allocation_service()?;
            let intake = cfg.build_intake_service()?;
            let mut rng = match cfg.seed() {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(2)),
                None => StdRng::from_entropy(),
            };

            let mut batch = Vec::with_capacity(patients);
            for i in 0..patients {
                let request = IntakeRequest {
                    id: Some(format!("SIM-{i:04}")),
                    level: rng.gen_range(1..=5),
                    resources: vec![],
                };
                batch.push(intake.admit_request(request)?.patient);
            }

            // The pool starts empty, so every admission belongs to this batch.
            let (outcome, facilities) = allocation.assign_reporting(batch)?;

            println!(
                "Assigned {} of {} patients, {} reallocation(s)",
                outcome.allocation.len(),
                patients,
                outcome.reallocations.len()
            );
            for event in &outcome.reallocations {
                println!(
                    "  {} released from facility {} for {}",
                    event.released_patient_id, event.facility_id, event.incoming_patient_id
                );
            }
            if !outcome.unassigned.is_empty() {
                let ids: Vec<&str> = outcome.unassigned.iter().map(|id| id.as_str()).collect();
                println!("Unassigned: {}", ids.join(", "));
            }
            print_facilities(&facilities);
        }
        None => {
            println!("Use 'triage --help' for commands");
        }
    }

    Ok(())
}
