use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use triage_core::TriageConfig;
use triage_core::config::{
    facilities_file_from_env_value, facility_count_from_env_value, seed_from_env_value,
};
use triage_core::constants::DEFAULT_REST_ADDR;

/// Default log level per crate target.
const LOG_DIRECTIVES: [&str; 3] = ["triage_run=info", "triage_core=info", "api_rest=info"];

/// Main entry point for the triage allocator
///
/// Seeds the facility registry once, then serves the REST API until the process exits.
/// Facility state lives in memory only and is lost on restart.
///
/// # Environment Variables
/// - `TRIAGE_REST_ADDR`: REST server address (default: "0.0.0.0:5000")
/// - `TRIAGE_FACILITY_COUNT`: number of randomly seeded facilities (default: 10)
/// - `TRIAGE_SEED`: optional seed for reproducible facilities and patient needs
/// - `TRIAGE_FACILITIES_FILE`: optional YAML fixture replacing random seeding
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - configuration values cannot be parsed,
/// - the facility registry cannot be seeded,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in LOG_DIRECTIVES {
        filter = filter.add_directive(directive.parse()?);
    }
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("TRIAGE_REST_ADDR").unwrap_or_else(|_| DEFAULT_REST_ADDR.into());

    let cfg = TriageConfig::new(
        facility_count_from_env_value(std::env::var("TRIAGE_FACILITY_COUNT").ok())?,
        seed_from_env_value(std::env::var("TRIAGE_SEED").ok())?,
        facilities_file_from_env_value(std::env::var("TRIAGE_FACILITIES_FILE").ok()),
    )?;

    let state = AppState {
        allocation: cfg.build_allocation_service()?,
        intake: cfg.build_intake_service()?,
    };

    tracing::info!("++ Starting triage REST on {}", rest_addr);

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
