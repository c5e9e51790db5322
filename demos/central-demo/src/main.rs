//! Runs a small pickup-and-delivery day against the random solver.
//!
//! ```text
//! central-demo [config.toml]
//! RUST_LOG=rt_central=debug,rt_solver=debug central-demo
//! ```
//!
//! Without a config file the run uses a 100 ms tick and an eight hour
//! time-out.  The clock runs as fast as possible until a snapshot is handed
//! to the solver, then follows the wall clock until the solver reports back.

use anyhow::Context;
use rt_central::{CentralBuilder, CentralConfig, Scenario};
use rt_core::{Point, TimeWindow};
use rt_pdp::{ParcelSpec, VehicleSpec};
use rt_solver::RandomSolver;
use tracing::info;
use tracing_subscriber::EnvFilter;

const MINUTE: u64 = 60_000;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => CentralConfig::from_file(&path).with_context(|| format!("loading {path}"))?,
        None => CentralConfig { tick_length_ms: 100, ..CentralConfig::default() },
    };
    info!(?config, "configuration");

    let scenario = scenario()?;
    let mut sim = CentralBuilder::new(scenario, RandomSolver::supplier())
        .config(config)
        .build()
        .context("building the run")?;

    let report = sim.run().context("running")?;

    println!("stopped:          {:?}", report.summary.reason);
    println!("simulated time:   {} min", report.summary.end_time / MINUTE);
    println!("wall time:        {:.2?}", report.summary.wall_time);
    println!("ticks:            {} ({} real-time)", report.summary.ticks, report.summary.real_time_ticks);
    println!("parcels:          {}/{} delivered", report.delivered, report.parcels);
    println!("snapshots:        {}", report.dispatches);
    println!("repairs:          {}", report.repairs);
    println!("mode transitions: {}", report.mode_transitions);
    Ok(())
}

/// Three vehicles at a central depot and a dozen parcels trickling in over
/// the first two hours.
fn scenario() -> anyhow::Result<Scenario> {
    let depot = Point::new(5.0, 5.0);
    let mut scenario = Scenario::new(depot);
    for _ in 0..3 {
        scenario = scenario.vehicle(VehicleSpec::new(depot, 50.0));
    }

    for i in 0..12u64 {
        let announce = i * 10 * MINUTE;
        let from = Point::new((i % 4) as f64 * 3.0, (i % 3) as f64 * 4.0);
        let to = Point::new(10.0 - from.x, 8.0 - from.y);
        let spec = ParcelSpec::builder(from, to)
            .announce_time(announce)
            .pickup_time_window(TimeWindow::new(announce, announce + 60 * MINUTE)?)
            .service_duration(2 * MINUTE)
            .build()?;
        scenario = scenario.parcel(spec);
    }
    Ok(scenario)
}
