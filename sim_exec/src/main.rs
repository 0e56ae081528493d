//! Main simulation executable entry point.
//!
//! # Architecture
//!
//! The executable runs a single batch and exits:
//!
//!     - Initialise the session and logging
//!     - Load the batch, controller, robot, motor and case parameters
//!     - Run every configured mode under every configured scenario
//!     - Log and archive the metrics of each run and the per mode averages
//!     - Save a JSON summary of the batch into the session directory
//!
//! # Usage
//!
//!     sim_exec [params_file]
//!
//! If `params_file` is given the batch parameters are loaded from it,
//! otherwise from `$AFSMC_SIM_ROOT/params/sim_exec.toml`. The remaining
//! parameter files are always loaded from `$AFSMC_SIM_ROOT/params`.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use serde::Serialize;
use std::env;

// Internal
use sim_lib::{
    metrics::RunMetrics,
    params::SimExecParams,
    sim::{run_batch, BatchReport, MetricsRecord, SimConfig},
};
use util::{
    archive::Archiver,
    logger::{logger_init, LevelFilter},
    session::{self, Session},
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Everything needed to reproduce and interpret a batch.
#[derive(Serialize)]
struct BatchSummary<'a> {
    exec_params: &'a SimExecParams,
    config: &'a SimConfig,
    report: &'a BatchReport,
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("sim_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    info!("AFSMC Trajectory Tracking Simulator\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let args: Vec<String> = env::args().collect();
    debug!("CLI arguments: {:?}", args);

    let exec_params: SimExecParams = match args.len() {
        1 => util::params::load("sim_exec.toml").wrap_err("Could not load exec params")?,
        2 => {
            info!("Loading batch parameters from \"{}\"", &args[1]);
            util::params::load_from_path(&args[1]).wrap_err("Could not load exec params")?
        }
        n => {
            return Err(eyre!(
                "Expected either zero or one argument, found {}",
                n - 1
            ))
        }
    };
    exec_params
        .validate()
        .wrap_err("Invalid exec params")?;

    let config = SimConfig {
        controller: util::params::load("traj_ctrl.toml")
            .wrap_err("Could not load trajectory control params")?,
        case: util::params::load(exec_params.case_file())
            .wrap_err_with(|| format!("Could not load {}", exec_params.case_file()))?,
        robot: util::params::load("robot.toml").wrap_err("Could not load robot params")?,
        motor: util::params::load("motor.toml").wrap_err("Could not load motor params")?,
    };

    exec_params
        .check_case(&config.case)
        .wrap_err_with(|| format!("Invalid case file {}", exec_params.case_file()))?;

    config.validate().wrap_err("Invalid simulation parameters")?;

    info!("Parameters loaded");

    // ---- RUN BATCH ----

    info!(
        "Running the {} case: {} modes x {} scenarios, batch seed {}\n",
        config.case.kind,
        exec_params.modes.len(),
        exec_params.scenarios.len(),
        exec_params.batch_seed
    );

    let start_s = session::get_elapsed_seconds();

    let report = run_batch(
        &config,
        &exec_params.modes,
        &exec_params.scenarios,
        exec_params.batch_seed,
        &exec_params.metrics,
    )
    .wrap_err("Batch run failed")?;

    info!(
        "Batch complete in {:.3} s\n",
        session::get_elapsed_seconds() - start_s
    );

    for w in report.warnings.iter() {
        warn!("{}", w);
    }

    for record in report.runs.iter() {
        log_record(record);
    }

    info!("Averages over all scenarios:");
    for record in report.averages.iter() {
        log_record(record);
    }

    // ---- ARCHIVE ----

    let mut arch = Archiver::from_path(&session, "metrics.csv")
        .wrap_err("Failed to create the metrics archive")?;
    for record in report.runs.iter().chain(report.averages.iter()) {
        arch.serialise(record)
            .wrap_err("Failed to archive metrics")?;
    }

    session
        .save(
            "summary.json",
            &BatchSummary {
                exec_params: &exec_params,
                config: &config,
                report: &report,
            },
        )
        .wrap_err("Failed to save the batch summary")?;

    info!("Results saved to {:?}", session.session_root);

    Ok(())
}

/// Log the headline metrics of a record.
fn log_record(record: &MetricsRecord) {
    let m: RunMetrics = record.metrics();

    info!(
        "{:>5} {:<13} RMSE x/y/theta = {:.4} / {:.4} / {:.4}, settling = {:.2} s, \
        chattering = {:.4}, overshoot = {:.4} m, energy = {:.4} (avg {:.4})",
        record.mode.as_str(),
        record.scenario,
        m.rmse_x,
        m.rmse_y,
        m.rmse_theta,
        m.settling_pos_s,
        m.chattering,
        m.overshoot_m,
        m.energy,
        m.energy_avg
    );
}
