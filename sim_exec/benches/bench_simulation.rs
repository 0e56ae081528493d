//! # Simulation Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use sim_lib::{
    ref_traj::CaseKind,
    sim::{simulate, Scenario, SimConfig},
    traj_ctrl::{compute_turn_rate, ControlInputs, ControlMode, ControllerParams},
};

fn simulation_benchmark(c: &mut Criterion) {
    // ---- Full runs ----

    for kind in [CaseKind::Line, CaseKind::Circle].iter() {
        let config = SimConfig::for_kind(*kind);

        for mode in ControlMode::ALL.iter() {
            c.bench_function(&format!("simulate::{}::{}", kind, mode), |b| {
                b.iter(|| simulate(&config, *mode, Scenario::Nominal, 0).unwrap())
            });
        }
    }

    let config = SimConfig::default();
    c.bench_function("simulate::line::AFSMC::sensor_noise", |b| {
        b.iter(|| simulate(&config, ControlMode::Afsmc, Scenario::SensorNoise, 42).unwrap())
    });

    // ---- Control law only ----

    let params = ControllerParams::default();
    let inputs = ControlInputs {
        lat_err_m: 0.12,
        head_err_rad: -0.05,
        head_err_int: 0.01,
        lat_err_rate_ms: 0.3,
        head_err_rate_rads: -0.1,
        omega_eq_rads: 0.625,
    };

    c.bench_function("compute_turn_rate::AFSMC", |b| {
        b.iter(|| compute_turn_rate(ControlMode::Afsmc, black_box(&inputs), &params))
    });
}

criterion_group!(benches, simulation_benchmark);
criterion_main!(benches);
