use std::time::Instant;

use crate::configuration::config::ScenarioConfig;
use crate::simulation::error::ScenarioError;
use crate::simulation::integrator::Transition;
use crate::simulation::scenario::Scenario;

/// Time raw integrator ticks for growing run lengths
/// Paste output directly into a spreadsheet to graph
pub fn bench_ticks(cfg: &ScenarioConfig) -> Result<(), ScenarioError> {
    let ticks = [10_000u64, 50_000, 100_000, 500_000, 1_000_000];

    println!("ticks,ms,ticks_per_s,entries,exits");
    for n in ticks {
        let mut scenario = Scenario::build_scenario(cfg)?;
        let mut entries = 0;
        let mut exits = 0;

        let t0 = Instant::now();
        for _ in 0..n {
            match scenario.integrator.integrate(&mut scenario.particle, &mut scenario.msm)? {
                Transition::Entered { .. } => entries += 1,
                Transition::Exited { .. } => exits += 1,
                _ => {}
            }
        }
        let elapsed = t0.elapsed().as_secs_f64();

        println!("{},{:.3},{:.0},{},{}", n, elapsed * 1000.0, n as f64 / elapsed, entries, exits);
    }
    Ok(())
}

/// Time a full recorded run against the stationary distribution estimate on it
pub fn bench_estimator(cfg: &ScenarioConfig) -> Result<(), ScenarioError> {
    let mut scenario = Scenario::build_scenario(cfg)?;

    let t0 = Instant::now();
    let record = scenario.run()?;
    let dt_run = t0.elapsed().as_secs_f64();

    let t1 = Instant::now();
    scenario
        .integrator
        .compute_stationary_distribution(&record.trajectory, &scenario.msm)?;
    let dt_est = t1.elapsed().as_secs_f64();

    println!("rows = {:8}, run = {:8.4} s, estimate = {:8.4} s", record.trajectory.len(), dt_run, dt_est);
    Ok(())
}
