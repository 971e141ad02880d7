//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime bundle
//! (`Scenario`) containing:
//! - run settings (`Engine`)
//! - the diffusing particle (`Particle`)
//! - the precomputed MSM (`DiscreteMsm`)
//! - the hybrid integrator (`MsmrdIntegrator`)
//!
//! Independent trajectories each get their own scenario, which is what
//! `run_ensemble` relies on to run them in parallel.

use log::info;
use nalgebra::DVector;
use rayon::prelude::*;

use crate::configuration::config::ScenarioConfig;
use crate::simulation::engine::Engine;
use crate::simulation::error::{IntegratorError, ScenarioError};
use crate::simulation::integrator::{MsmrdIntegrator, Transition};
use crate::simulation::msm::DiscreteMsm;
use crate::simulation::params::{IntegratorParams, DEFAULT_MAX_EXIT_STEPS};
use crate::simulation::stationary::stationary_distribution;
use crate::simulation::states::{NVec2, Particle, Trajectory};

/// Offset separating the MSM's random stream from the integrator's
const MSM_SEED_OFFSET: u64 = 0x9E37_79B9_7F4A_7C15;

fn vec2(field: &str, v: &[f64]) -> Result<NVec2, ScenarioError> {
    match v {
        [x, y] => Ok(NVec2::new(*x, *y)),
        _ => Err(ScenarioError::Dimension { field: field.to_string(), found: v.len() }),
    }
}

/// MSM: centers -> nalgebra vectors, matrix checked by DiscreteMsm
fn build_msm(cfg: &ScenarioConfig, seed: u64) -> Result<DiscreteMsm, ScenarioError> {
    let m_cfg = &cfg.msm;
    let centers = m_cfg
        .centers
        .iter()
        .map(|c| vec2("msm.centers", c))
        .collect::<Result<Vec<_>, _>>()?;
    let msm = DiscreteMsm::new(&m_cfg.transition_matrix, centers, m_cfg.lagtime, m_cfg.msm_radius, seed)?;
    Ok(msm)
}

/// One recorded trajectory with its regime-switch counts
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub trajectory: Trajectory,
    pub entries: usize, // continuum -> MSM switches
    pub exits: usize, // MSM -> continuum switches
}

pub struct Scenario {
    pub engine: Engine,
    pub particle: Particle,
    pub msm: DiscreteMsm,
    pub integrator: MsmrdIntegrator,
}

impl Scenario {
    /// Build the scenario for trajectory 0
    pub fn build_scenario(cfg: &ScenarioConfig) -> Result<Self, ScenarioError> {
        Self::build_trajectory(cfg, 0)
    }

    /// Build an independent scenario for trajectory `index` of an ensemble
    pub fn build_trajectory(cfg: &ScenarioConfig, index: usize) -> Result<Self, ScenarioError> {
        let seed = cfg.engine.seed.wrapping_add(index as u64);

        // Engine (runtime) from EngineConfig
        let engine = Engine {
            steps: cfg.engine.steps,
            seed,
            trajectories: cfg.engine.trajectories,
        };

        let particle = Particle::new(vec2("particle.x", &cfg.particle.x)?, cfg.particle.d);

        let msm = build_msm(cfg, seed.wrapping_add(MSM_SEED_OFFSET))?;

        // Integrator params (runtime) from IntegratorConfig
        let i_cfg = &cfg.integrator;
        let params = IntegratorParams {
            radius: i_cfg.radius,
            entry_radius: i_cfg.entry_radius,
            interaction_radius: i_cfg.interaction_radius,
            bath_radius: i_cfg.bath_radius,
            n_angular_partitions: i_cfg.n_angular_partitions,
            n_centers: i_cfg.n_centers,
            timestep: i_cfg.timestep,
            max_exit_steps: i_cfg.max_exit_steps.unwrap_or(DEFAULT_MAX_EXIT_STEPS),
        };
        let integrator = MsmrdIntegrator::new(params, &particle, seed)?;
        integrator.check_msm(&msm)?;

        Ok(Self {
            engine,
            particle,
            msm,
            integrator,
        })
    }

    /// Run `engine.steps` ticks, sampling once before the first tick and
    /// once after every tick
    pub fn run(&mut self) -> Result<RunRecord, IntegratorError> {
        let steps = self.engine.steps;
        let mut trajectory = Vec::with_capacity(steps as usize + 1);
        let mut entries = 0;
        let mut exits = 0;

        trajectory.push(self.integrator.sample(0, &self.particle, &self.msm));
        for step in 1..=steps {
            match self.integrator.integrate(&mut self.particle, &mut self.msm)? {
                Transition::Entered { .. } => entries += 1,
                Transition::Exited { .. } => exits += 1,
                Transition::Diffused | Transition::Propagated { .. } => {}
            }
            trajectory.push(self.integrator.sample(step, &self.particle, &self.msm));
        }

        info!(
            "trajectory seed {}: {} ticks, {} entries, {} exits",
            self.engine.seed, steps, entries, exits
        );
        Ok(RunRecord { trajectory, entries, exits })
    }
}

/// Run `engine.trajectories` independent trajectories in parallel
///
/// Trajectory `i` owns its own particle, MSM and integrator seeded with
/// `seed + i`, results come back in index order
pub fn run_ensemble(cfg: &ScenarioConfig) -> Result<Vec<RunRecord>, ScenarioError> {
    (0..cfg.engine.trajectories)
        .into_par_iter()
        .map(|i| -> Result<RunRecord, ScenarioError> {
            let mut scenario = Scenario::build_trajectory(cfg, i)?;
            Ok(scenario.run()?)
        })
        .collect()
}

/// Stationary distribution of `records` pooled into one sample set
///
/// Only the MSM of `cfg` is built, its clustering and lag time are all the
/// estimate needs
pub fn pooled_stationary_distribution(cfg: &ScenarioConfig, records: &[RunRecord]) -> Result<DVector<f64>, ScenarioError> {
    let msm = build_msm(cfg, cfg.engine.seed)?;
    let pooled: Trajectory = records.iter().flat_map(|r| r.trajectory.iter().copied()).collect();
    Ok(stationary_distribution(&pooled, &msm)?)
}
