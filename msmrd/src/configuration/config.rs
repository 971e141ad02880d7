//! Configuration types for loading MSM/RD scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – run length, seed and ensemble size
//! - [`IntegratorConfig`] – domain radii, bath partition and time step
//! - [`ParticleConfig`]   – initial position and diffusion coefficient
//! - [`MsmConfig`]        – the precomputed Markov state model
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! A scenario with four core states and four sectors per bath ring:
//!
//! ```yaml
//! engine:
//!   steps: 100000           # ticks per trajectory
//!   seed: 7                 # base seed, trajectory i uses seed + i
//!   trajectories: 4         # independent trajectories run in parallel
//!
//! integrator:
//!   radius: 10.0            # outer reflecting boundary
//!   entry_radius: 2.0       # continuum -> MSM switch
//!   interaction_radius: 1.0 # core states inside, bath states outside
//!   bath_radius: 3.0        # outer edge of the bath rings
//!   n_angular_partitions: 4
//!   n_centers: 4
//!   timestep: 0.01
//!   max_exit_steps: 1000000 # optional
//!
//! particle:
//!   x: [ 5.0, 0.0 ]
//!   d: 1.0
//!
//! msm:
//!   lagtime: 1.0
//!   msm_radius: 2.0
//!   centers: [ [0.5, 0.0], [0.0, 0.5], [-0.5, 0.0], [0.0, -0.5] ]
//!   transition_matrix:      # states x (states + 1), last column = exit
//!     - [ ... ]
//! ```
//!
//! The scenario builder maps this configuration into the runtime types
//! (`IntegratorParams`, `Particle`, `DiscreteMsm`).

use serde::Deserialize;

/// Run settings
#[derive(Deserialize, Debug, Clone)]
pub struct EngineConfig {
    pub steps: u64, // ticks per trajectory
    pub seed: u64, // base seed
    #[serde(default = "default_trajectories")]
    pub trajectories: usize, // independent trajectories in an ensemble run
}

fn default_trajectories() -> usize {
    1
}

/// Geometry and time step of the hybrid integrator
#[derive(Deserialize, Debug, Clone)]
pub struct IntegratorConfig {
    pub radius: f64,
    pub entry_radius: f64,
    pub interaction_radius: f64,
    pub bath_radius: f64,
    pub n_angular_partitions: usize,
    pub n_centers: usize,
    pub timestep: f64,
    pub max_exit_steps: Option<usize>, // defaults to DEFAULT_MAX_EXIT_STEPS
}

/// Initial state of the diffusing particle
#[derive(Deserialize, Debug, Clone)]
pub struct ParticleConfig {
    pub x: Vec<f64>, // initial position, 2 components
    pub d: f64, // diffusion coefficient
}

/// Precomputed Markov state model
#[derive(Deserialize, Debug, Clone)]
pub struct MsmConfig {
    pub lagtime: f64,
    pub msm_radius: f64,
    pub centers: Vec<Vec<f64>>, // one 2D center per clustered core state
    pub transition_matrix: Vec<Vec<f64>>, // states x (states + 1), last column = exit
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,
    pub integrator: IntegratorConfig,
    pub particle: ParticleConfig,
    pub msm: MsmConfig,
}
