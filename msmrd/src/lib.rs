pub mod simulation;
pub mod configuration;
pub mod benchmark;

pub use simulation::states::{Particle, Sample, Trajectory, NVec2, CONTINUUM_SENTINEL};
pub use simulation::params::IntegratorParams;
pub use simulation::error::{IntegratorError, MsmError, ScenarioError};
pub use simulation::msm::{MarkovModel, DiscreteMsm};
pub use simulation::integrator::{MsmrdIntegrator, Transition, bath_angle, from_bath_angle};
pub use simulation::stationary::stationary_distribution;
pub use simulation::scenario::{Scenario, RunRecord, run_ensemble, pooled_stationary_distribution};

pub use configuration::config::{ScenarioConfig, EngineConfig, IntegratorConfig, ParticleConfig, MsmConfig};

pub use benchmark::benchmark::{bench_ticks, bench_estimator};
