pub mod states;
pub mod params;
pub mod error;
pub mod engine;
pub mod msm;
pub mod integrator;
pub mod stationary;
pub mod scenario;
