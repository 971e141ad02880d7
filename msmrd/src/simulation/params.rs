//! Geometric and numerical parameters of the hybrid integrator
//!
//! `IntegratorParams` holds:
//! - the outer reflecting radius and the three MSM radii,
//! - the angular bath partition and the number of core states,
//! - the time step and the cap on exit resampling attempts

use std::f64::consts::PI;

use crate::simulation::error::IntegratorError;

pub const DEFAULT_MAX_EXIT_STEPS: usize = 1_000_000;

#[derive(Debug, Clone)]
pub struct IntegratorParams {
    pub radius: f64, // outer reflecting boundary
    pub entry_radius: f64, // continuum -> MSM switching radius
    pub interaction_radius: f64, // core states inside, bath states outside
    pub bath_radius: f64, // outer limit of the bath rings
    pub n_angular_partitions: usize, // sectors per bath ring
    pub n_centers: usize, // number of core states, bath indices start here
    pub timestep: f64, // dt
    pub max_exit_steps: usize, // cap on exit resampling attempts
}

impl IntegratorParams {
    /// Check the radius ordering and the numeric ranges the geometry relies on
    pub fn validate(&self) -> Result<(), IntegratorError> {
        let invalid = |msg: String| Err(IntegratorError::InvalidConfig(msg));

        if !(self.interaction_radius > 0.0) {
            return invalid(format!("interaction_radius must be positive, got {}", self.interaction_radius));
        }
        if self.interaction_radius > self.entry_radius
            || self.entry_radius > self.bath_radius
            || self.bath_radius > self.radius
        {
            return invalid(format!(
                "expected interaction_radius <= entry_radius <= bath_radius <= radius, got {} / {} / {} / {}",
                self.interaction_radius, self.entry_radius, self.bath_radius, self.radius
            ));
        }
        if !(self.timestep > 0.0) {
            return invalid(format!("timestep must be positive, got {}", self.timestep));
        }
        if self.n_angular_partitions == 0 {
            return invalid("n_angular_partitions must be at least 1".to_string());
        }
        if self.max_exit_steps == 0 {
            return invalid("max_exit_steps must be at least 1".to_string());
        }
        Ok(())
    }

    /// Width of one angular bath sector
    pub fn angular_increment(&self) -> f64 {
        2.0 * PI / self.n_angular_partitions as f64
    }

    /// Total number of core plus bath states the geometry addresses
    pub fn geometric_states(&self) -> usize {
        self.n_centers + 2 * self.n_angular_partitions
    }
}
