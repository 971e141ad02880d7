//! Hybrid Brownian / Markov state model integrator
//!
//! Far from the origin the particle performs free Brownian motion inside a
//! reflecting disk. Once it crosses `entry_radius` its position is
//! discretized into an MSM state and the MSM drives the dynamics until it
//! flags an exit, at which point a continuous position is resampled from the
//! bath sector the chain left from.
//!
//! Bath sectors use the angle `theta = atan2(x, y) + pi` in `[0, 2pi]`, both
//! when discretizing an entry and when resampling an exit.

use std::f64::consts::PI;

use log::debug;
use nalgebra::DVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use super::error::{IntegratorError, MsmError};
use super::msm::{nearest_center, MarkovModel};
use super::params::IntegratorParams;
use super::stationary::stationary_distribution;
use super::states::{NVec2, Particle, Sample};

/// What a single `integrate` tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Brownian step, particle stayed in the continuum
    Diffused,
    /// Brownian step that crossed `entry_radius`, MSM now active in `state`
    Entered { state: usize },
    /// MSM step that stayed inside the MSM domain
    Propagated { from: usize, to: usize },
    /// MSM step that left the domain from `from`, particle is live again
    Exited { from: usize },
}

/// Bath angle of `x` in `[0, 2pi]`
pub fn bath_angle(x: &NVec2) -> f64 {
    x.x.atan2(x.y) + PI
}

/// Point at distance `r` whose [`bath_angle`] is `theta`
pub fn from_bath_angle(r: f64, theta: f64) -> NVec2 {
    NVec2::new(-r * theta.sin(), -r * theta.cos())
}

pub struct MsmrdIntegrator {
    params: IntegratorParams,
    sigma: f64, // sqrt(2 D dt)
    normal: Normal<f64>, // N(0, sigma)
    msm_active: bool, // true -> MSM state is live, false -> particle position is live
    last_state: Option<usize>, // MSM state right before the latest propagate
    rng: StdRng,
}

impl MsmrdIntegrator {
    /// Build an integrator for `particle`, the Brownian step width is taken
    /// from the particle's diffusion coefficient
    pub fn new(params: IntegratorParams, particle: &Particle, seed: u64) -> Result<Self, IntegratorError> {
        params.validate()?;
        if !(particle.d >= 0.0) {
            return Err(IntegratorError::InvalidConfig(format!(
                "diffusion coefficient must be non-negative, got {}",
                particle.d
            )));
        }

        let sigma = (2.0 * particle.d * params.timestep).sqrt();
        let normal = Normal::new(0.0, sigma).map_err(|e| IntegratorError::InvalidConfig(e.to_string()))?;

        Ok(Self {
            params,
            sigma,
            normal,
            msm_active: false,
            last_state: None,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn params(&self) -> &IntegratorParams {
        &self.params
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn is_msm_active(&self) -> bool {
        self.msm_active
    }

    pub fn last_state(&self) -> Option<usize> {
        self.last_state
    }

    fn brownian_increment(&mut self) -> NVec2 {
        let dx = self.normal.sample(&mut self.rng);
        let dy = self.normal.sample(&mut self.rng);
        NVec2::new(dx, dy)
    }

    /// Map a point outside the simulation disk back inside by inversion on
    /// the boundary circle, `x -> x * R^2 / |x|^2`
    /// Points strictly inside are returned unchanged
    pub fn reflect(&self, x: NVec2) -> NVec2 {
        let r2 = x.norm_squared();
        let radius2 = self.params.radius * self.params.radius;
        if r2 >= radius2 {
            x * (radius2 / r2)
        } else {
            x
        }
    }

    /// Advance the particle by one Gaussian step, reflecting at `radius`
    pub fn propagate_diffusion(&mut self, particle: &mut Particle) {
        let dr = self.brownian_increment();
        particle.x = self.reflect(particle.x + dr);
    }

    /// Sector of a bath angle, `theta = 2pi` folds into the last sector
    fn sector(&self, theta: f64) -> usize {
        let k = (theta / self.params.angular_increment()).floor() as usize;
        k.min(self.params.n_angular_partitions - 1)
    }

    /// Check that `msm` matches the state layout of this integrator: one
    /// center per core state and room for both bath rings
    pub fn check_msm<M: MarkovModel>(&self, msm: &M) -> Result<(), IntegratorError> {
        let p = &self.params;
        if msm.centers().len() != p.n_centers {
            return Err(IntegratorError::InvalidConfig(format!(
                "MSM has {} centers but n_centers is {}",
                msm.centers().len(),
                p.n_centers
            )));
        }
        if msm.states() < p.geometric_states() {
            return Err(IntegratorError::InvalidConfig(format!(
                "geometry addresses {} states but the MSM has {}",
                p.geometric_states(),
                msm.states()
            )));
        }
        Ok(())
    }

    /// MSM state a continuum point maps to on entry
    ///
    /// Inside `interaction_radius` this is the nearest MSM center, otherwise
    /// the inner-ring bath state of the point's angular sector
    pub fn entry_state<M: MarkovModel>(&self, x: &NVec2, msm: &M) -> Result<usize, IntegratorError> {
        if x.norm() < self.params.interaction_radius {
            let state = nearest_center(msm.centers(), x).ok_or(MsmError::NoCenters)?;
            if state >= self.params.n_centers {
                return Err(IntegratorError::InvalidConfig(format!(
                    "center {} is not a core state, n_centers is {}",
                    state, self.params.n_centers
                )));
            }
            Ok(state)
        } else {
            Ok(self.params.n_centers + self.sector(bath_angle(x)))
        }
    }

    /// Hand the particle over to the MSM
    pub fn enter_msm<M: MarkovModel>(&mut self, particle: &Particle, msm: &mut M) -> Result<usize, IntegratorError> {
        let state = self.entry_state(&particle.x, msm)?;
        msm.set_state(state);
        msm.set_exit(false);
        self.msm_active = true;
        debug!("entered MSM at r = {:.4} in state {}", particle.x.norm(), state);
        Ok(state)
    }

    /// Draw a point inside the bath region of `state`
    ///
    /// States `n_centers .. n_centers + N` are the inner ring between
    /// `interaction_radius` and `entry_radius`, the next `N` states the outer
    /// ring between `entry_radius` and `bath_radius`. Radii are drawn
    /// uniformly by area and the angle uniformly within the sector.
    pub fn sample_launch_point(&mut self, state: usize) -> Result<NVec2, IntegratorError> {
        let p = &self.params;
        if state < p.n_centers {
            return Err(IntegratorError::ExitFromCoreState { state, n_centers: p.n_centers });
        }
        let bath_state = state - p.n_centers;
        let n = p.n_angular_partitions;

        let (sector, r_in, r_out) = if bath_state < n {
            (bath_state, p.interaction_radius, p.entry_radius)
        } else if bath_state < 2 * n {
            (bath_state - n, p.entry_radius, p.bath_radius)
        } else {
            return Err(IntegratorError::BathStateOutOfRange { state, max: p.geometric_states() });
        };

        let increment = p.angular_increment();
        let theta = (sector as f64 + self.rng.gen::<f64>()) * increment;
        let r2 = self.rng.gen::<f64>() * (r_out * r_out - r_in * r_in) + r_in * r_in;
        Ok(from_bath_angle(r2.sqrt(), theta))
    }

    /// Hand the particle back to the continuum after an MSM exit
    ///
    /// Each attempt draws a launch point in the bath region of the last
    /// occupied state and takes one unreflected Brownian step from it. The
    /// first step that lands beyond `bath_radius` becomes the new position
    pub fn exit_msm(&mut self, particle: &mut Particle) -> Result<usize, IntegratorError> {
        let state = match (self.msm_active, self.last_state) {
            (true, Some(state)) => state,
            _ => return Err(IntegratorError::NotActive),
        };

        let bath_radius = self.params.bath_radius;
        for _ in 0..self.params.max_exit_steps {
            let x = self.sample_launch_point(state)? + self.brownian_increment();
            if x.norm() > bath_radius {
                particle.x = x;
                self.msm_active = false;
                debug!("left MSM from state {} at r = {:.4}", state, x.norm());
                return Ok(state);
            }
        }
        Err(IntegratorError::ExitResamplingDiverged { steps: self.params.max_exit_steps })
    }

    /// One integrator tick
    ///
    /// Active: remember the current MSM state, propagate the MSM once and
    /// resample a position if it exited. Inactive: one Brownian step, then
    /// enter the MSM if the particle is inside `entry_radius`
    pub fn integrate<M: MarkovModel>(&mut self, particle: &mut Particle, msm: &mut M) -> Result<Transition, IntegratorError> {
        if self.msm_active {
            let from = msm.state();
            self.last_state = Some(from);
            msm.propagate()?;
            if msm.exit() {
                let from = self.exit_msm(particle)?;
                Ok(Transition::Exited { from })
            } else {
                Ok(Transition::Propagated { from, to: msm.state() })
            }
        } else {
            self.propagate_diffusion(particle);
            if particle.x.norm() < self.params.entry_radius {
                let state = self.enter_msm(particle, msm)?;
                Ok(Transition::Entered { state })
            } else {
                Ok(Transition::Diffused)
            }
        }
    }

    /// Record the live half of the state at `step`
    pub fn sample<M: MarkovModel>(&self, step: u64, particle: &Particle, msm: &M) -> Sample {
        let time = self.params.timestep * step as f64;
        if self.msm_active {
            Sample::discrete(time, msm.state())
        } else {
            Sample::continuum(time, particle.x)
        }
    }

    /// Empirical stationary distribution over the MSM states of `traj`
    pub fn compute_stationary_distribution<M: MarkovModel>(
        &self,
        traj: &[Sample],
        msm: &M,
    ) -> Result<DVector<f64>, IntegratorError> {
        stationary_distribution(traj, msm)
    }
}
