//! Core state types for the hybrid MSM/RD simulation.
//!
//! Defines:
//! - `Particle` - continuous position and diffusion coefficient
//! - `Sample`   - one recorded trajectory row `(time, x, y, state)`
//!
//! Only one of the particle position and the MSM state is live at a time,
//! a `Sample` records whichever one was authoritative at that step.

use nalgebra::Vector2;
pub type NVec2 = Vector2<f64>;

/// Row value marking a continuum sample in the flat record format
pub const CONTINUUM_SENTINEL: i64 = -1;

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: NVec2, // position
    pub d: f64, // diffusion coefficient
}

impl Particle {
    pub fn new(x: NVec2, d: f64) -> Self {
        Self { x, d }
    }
}

/// One trajectory record
/// `state == None` is a continuum sample and `x`/`y` hold the position,
/// `Some(i)` is an MSM sample and the coordinates are reported as zero
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub x: f64,
    pub y: f64,
    pub state: Option<usize>,
}

impl Sample {
    pub fn continuum(time: f64, x: NVec2) -> Self {
        Self { time, x: x.x, y: x.y, state: None }
    }

    pub fn discrete(time: f64, state: usize) -> Self {
        Self { time, x: 0.0, y: 0.0, state: Some(state) }
    }

    pub fn position(&self) -> NVec2 {
        NVec2::new(self.x, self.y)
    }

    /// Flatten to `(time, x, y, state)` with `-1` for continuum rows
    pub fn to_row(&self) -> (f64, f64, f64, i64) {
        let state = self.state.map_or(CONTINUUM_SENTINEL, |s| s as i64);
        (self.time, self.x, self.y, state)
    }

    /// Inverse of [`Sample::to_row`], any negative state reads as continuum
    pub fn from_row(row: (f64, f64, f64, i64)) -> Self {
        let (time, x, y, state) = row;
        Self {
            time,
            x,
            y,
            state: usize::try_from(state).ok(),
        }
    }
}

pub type Trajectory = Vec<Sample>;
