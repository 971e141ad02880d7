//! High-level run settings
//!
//! Number of ticks per trajectory, base seed, and how many independent
//! trajectories an ensemble run launches

#[derive(Debug, Clone)]
pub struct Engine {
    pub steps: u64, // ticks per trajectory
    pub seed: u64, // base seed, trajectory i uses seed + i
    pub trajectories: usize, // independent trajectories per ensemble
}
