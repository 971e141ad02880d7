//! Stationary distribution estimate from a mixed continuum/MSM trajectory
//!
//! Each MSM sample stands for one lag time of occupancy, so it is weighted
//! by `lagtime`. Continuum samples inside `msm_radius` lie in the transition
//! zone and are clustered onto MSM states with weight one. Samples are
//! counted, never ordered, so the estimate does not depend on row order.

use log::warn;
use nalgebra::DVector;

use super::error::IntegratorError;
use super::msm::MarkovModel;
use super::states::{NVec2, Sample};

pub fn stationary_distribution<M: MarkovModel>(traj: &[Sample], msm: &M) -> Result<DVector<f64>, IntegratorError> {
    let states = msm.states();
    let mut counts = DVector::<f64>::zeros(states);

    // Transition zone: continuum samples close enough to be clustered
    let msm_radius = msm.msm_radius();
    let transition_zone: Vec<NVec2> = traj
        .iter()
        .filter(|s| s.state.is_none())
        .map(Sample::position)
        .filter(|x| x.norm() < msm_radius)
        .collect();

    if !transition_zone.is_empty() {
        for state in msm.allocate_states(&transition_zone)? {
            if state < states {
                counts[state] += 1.0;
            }
        }
    }

    let lagtime = msm.lagtime();
    for state in traj.iter().filter_map(|s| s.state) {
        if state < states {
            counts[state] += lagtime;
        }
    }

    let total = counts.sum();
    if !(total > 0.0) {
        warn!("no MSM or transition-zone samples in a trajectory of {} rows", traj.len());
        return Err(IntegratorError::DegenerateDistribution);
    }
    Ok(counts / total)
}
