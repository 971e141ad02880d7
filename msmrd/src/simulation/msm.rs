//! Markov state model collaborator used inside the interaction domain
//!
//! The integrator only talks to the MSM through [`MarkovModel`]. The
//! construction of the model (estimating transitions, clustering) happens
//! elsewhere, [`DiscreteMsm`] just consumes a ready-made transition matrix.

use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::simulation::error::MsmError;
use crate::simulation::states::NVec2;

/// Interface the hybrid integrator needs from an MSM
///
/// `propagate` mutates `state` and `exit` in place, so callers that need the
/// pre-transition state must read it before propagating
pub trait MarkovModel {
    /// Current discrete state
    fn state(&self) -> usize;
    fn set_state(&mut self, state: usize);

    /// True once the chain has left the MSM domain
    fn exit(&self) -> bool;
    fn set_exit(&mut self, exit: bool);

    /// One coordinate per clustered core state
    fn centers(&self) -> &[NVec2];

    /// Advance the chain by one lag time
    fn propagate(&mut self) -> Result<(), MsmError>;

    /// Assign each point to its nearest discrete state
    fn allocate_states(&self, points: &[NVec2]) -> Result<Vec<usize>, MsmError>;

    /// Clustering radius, continuum samples inside it count toward MSM states
    fn msm_radius(&self) -> f64;

    /// Physical time covered by one `propagate`
    fn lagtime(&self) -> f64;

    /// Number of discrete states
    fn states(&self) -> usize;
}

/// Index of the nearest point in `centers`, the lowest index wins ties
pub fn nearest_center(centers: &[NVec2], point: &NVec2) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, c) in centers.iter().enumerate() {
        let d2 = (c - point).norm_squared();
        match best {
            Some((_, best_d2)) if d2 >= best_d2 => {}
            _ => best = Some((i, d2)),
        }
    }
    best.map(|(i, _)| i)
}

/// MSM driven by a row-stochastic matrix of shape `states x (states + 1)`
///
/// Column `states` is the probability of leaving the MSM domain. When that
/// column is drawn the chain sets `exit` and moves `state` to the sentinel
/// index `states`
#[derive(Debug, Clone)]
pub struct DiscreteMsm {
    transitions: DMatrix<f64>, // rows: from, columns: to (last column = exit)
    centers: Vec<NVec2>, // core state cluster centers
    lagtime: f64, // time per propagate
    msm_radius: f64, // clustering radius for the transition zone
    state: usize, // current state
    exit: bool, // exit flag
    rng: StdRng, // chain randomness
}

const ROW_SUM_TOLERANCE: f64 = 1e-8;

impl DiscreteMsm {
    pub fn new(
        rows: &[Vec<f64>],
        centers: Vec<NVec2>,
        lagtime: f64,
        msm_radius: f64,
        seed: u64,
    ) -> Result<Self, MsmError> {
        let states = rows.len();
        if states == 0 {
            return Err(MsmError::InvalidParameter("transition matrix is empty".to_string()));
        }
        if centers.is_empty() {
            return Err(MsmError::NoCenters);
        }
        if !(lagtime > 0.0) {
            return Err(MsmError::InvalidParameter(format!("lagtime must be positive, got {lagtime}")));
        }
        if !(msm_radius >= 0.0) {
            return Err(MsmError::InvalidParameter(format!("msm_radius must be non-negative, got {msm_radius}")));
        }

        for (i, row) in rows.iter().enumerate() {
            if row.len() != states + 1 {
                return Err(MsmError::TransitionShape { row: i, expected: states + 1, found: row.len() });
            }
            if row.iter().any(|p| !(*p >= 0.0)) {
                return Err(MsmError::InvalidTransitionRow { row: i, message: "negative or NaN entry".to_string() });
            }
            let sum: f64 = row.iter().sum();
            if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
                return Err(MsmError::InvalidTransitionRow { row: i, message: format!("sums to {sum}") });
            }
        }

        let transitions = DMatrix::from_fn(states, states + 1, |i, j| rows[i][j]);

        Ok(Self {
            transitions,
            centers,
            lagtime,
            msm_radius,
            state: 0,
            exit: false,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Probability of leaving the domain in one step from `state`
    pub fn exit_probability(&self, state: usize) -> Option<f64> {
        (state < self.transitions.nrows()).then(|| self.transitions[(state, self.transitions.ncols() - 1)])
    }
}

impl MarkovModel for DiscreteMsm {
    fn state(&self) -> usize {
        self.state
    }

    fn set_state(&mut self, state: usize) {
        self.state = state;
    }

    fn exit(&self) -> bool {
        self.exit
    }

    fn set_exit(&mut self, exit: bool) {
        self.exit = exit;
    }

    fn centers(&self) -> &[NVec2] {
        &self.centers
    }

    fn propagate(&mut self) -> Result<(), MsmError> {
        let states = self.states();
        if self.state >= states {
            return Err(MsmError::StateOutOfRange { state: self.state, states });
        }

        // Inverse-CDF draw over the row, fall back to the last reachable
        // column if rounding leaves u above the cumulative sum
        let row = self.transitions.row(self.state);
        let u: f64 = self.rng.gen::<f64>();
        let mut cumsum = 0.0;
        let mut next = None;
        let mut last_reachable = 0;
        for (j, &p) in row.iter().enumerate() {
            if p > 0.0 {
                last_reachable = j;
            }
            cumsum += p;
            if u < cumsum {
                next = Some(j);
                break;
            }
        }
        let next = next.unwrap_or(last_reachable);

        self.state = next;
        self.exit = next == states;
        Ok(())
    }

    fn allocate_states(&self, points: &[NVec2]) -> Result<Vec<usize>, MsmError> {
        points
            .iter()
            .map(|p| nearest_center(&self.centers, p).ok_or(MsmError::NoCenters))
            .collect()
    }

    fn msm_radius(&self) -> f64 {
        self.msm_radius
    }

    fn lagtime(&self) -> f64 {
        self.lagtime
    }

    fn states(&self) -> usize {
        self.transitions.nrows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_state_rows() -> Vec<Vec<f64>> {
        vec![vec![0.5, 0.5, 0.0], vec![0.2, 0.3, 0.5]]
    }

    fn centers() -> Vec<NVec2> {
        vec![NVec2::new(-1.0, 0.0), NVec2::new(1.0, 0.0)]
    }

    #[test]
    fn rejects_rows_that_do_not_sum_to_one() {
        let rows = vec![vec![0.5, 0.4, 0.0], vec![0.2, 0.3, 0.5]];
        let err = DiscreteMsm::new(&rows, centers(), 1.0, 1.0, 0).unwrap_err();
        assert!(matches!(err, MsmError::InvalidTransitionRow { row: 0, .. }));
    }

    #[test]
    fn rejects_missing_exit_column() {
        let rows = vec![vec![0.5, 0.5], vec![0.5, 0.5]];
        let err = DiscreteMsm::new(&rows, centers(), 1.0, 1.0, 0).unwrap_err();
        assert_eq!(err, MsmError::TransitionShape { row: 0, expected: 3, found: 2 });
    }

    #[test]
    fn exit_moves_state_to_sentinel() {
        let rows = vec![vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0]];
        let mut msm = DiscreteMsm::new(&rows, centers(), 1.0, 1.0, 3).unwrap();
        msm.set_state(0);
        msm.propagate().unwrap();
        assert_eq!(msm.state(), 1);
        assert!(!msm.exit());
        msm.propagate().unwrap();
        assert_eq!(msm.state(), 2);
        assert!(msm.exit());
    }

    #[test]
    fn propagate_from_sentinel_is_an_error() {
        let mut msm = DiscreteMsm::new(&two_state_rows(), centers(), 1.0, 1.0, 0).unwrap();
        msm.set_state(2);
        assert_eq!(msm.propagate(), Err(MsmError::StateOutOfRange { state: 2, states: 2 }));
    }

    #[test]
    fn allocate_states_breaks_ties_by_lowest_index() {
        let msm = DiscreteMsm::new(&two_state_rows(), centers(), 1.0, 1.0, 0).unwrap();
        let points = [NVec2::new(0.0, 0.0), NVec2::new(0.9, 0.1), NVec2::new(-3.0, 2.0)];
        assert_eq!(msm.allocate_states(&points).unwrap(), vec![0, 1, 0]);
    }

    #[test]
    fn empirical_transitions_follow_the_matrix() {
        let mut msm = DiscreteMsm::new(&two_state_rows(), centers(), 1.0, 1.0, 11).unwrap();
        let n = 20_000;
        let mut stay = 0;
        for _ in 0..n {
            msm.set_state(0);
            msm.propagate().unwrap();
            if msm.state() == 0 {
                stay += 1;
            }
        }
        let frac = stay as f64 / n as f64;
        assert!((frac - 0.5).abs() < 0.02, "stay fraction {frac}");
    }
}
