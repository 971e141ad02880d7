//! Error types for the hybrid integrator and its collaborators.

use thiserror::Error;

/// Failures raised by an MSM collaborator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MsmError {
    #[error("MSM state {state} is outside [0, {states})")]
    StateOutOfRange { state: usize, states: usize },

    #[error("MSM has no cluster centers to allocate against")]
    NoCenters,

    #[error("transition matrix row {row}: {message}")]
    InvalidTransitionRow { row: usize, message: String },

    #[error("transition matrix must have {expected} columns, row {row} has {found}")]
    TransitionShape { row: usize, expected: usize, found: usize },

    #[error("invalid MSM parameter: {0}")]
    InvalidParameter(String),
}

/// Failures of the hybrid integrator itself
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IntegratorError {
    #[error("invalid integrator configuration: {0}")]
    InvalidConfig(String),

    /// The MSM left its domain from a near-center state, the MSM is malformed
    #[error("MSM exit from core state {state}, exits must start at index {n_centers} or above")]
    ExitFromCoreState { state: usize, n_centers: usize },

    #[error("exit resampling did not escape the bath after {steps} attempts")]
    ExitResamplingDiverged { steps: usize },

    #[error("bath state {state} lies outside the {max} states the bath geometry addresses")]
    BathStateOutOfRange { state: usize, max: usize },

    #[error("MSM is not active, there is no state to exit from")]
    NotActive,

    #[error("stationary distribution has no counts to normalize")]
    DegenerateDistribution,

    #[error(transparent)]
    Msm(#[from] MsmError),
}

/// Failures while turning a `ScenarioConfig` into a runnable `Scenario`
#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("{field} must have 2 components, got {found}")]
    Dimension { field: String, found: usize },

    #[error(transparent)]
    Integrator(#[from] IntegratorError),

    #[error(transparent)]
    Msm(#[from] MsmError),
}
