use thiserror::Error;

/// Everything that can go wrong at the sweep level.
///
/// Per-unit failures inside a trial never show up here; they are folded
/// into the trial's `FAILED` flag by the reducer. Only configuration,
/// provisioning, and store I/O escalate.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("sweep parameter list is empty")]
    EmptySweep,

    #[error("duplicate sweep parameter: {0}")]
    DuplicateParam(u32),

    #[error("cohort size must be at least 1")]
    InvalidCohort,

    #[error("trial repeat count must be at least 1")]
    InvalidRepeats,

    #[error("cohort size {cohort} exceeds the identifier pool of {pool}")]
    CohortExceedsPool { cohort: usize, pool: usize },

    #[error("provisioning failed: {0}")]
    Provisioning(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
