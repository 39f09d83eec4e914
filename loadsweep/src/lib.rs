#![doc = include_str!("../README.md")]

pub mod cohort;
pub mod config;
pub mod driver;
pub mod error;
pub mod executor;
pub mod provision;
pub mod reduce;
pub mod sink;

pub use cohort::{CohortLauncher, RequestOutcome};
pub use config::{DatasetShape, SweepConfig, SweepDimension};
pub use driver::{SweepDriver, SweepSummary};
pub use error::SweepError;
pub use executor::{AbExecutor, ExecOutput, RequestExecutor};
#[cfg(feature = "http")]
pub use executor::HttpExecutor;
pub use provision::{NoopProvisioner, Provisioner, SeedCommand};
pub use sink::{Record, ResultSink};
